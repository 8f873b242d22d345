//! FIFO of atomic commands and the placement plan that fills it.

use std::collections::VecDeque;

use cascade_core::{Direction, QuarterTurns};
use serde::{Deserialize, Serialize};

/// A chosen placement, expressed as the moves needed to reach it from spawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MotionPlan {
    /// Rows to descend before turning, so the turn clears the ceiling.
    pub initial_move_down: u32,
    pub angle: QuarterTurns,
    /// Positive moves left, negative moves right.
    pub x_offset: i32,
}

impl MotionPlan {
    pub fn new(initial_move_down: u32, angle: QuarterTurns, x_offset: i32) -> Self {
        Self {
            initial_move_down,
            angle,
            x_offset,
        }
    }

    /// Plan that just drops the piece where it is.
    pub fn drop_only() -> Self {
        Self::default()
    }

    /// Down, then turn, then slide, then drop. Three clockwise turns become one
    /// counter-clockwise turn.
    pub fn commands(&self) -> Vec<Direction> {
        let mut out = Vec::with_capacity(
            self.initial_move_down as usize + 3 + self.x_offset.unsigned_abs() as usize + 1,
        );
        out.extend(std::iter::repeat(Direction::Down).take(self.initial_move_down as usize));
        match self.angle.steps() {
            3 => out.push(Direction::RotateLeft),
            n => out.extend(std::iter::repeat(Direction::RotateRight).take(n as usize)),
        }
        let slide = if self.x_offset > 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        out.extend(std::iter::repeat(slide).take(self.x_offset.unsigned_abs() as usize));
        out.push(Direction::DropDown);
        out
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionQueue {
    queue: VecDeque<Direction>,
}

impl MotionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn enqueue(&mut self, direction: Direction) {
        self.queue.push_back(direction);
    }

    /// Next command, or `NoDirection` when nothing is queued.
    pub fn dequeue(&mut self) -> Direction {
        self.queue.pop_front().unwrap_or(Direction::NoDirection)
    }

    pub fn peek(&self) -> Option<Direction> {
        self.queue.front().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Snapshot of the pending commands, front first.
    pub fn dump(&self) -> Vec<Direction> {
        self.queue.iter().copied().collect()
    }

    /// Replace the queue contents with the commands for `plan`.
    pub fn load(&mut self, plan: &MotionPlan) {
        self.queue.clear();
        self.queue.extend(plan.commands());
    }
}

impl Extend<Direction> for MotionQueue {
    fn extend<I: IntoIterator<Item = Direction>>(&mut self, iter: I) {
        self.queue.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dequeue_is_no_direction() {
        let mut q = MotionQueue::new();
        assert_eq!(q.dequeue(), Direction::NoDirection);
        assert!(q.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut q = MotionQueue::new();
        q.enqueue(Direction::Left);
        q.enqueue(Direction::RotateRight);
        q.enqueue(Direction::DropDown);
        assert_eq!(q.dump(), vec![Direction::Left, Direction::RotateRight, Direction::DropDown]);
        assert_eq!(q.len(), 3);
        assert_eq!(q.dequeue(), Direction::Left);
        assert_eq!(q.dequeue(), Direction::RotateRight);
        assert_eq!(q.dequeue(), Direction::DropDown);
        assert_eq!(q.dequeue(), Direction::NoDirection);
    }

    #[test]
    fn test_dump_does_not_consume() {
        let mut q = MotionQueue::new();
        q.load(&MotionPlan::drop_only());
        let _ = q.dump();
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_plan_command_order() {
        let plan = MotionPlan::new(2, QuarterTurns::new(2), -3);
        use Direction::*;
        assert_eq!(
            plan.commands(),
            vec![Down, Down, RotateRight, RotateRight, Right, Right, Right, DropDown]
        );
    }

    #[test]
    fn test_three_turns_become_one_left() {
        let plan = MotionPlan::new(0, QuarterTurns::new(3), 1);
        assert_eq!(
            plan.commands(),
            vec![Direction::RotateLeft, Direction::Left, Direction::DropDown]
        );
    }

    #[test]
    fn test_load_replaces() {
        let mut q = MotionQueue::new();
        q.enqueue(Direction::Up);
        q.load(&MotionPlan::drop_only());
        assert_eq!(q.dump(), vec![Direction::DropDown]);
    }
}
