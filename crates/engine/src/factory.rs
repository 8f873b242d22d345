//! Piece factory - deals shapes from a seeded RNG or a fixed script, with a preview.

use std::collections::VecDeque;

use cascade_core::Shape;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ConfigError;

#[derive(Clone, Debug)]
enum Source {
    Random { rng: StdRng, shapes: Vec<Shape> },
    /// Cycles through the script forever.
    Scripted { script: Vec<Shape>, index: usize },
}

#[derive(Clone, Debug)]
pub struct PieceFactory {
    source: Source,
    preview: VecDeque<Shape>,
    peek: usize,
    max_same: u32,
    last: Option<Shape>,
    run: u32,
}

impl PieceFactory {
    /// Random factory over the standard tetromino set.
    pub fn seeded(seed: u64, max_same: u32, peek: usize) -> Self {
        Self::build(
            Source::Random {
                rng: StdRng::seed_from_u64(seed),
                shapes: Shape::ALL.to_vec(),
            },
            max_same,
            peek,
        )
    }

    /// Random factory over a restricted shape set.
    pub fn with_shapes(
        shapes: &[Shape],
        seed: u64,
        max_same: u32,
        peek: usize,
    ) -> Result<Self, ConfigError> {
        if shapes.is_empty() {
            return Err(ConfigError::NoShapes);
        }
        Ok(Self::build(
            Source::Random {
                rng: StdRng::seed_from_u64(seed),
                shapes: shapes.to_vec(),
            },
            max_same,
            peek,
        ))
    }

    /// Deterministic factory that deals `script` in order, repeating. The run
    /// limit does not apply; the script is dealt verbatim.
    pub fn scripted(script: &[Shape], peek: usize) -> Result<Self, ConfigError> {
        if script.is_empty() {
            return Err(ConfigError::NoShapes);
        }
        Ok(Self::build(
            Source::Scripted {
                script: script.to_vec(),
                index: 0,
            },
            0,
            peek,
        ))
    }

    fn build(source: Source, max_same: u32, peek: usize) -> Self {
        let mut factory = Self {
            source,
            preview: VecDeque::with_capacity(peek + 1),
            peek,
            max_same,
            last: None,
            run: 0,
        };
        factory.refill();
        factory
    }

    fn draw(&mut self) -> Shape {
        let shape = match &mut self.source {
            Source::Scripted { script, index } => {
                let shape = script[*index % script.len()];
                *index += 1;
                shape
            }
            Source::Random { rng, shapes } => {
                let mut shape = shapes[rng.gen_range(0..shapes.len())];
                if self.max_same > 0 && self.last == Some(shape) && self.run >= self.max_same {
                    let others: Vec<Shape> = shapes.iter().copied().filter(|s| *s != shape).collect();
                    if !others.is_empty() {
                        shape = others[rng.gen_range(0..others.len())];
                    }
                }
                shape
            }
        };
        if self.last == Some(shape) {
            self.run += 1;
        } else {
            self.last = Some(shape);
            self.run = 1;
        }
        shape
    }

    fn refill(&mut self) {
        while self.preview.len() < self.peek + 1 {
            let shape = self.draw();
            self.preview.push_back(shape);
        }
    }

    /// Deal the next shape.
    pub fn next_shape(&mut self) -> Shape {
        self.refill();
        let shape = match self.preview.pop_front() {
            Some(shape) => shape,
            None => self.draw(),
        };
        self.refill();
        shape
    }

    /// Upcoming shapes after the one `next_shape` would deal, nearest first.
    pub fn preview(&self) -> Vec<Shape> {
        self.preview.iter().skip(1).copied().collect()
    }

    /// Shape `next_shape` would deal.
    pub fn peek_next(&self) -> Option<Shape> {
        self.preview.front().copied()
    }

    #[inline]
    pub fn peek_count(&self) -> usize {
        self.peek
    }
}
