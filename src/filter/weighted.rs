//! Recency-weighted moving average.

use std::{
    collections::VecDeque,
    ops::{Add, Mul},
};

use super::Filter;

/// Linearly weighted moving average over a fixed history of values (FIR filter).
///
/// With `n` values in the history, the oldest one has weight 1 and the newest one weight `n`; the
/// weights are normalized by their sum. While the history is still filling up, only the values
/// pushed so far are used, so the first output equals the first input.
///
/// Works for any value type that can be scaled and summed, e.g. `f32` radii or
/// [`nalgebra::Vector2`] centers (which are averaged component-wise).
#[derive(Debug, Clone)]
pub struct LinearWeightedAvg<V> {
    history: VecDeque<V>,
    /// Max. number of values to keep in the history.
    history_size: usize,
}

impl<V> LinearWeightedAvg<V> {
    /// Creates a new weighted average calculator over the last `history_size` values.
    ///
    /// # Panics
    ///
    /// Panics if `history_size` is zero.
    pub fn new(history_size: usize) -> Self {
        assert!(history_size > 0, "history size must be at least 1");
        Self {
            history: VecDeque::with_capacity(history_size),
            history_size,
        }
    }

    /// Returns the number of values currently in the history.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl<V> Filter<V> for LinearWeightedAvg<V>
where
    V: Copy + Add<Output = V> + Mul<f32, Output = V>,
{
    fn push(&mut self, value: V) -> V {
        self.history.push_back(value);

        if self.history.len() > self.history_size {
            self.history.pop_front();
        }

        let n = self.history.len();
        let weight_sum = (n * (n + 1) / 2) as f32;
        let zero = value * 0.0;
        self.history
            .iter()
            .enumerate()
            .fold(zero, |acc, (i, &v)| acc + v * ((i + 1) as f32 / weight_sum))
    }

    fn reset(&mut self) {
        self.history.clear();
    }
}
