//! Temporal smoothing of per-frame measurements.

mod weighted;

pub use weighted::LinearWeightedAvg;

/// A stateful filter over a stream of `V`s, fed one value per frame.
pub trait Filter<V> {
    /// Feeds the next value into the filter and returns the smoothed value.
    fn push(&mut self, value: V) -> V;

    /// Forgets all previously pushed values.
    fn reset(&mut self);
}
