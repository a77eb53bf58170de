/// Running statistics for one station.
///
/// Only ever built from a first observation; afterwards it changes through
/// [`Aggregate::fold`] and [`Aggregate::combine`], both of which keep
/// `mean == sum / count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    min: f64,
    max: f64,
    sum: f64,
    count: u64,
    mean: f64,
}

impl Aggregate {
    pub fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
            mean: value,
        }
    }

    /// Incorporate one more observation.
    #[inline]
    pub fn fold(self, value: f64) -> Self {
        let count = self.count + 1;
        let sum = self.sum + value;
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
            sum,
            count,
            mean: sum / count as f64,
        }
    }

    /// Combine two aggregates built from disjoint observations.
    #[inline]
    pub fn combine(self, other: Aggregate) -> Self {
        let count = self.count + other.count;
        let sum = self.sum + other.sum;
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            sum,
            count,
            mean: sum / count as f64,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }
}
