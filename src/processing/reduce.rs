//! Numeric reductions over collected samples.

/// Running summary of numeric samples.
///
/// Tracks count/sum/min/max so callers can compute the mean and log the range without keeping
/// every sample around.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleStats {
    /// Number of samples pushed.
    pub count: usize,
    /// Sum of all samples.
    pub sum: f64,
    /// Smallest sample, if any.
    pub min: Option<f64>,
    /// Largest sample, if any.
    pub max: Option<f64>,
}

impl SampleStats {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample.
    pub fn push(&mut self, v: f64) {
        self.count += 1;
        self.sum += v;
        self.min = Some(match self.min {
            Some(a) => a.min(v),
            None => v,
        });
        self.max = Some(match self.max {
            Some(a) => a.max(v),
            None => v,
        });
    }

    /// Arithmetic mean, or `None` when no sample was pushed.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

impl FromIterator<f64> for SampleStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        for v in iter {
            stats.push(v);
        }
        stats
    }
}
