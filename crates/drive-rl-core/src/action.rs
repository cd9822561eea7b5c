//! Action representations and action spaces

use rand::Rng;
use std::fmt::Debug;

/// Trait for actions in an RL environment
pub trait Action: Clone + Debug + Send + Sync {
    /// Convert action to a vector representation
    fn to_vec(&self) -> Vec<f64>;
}

/// Trait for defining action spaces
pub trait ActionSpace: Send + Sync {
    /// The type of actions in this space
    type Action: Action;

    /// Sample a random action from the space
    fn sample(&self) -> Self::Action;

    /// Check if an action is valid within this space
    fn contains(&self, action: &Self::Action) -> bool;

    /// Get the dimensionality of the action space
    fn dim(&self) -> Option<usize>;
}

/// Continuous action space (box) over plain vectors.
///
/// Environments with a typed action wrap this and convert sampled vectors.
#[derive(Debug, Clone)]
pub struct ContinuousSpace {
    /// Lower bounds for each dimension
    pub low: Vec<f64>,
    /// Upper bounds for each dimension
    pub high: Vec<f64>,
}

impl ContinuousSpace {
    /// Create a new continuous action space
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> crate::Result<Self> {
        if low.len() != high.len() {
            return Err(crate::RLError::DimensionMismatch {
                expected: low.len(),
                actual: high.len(),
            });
        }
        let sampleable = |l: &f64, h: &f64| {
            l.partial_cmp(h) == Some(std::cmp::Ordering::Less) && (h - l).is_finite()
        };
        if !low.iter().zip(&high).all(|(l, h)| sampleable(l, h)) {
            return Err(crate::RLError::Config(
                "continuous space bounds must be finite with low < high".to_string(),
            ));
        }
        Ok(Self { low, high })
    }

    /// Sample one vector uniformly within the bounds
    pub fn sample_vec<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(l, h)| rng.gen_range(*l..*h))
            .collect()
    }

    /// Check a raw vector against the bounds
    #[must_use]
    pub fn contains_slice(&self, values: &[f64]) -> bool {
        values.len() == self.low.len()
            && values
                .iter()
                .zip(&self.low)
                .zip(&self.high)
                .all(|((x, l), h)| x >= l && x <= h)
    }

    /// Number of dimensions
    #[must_use]
    pub fn len(&self) -> usize {
        self.low.len()
    }

    /// Whether the space has no dimensions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }
}
