use std::fmt;

use crate::distance::{euclidian_distance, DistanceFn};

/// Configuration for a k-means run
#[derive(Clone, Copy)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Upper bound on assignment passes. `None` iterates until no point changes cluster.
    pub max_iters: Option<usize>,

    /// Seed for the random source used to draw initial centers
    pub seed: u64,

    /// Metric used for assignment and for the quality measures
    pub distance: DistanceFn,

    /// Log every point with its cluster and distance before and after clustering
    pub trace: bool,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 2,
            max_iters: None,
            seed: 0,
            distance: euclidian_distance,
            trace: false,
        }
    }
}

impl fmt::Debug for KMeansConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("k", &self.k)
            .field("max_iters", &self.max_iters)
            .field("seed", &self.seed)
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Bound the number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = Some(max_iters);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the default Euclidian metric
    pub fn with_distance(mut self, distance: DistanceFn) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
