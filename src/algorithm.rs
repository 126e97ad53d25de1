use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cluster::ClusterAccumulator;
use crate::config::KMeansConfig;
use crate::distance::DistanceFn;
use crate::error::{KMeansError, Result};
use crate::inertia::{between_cluster_separation, separation_ratio, within_cluster_compactness};
use crate::initialization::{random_centers, validate_centers};
use crate::point::Point;

/// How a call to [`KMeans::run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The last pass moved no point
    Converged { iterations: usize },
    /// `max_iters` passes were made and points were still moving
    MaxIterationsReached { iterations: usize },
}

/// Lloyd-style k-means over a fixed set of points.
///
/// Every point is held by exactly one of the `k` cluster accumulators once the
/// first step has run. Centers start either from caller-supplied points or
/// uniformly inside the bounding box of the data, and afterwards follow the
/// mean of their cluster. A cluster left empty keeps its previous center.
#[derive(Debug, Clone)]
pub struct KMeans {
    config: KMeansConfig,
    points: Vec<Point>,
    clusters: Vec<ClusterAccumulator>,
    centers: Vec<Point>,
    iterations: usize,
}

impl KMeans {
    /// Sample the initial centers with a random source seeded from `config.seed`.
    pub fn new(data: Vec<Point>, config: KMeansConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(data, config, &mut rng)
    }

    /// Sample the initial centers from a caller-owned random source.
    pub fn with_rng<R: Rng + ?Sized>(data: Vec<Point>, config: KMeansConfig, rng: &mut R) -> Result<Self> {
        let dimensions = check_data(&data, config.k)?;
        let bounds = ClusterAccumulator::from_points(dimensions, data.iter().cloned())?;
        let centers = random_centers(&bounds, config.k, rng)?;
        log::info!("initialized {} centers inside the data bounding box", config.k);

        Ok(Self::assemble(data, config, dimensions, centers))
    }

    /// Start from explicit centers, one per cluster.
    pub fn with_centers(data: Vec<Point>, config: KMeansConfig, centers: Vec<Point>) -> Result<Self> {
        let dimensions = check_data(&data, config.k)?;
        validate_centers(&centers, config.k, dimensions)?;

        Ok(Self::assemble(data, config, dimensions, centers))
    }

    fn assemble(
        mut points: Vec<Point>,
        config: KMeansConfig,
        dimensions: usize,
        mut centers: Vec<Point>,
    ) -> Self {
        for point in points.iter_mut().chain(centers.iter_mut()) {
            point.unassign();
        }

        Self {
            config,
            points,
            clusters: (0..config.k).map(|_| ClusterAccumulator::new(dimensions)).collect(),
            centers,
            iterations: 0,
        }
    }

    /// One assignment pass against the current centers, followed by a center
    /// update if anything moved. Returns whether any point changed cluster.
    pub fn step(&mut self) -> Result<bool> {
        let distance = self.config.distance;
        let mut changed = false;

        for idx in 0..self.points.len() {
            let (nearest, _) = nearest_center(&self.points[idx], &self.centers, distance)?;
            let previous = self.points[idx].cluster();
            if previous == Some(nearest) {
                continue;
            }

            changed = true;
            if let Some(old) = previous {
                self.clusters[old].remove(&self.points[idx])?;
            }
            self.points[idx].assign(nearest);
            self.clusters[nearest].add(self.points[idx].clone())?;
        }

        if changed {
            self.update_centers();
        }
        self.iterations += 1;

        Ok(changed)
    }

    fn update_centers(&mut self) {
        for (idx, (center, cluster)) in self.centers.iter_mut().zip(self.clusters.iter()).enumerate() {
            match cluster.mean() {
                Some(mean) => *center = mean,
                None => log::debug!("cluster {} is empty, keeping center {}", idx, center),
            }
            log::debug!("center {} = {}", idx, center);
        }
    }

    /// Step until a pass moves no point, or until `max_iters` passes have been made.
    pub fn run(&mut self) -> Result<RunStatus> {
        if self.config.trace {
            log::info!("data before clustering:");
            self.trace()?;
        }

        let status = loop {
            if let Some(max_iters) = self.config.max_iters {
                if self.iterations >= max_iters {
                    log::warn!("Stopped after reaching max_iters = {}", max_iters);
                    break RunStatus::MaxIterationsReached {
                        iterations: self.iterations,
                    };
                }
            }

            let changed = self.step()?;
            if self.iterations % 10 == 0 {
                log::info!("Finished iteration {}", self.iterations);
            }
            if !changed {
                log::info!("Converged after {} iterations", self.iterations);
                break RunStatus::Converged {
                    iterations: self.iterations,
                };
            }
        };

        if self.config.trace {
            log::info!("data after clustering:");
            self.trace()?;
        }

        Ok(status)
    }

    /// Log every point with its cluster and distance to that cluster's center,
    /// followed by the WC/BC summary. Reads state only.
    pub fn trace(&self) -> Result<()> {
        log::info!("--------------------");
        for point in &self.points {
            match point.cluster() {
                Some(cluster) => {
                    let distance = (self.config.distance)(point, &self.centers[cluster])?;
                    log::info!("{} cluster {} distance to center {}", point, cluster, distance);
                }
                None => log::info!("{} unassigned", point),
            }
        }

        let wc = self.within_cluster_compactness()?;
        let bc = self.between_cluster_separation()?;
        log::info!("WC = {} BC = {} ratio BC/WC = {}", wc, bc, separation_ratio(wc, bc));
        log::info!("--------------------");
        Ok(())
    }

    pub fn within_cluster_compactness(&self) -> Result<f64> {
        within_cluster_compactness(&self.clusters, self.config.distance)
    }

    pub fn between_cluster_separation(&self) -> Result<f64> {
        between_cluster_separation(&self.centers, self.config.distance)
    }

    pub fn separation_ratio(&self) -> Result<f64> {
        Ok(separation_ratio(
            self.within_cluster_compactness()?,
            self.between_cluster_separation()?,
        ))
    }

    pub fn k(&self) -> usize {
        self.config.k
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn clusters(&self) -> &[ClusterAccumulator] {
        &self.clusters
    }

    pub fn centers(&self) -> &[Point] {
        &self.centers
    }

    /// Number of assignment passes made so far
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Cluster index of every point, in input order
    pub fn labels(&self) -> Vec<Option<usize>> {
        self.points.iter().map(Point::cluster).collect()
    }
}

fn check_data(data: &[Point], k: usize) -> Result<usize> {
    if k == 0 {
        return Err(KMeansError::InvalidK("k must be greater than 0".to_string()));
    }
    let Some(first) = data.first() else {
        return Err(KMeansError::InsufficientData("no data points".to_string()));
    };
    if k > data.len() {
        return Err(KMeansError::InsufficientData(format!(
            "number of clusters ({}) cannot be greater than the number of data points ({})",
            k,
            data.len()
        )));
    }

    let dimensions = first.dimension_count();
    for point in data {
        point.ensure_dimensions(dimensions)?;
    }
    Ok(dimensions)
}

/// Index of and distance to the closest center; ties go to the lowest index.
pub fn nearest_center(point: &Point, centers: &[Point], distance: DistanceFn) -> Result<(usize, f64)> {
    let mut best = (0, f64::INFINITY);
    for (idx, center) in centers.iter().enumerate() {
        let d = distance(point, center)?;
        if d < best.1 {
            best = (idx, d);
        }
    }
    Ok(best)
}
