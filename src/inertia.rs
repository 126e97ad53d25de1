use itertools::Itertools;

use crate::cluster::ClusterAccumulator;
use crate::distance::DistanceFn;
use crate::error::Result;
use crate::point::Point;

/// WC: sum of member-to-mean distances over all clusters. Lower is tighter.
pub fn within_cluster_compactness(clusters: &[ClusterAccumulator], distance: DistanceFn) -> Result<f64> {
    clusters.iter().map(|cluster| cluster.compactness(distance)).sum()
}

/// BC: sum of the distances between every unordered pair of centers. Higher is more separated.
pub fn between_cluster_separation(centers: &[Point], distance: DistanceFn) -> Result<f64> {
    centers
        .iter()
        .tuple_combinations()
        .map(|(a, b)| distance(a, b))
        .sum()
}

/// BC / WC, or 0.0 when WC is zero.
pub fn separation_ratio(wc: f64, bc: f64) -> f64 {
    if wc == 0.0 {
        return 0.0;
    }
    bc / wc
}
