use ndarray::{Array1, Zip};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::cluster::ClusterAccumulator;
use crate::error::{KMeansError, Result};
use crate::point::Point;

/// Draw `k` synthetic centers, each coordinate uniform between the minimum and
/// maximum of that dimension over the whole dataset.
pub fn random_centers<R: Rng + ?Sized>(
    data: &ClusterAccumulator,
    k: usize,
    rng: &mut R,
) -> Result<Vec<Point>> {
    let (Some(min), Some(max)) = (data.min(), data.max()) else {
        return Err(KMeansError::InsufficientData(
            "cannot sample centers from an empty dataset".to_string(),
        ));
    };
    let (min, max) = (min.values(), max.values());

    // interpolate between the bounds so a range wider than f64::MAX cannot overflow
    let centers = (0..k)
        .map(|_| {
            let unit = Array1::random_using(data.dimension_count(), Uniform::new(0.0, 1.0), &mut *rng);
            let values = Zip::from(&min)
                .and(&max)
                .and(&unit)
                .map_collect(|&lo, &hi, &u| (lo * (1.0 - u) + hi * u).max(lo).min(hi));
            Point::from_array(values)
        })
        .collect();

    Ok(centers)
}

/// Check that explicitly supplied centers match the cluster count and the data dimension.
pub fn validate_centers(centers: &[Point], k: usize, dimensions: usize) -> Result<()> {
    if centers.len() != k {
        return Err(KMeansError::InvalidCenters(format!(
            "expected {} centers, got {}",
            k,
            centers.len()
        )));
    }

    if let Some((index, center)) = centers
        .iter()
        .enumerate()
        .find(|(_, center)| center.dimension_count() != dimensions)
    {
        return Err(KMeansError::InvalidCenters(format!(
            "center {} has {} dimensions, data has {}",
            index,
            center.dimension_count(),
            dimensions
        )));
    }

    Ok(())
}
