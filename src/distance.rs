use crate::error::Result;
use crate::point::Point;

/// A pure, stateless dissimilarity between two points of equal dimension.
///
/// Any function with this signature can be plugged into the engine, which
/// calls it for every point/center pair.
pub type DistanceFn = fn(&Point, &Point) -> Result<f64>;

/// Unnormalized Euclidian (L2) distance
pub fn euclidian_distance(us: &Point, them: &Point) -> Result<f64> {
    them.ensure_dimensions(us.dimension_count())?;

    Ok(us
        .values()
        .iter()
        .zip(them.values().iter())
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum::<f64>()
        .sqrt())
}

/// Manhattan (L1) distance
pub fn manhattan_distance(us: &Point, them: &Point) -> Result<f64> {
    them.ensure_dimensions(us.dimension_count())?;

    Ok(us
        .values()
        .iter()
        .zip(them.values().iter())
        .map(|(a, b)| (a - b).abs())
        .sum())
}

/// Earth mover's distance between two points read as 1-D histograms:
/// the L1 distance between their cumulative sums.
pub fn earth_movers_distance(us: &Point, them: &Point) -> Result<f64> {
    them.ensure_dimensions(us.dimension_count())?;

    let mut cum_us = 0f64;
    let mut cum_them = 0f64;
    let mut emd = 0.0;

    for (&s, &o) in us.values().iter().zip(them.values().iter()) {
        cum_us += s;
        cum_them += o;
        emd += (cum_us - cum_them).abs();
    }

    Ok(emd)
}
