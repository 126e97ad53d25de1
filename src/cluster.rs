use std::cell::OnceCell;
use std::slice;

use ndarray::{Array1, Zip};

use crate::distance::DistanceFn;
use crate::error::{KMeansError, Result};
use crate::point::Point;

/// The members of one cluster together with running per-dimension statistics.
///
/// `sum`, `min`, `max` and `mean` are maintained on every `add`/`remove`.
/// The standard deviation is computed lazily and cached until the next
/// mutation; an empty cache marks it as stale.
///
/// Adding is O(dimensions). Removing a point that holds the current minimum or
/// maximum of a dimension rescans the remaining members for that dimension,
/// which is O(len) per affected dimension.
#[derive(Debug, Clone)]
pub struct ClusterAccumulator {
    dimensions: usize,
    members: Vec<Point>,
    sum: Array1<f64>,
    min: Array1<f64>,
    max: Array1<f64>,
    mean: Array1<f64>,
    standard_deviation: OnceCell<Array1<f64>>,
}

impl ClusterAccumulator {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            members: Vec::new(),
            sum: Array1::zeros(dimensions),
            min: Array1::zeros(dimensions),
            max: Array1::zeros(dimensions),
            mean: Array1::zeros(dimensions),
            standard_deviation: OnceCell::new(),
        }
    }

    /// Accumulate every point of `points`, failing on the first one with the wrong dimension.
    pub fn from_points<I>(dimensions: usize, points: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut cluster = Self::new(dimensions);
        for point in points {
            cluster.add(point)?;
        }
        Ok(cluster)
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Point> {
        self.members.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.members.get(index)
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.members.contains(point)
    }

    /// Add a point. On a dimension mismatch the accumulator is left untouched.
    pub fn add(&mut self, point: Point) -> Result<()> {
        point.ensure_dimensions(self.dimensions)?;

        let values = point.values();
        if self.members.is_empty() {
            self.min.assign(&values);
            self.max.assign(&values);
        } else {
            Zip::from(&mut self.min)
                .and(&mut self.max)
                .and(&values)
                .for_each(|lo, hi, &value| {
                    if value < *lo {
                        *lo = value;
                    }
                    if value > *hi {
                        *hi = value;
                    }
                });
        }
        self.sum += &values;

        self.members.push(point);
        self.refresh_mean();
        self.standard_deviation.take();
        Ok(())
    }

    /// Remove one member equal to `point` and return it.
    pub fn remove(&mut self, point: &Point) -> Result<Point> {
        let position = self
            .members
            .iter()
            .position(|member| member == point)
            .ok_or(KMeansError::NotFound)?;
        let removed = self.members.remove(position);
        self.standard_deviation.take();

        if self.members.is_empty() {
            self.sum.fill(0.0);
            self.min.fill(0.0);
            self.max.fill(0.0);
            self.mean.fill(0.0);
            return Ok(removed);
        }

        self.sum -= &removed.values();
        for (dimension, &value) in removed.values().iter().enumerate() {
            if value == self.min[dimension] || value == self.max[dimension] {
                self.rescan_extrema(dimension);
            }
        }
        self.refresh_mean();
        Ok(removed)
    }

    fn rescan_extrema(&mut self, dimension: usize) {
        let (lo, hi) = self
            .members
            .iter()
            .map(|member| member.values()[dimension])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
                (lo.min(value), hi.max(value))
            });
        self.min[dimension] = lo;
        self.max[dimension] = hi;
    }

    fn refresh_mean(&mut self) {
        let count = self.members.len() as f64;
        self.mean = &self.sum / count;
    }

    fn statistic(&self, values: &Array1<f64>) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        Some(Point::from_array(values.clone()))
    }

    /// Per-dimension minimum, not necessarily a member. `None` when empty.
    pub fn min(&self) -> Option<Point> {
        self.statistic(&self.min)
    }

    /// Per-dimension maximum, not necessarily a member. `None` when empty.
    pub fn max(&self) -> Option<Point> {
        self.statistic(&self.max)
    }

    pub fn sum(&self) -> Point {
        Point::from_array(self.sum.clone())
    }

    /// Centroid of the members. `None` when empty.
    pub fn mean(&self) -> Option<Point> {
        self.statistic(&self.mean)
    }

    /// Population standard deviation per dimension. `None` when empty.
    pub fn standard_deviation(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }

        let deviation = self.standard_deviation.get_or_init(|| {
            let mut squares = Array1::<f64>::zeros(self.dimensions);
            for member in &self.members {
                let diff = &member.values() - &self.mean;
                squares += &(&diff * &diff);
            }
            (squares / self.members.len() as f64).mapv_into(f64::sqrt)
        });
        Some(Point::from_array(deviation.clone()))
    }

    /// Sum of the distances of every member to the mean (WC of this cluster).
    pub fn compactness(&self, distance: DistanceFn) -> Result<f64> {
        let Some(mean) = self.mean() else {
            return Ok(0.0);
        };

        self.members.iter().map(|member| distance(member, &mean)).sum()
    }
}

impl<'a> IntoIterator for &'a ClusterAccumulator {
    type Item = &'a Point;
    type IntoIter = slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
