use std::fmt;

use itertools::Itertools;
use ndarray::{Array1, ArrayView1};
use num_traits::ToPrimitive;

use crate::error::{KMeansError, Result};

/// One n-dimensional observation.
///
/// The values never change after construction. The cluster annotation is
/// written only by the clustering engine while it reassigns points.
#[derive(Debug, Clone)]
pub struct Point {
    values: Array1<f64>,
    cluster: Option<usize>,
}

impl Point {
    pub fn new(values: Vec<f64>) -> Self {
        Self::from_array(Array1::from_vec(values))
    }

    pub(crate) fn from_array(values: Array1<f64>) -> Self {
        Self {
            values,
            cluster: None,
        }
    }

    /// Build a point from any primitive numeric row, e.g. a `Vec<u32>` histogram.
    pub fn from_raw<T: ToPrimitive>(raw: &[T]) -> Result<Self> {
        let values = raw
            .iter()
            .enumerate()
            .map(|(dimension, value)| value.to_f64().ok_or(KMeansError::NonNumeric { dimension }))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Self::new(values))
    }

    pub fn value_at(&self, dimension: usize) -> Result<f64> {
        self.values
            .get(dimension)
            .copied()
            .ok_or(KMeansError::IndexOutOfRange {
                index: dimension,
                dimensions: self.dimension_count(),
            })
    }

    pub fn dimension_count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Index of the cluster this point currently belongs to, `None` before the first pass.
    pub fn cluster(&self) -> Option<usize> {
        self.cluster
    }

    pub(crate) fn assign(&mut self, cluster: usize) {
        self.cluster = Some(cluster);
    }

    pub(crate) fn unassign(&mut self) {
        self.cluster = None;
    }

    pub(crate) fn ensure_dimensions(&self, expected: usize) -> Result<()> {
        if self.dimension_count() != expected {
            return Err(KMeansError::DimensionMismatch {
                expected,
                found: self.dimension_count(),
            });
        }
        Ok(())
    }
}

/// Componentwise equality of the values; the cluster annotation is ignored.
impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.values.iter().map(|v| format!("{:?}", v)).join(", "))
    }
}

/// Convert raw rows into points, rejecting rows whose arity differs from the first one.
pub fn points_from_rows<T: ToPrimitive>(rows: &[Vec<T>]) -> Result<Vec<Point>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let dimensions = first.len();

    rows.iter()
        .map(|row| {
            let point = Point::from_raw(row)?;
            point.ensure_dimensions(dimensions)?;
            Ok(point)
        })
        .collect()
}
