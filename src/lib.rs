//! # kmeans-incremental
//!
//! K-means clustering of n-dimensional points with per-cluster statistics
//! that are kept up to date as points move between clusters.
//!
//! Each cluster is a [`ClusterAccumulator`] holding its members and their
//! running count, sum, minimum, maximum and mean per dimension; the standard
//! deviation is derived on demand. The [`KMeans`] engine assigns every point
//! to its nearest center, moves the centers to the cluster means, and stops
//! once a full pass moves no point.
//!
//! ## Example
//!
//! ```rust
//! use kmeans_incremental::{points_from_rows, KMeans, KMeansConfig, RunStatus};
//!
//! let data = points_from_rows(&[vec![1], vec![2], vec![3], vec![20], vec![21], vec![22]]).unwrap();
//!
//! let mut kmeans = KMeans::new(data, KMeansConfig::new(2).with_seed(42)).unwrap();
//! let status = kmeans.run().unwrap();
//! assert!(matches!(status, RunStatus::Converged { .. }));
//!
//! let total: usize = kmeans.clusters().iter().map(|c| c.len()).sum();
//! assert_eq!(total, 6);
//! println!("WC = {}", kmeans.within_cluster_compactness().unwrap());
//! ```
//!
//! ## Distances
//!
//! The metric is a plain function pointer ([`DistanceFn`]). Euclidian distance
//! is the default; [`manhattan_distance`] and [`earth_movers_distance`] can be
//! swapped in through [`KMeansConfig::with_distance`], as can any function
//! with the same signature.

mod algorithm;
mod cluster;
mod config;
mod distance;
mod error;
mod inertia;
mod initialization;
pub mod logger;
mod point;

pub use algorithm::{nearest_center, KMeans, RunStatus};
pub use cluster::ClusterAccumulator;
pub use config::KMeansConfig;
pub use distance::{earth_movers_distance, euclidian_distance, manhattan_distance, DistanceFn};
pub use error::{KMeansError, Result};
pub use inertia::{between_cluster_separation, separation_ratio, within_cluster_compactness};
pub use initialization::{random_centers, validate_centers};
pub use point::{points_from_rows, Point};
