use approx::assert_relative_eq;
use kmeans_incremental::{
    euclidian_distance, manhattan_distance, points_from_rows, ClusterAccumulator, KMeans, KMeansConfig,
    KMeansError, Point, RunStatus,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn line(values: &[f64]) -> Vec<Point> {
    values.iter().map(|&v| Point::new(vec![v])).collect()
}

/// Random points scattered around three well separated 2-D centers
fn three_blobs(seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let centers = [(-10.0, -10.0), (0.0, 10.0), (10.0, -10.0)];

    (0..90)
        .map(|i| {
            let (cx, cy) = centers[i % 3];
            Point::new(vec![cx + rng.gen_range(-1.0..1.0), cy + rng.gen_range(-1.0..1.0)])
        })
        .collect()
}

fn sorted_centers_1d(kmeans: &KMeans) -> Vec<f64> {
    let mut centers: Vec<f64> = kmeans
        .centers()
        .iter()
        .map(|c| c.value_at(0).unwrap())
        .collect();
    centers.sort_by(|a, b| a.partial_cmp(b).unwrap());
    centers
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_single_cluster_statistics() {
    let data = line(&[5.0, 5.0, 10.0, 10.0, 10.0, 10.0, 15.0, 15.0, 20.0]);
    let mut kmeans = KMeans::new(data, KMeansConfig::new(1)).unwrap();
    assert!(matches!(kmeans.run().unwrap(), RunStatus::Converged { .. }));

    let cluster = &kmeans.clusters()[0];
    assert_eq!(cluster.len(), 9);
    assert_eq!(cluster.min().unwrap().value_at(0).unwrap(), 5.0);
    assert_eq!(cluster.max().unwrap().value_at(0).unwrap(), 20.0);
    assert_relative_eq!(cluster.mean().unwrap().value_at(0).unwrap(), 11.111, epsilon = 1e-3);
    assert_relative_eq!(
        cluster.standard_deviation().unwrap().value_at(0).unwrap(),
        4.581,
        epsilon = 1e-3
    );
    assert_relative_eq!(kmeans.centers()[0].value_at(0).unwrap(), 100.0 / 9.0, epsilon = 1e-9);
}

#[test]
fn test_statistics_track_membership_after_mixed_updates() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let pool: Vec<Point> = (0..40)
        .map(|_| Point::new(vec![rng.gen_range(-50.0..50.0), rng.gen_range(0.0..5.0)]))
        .collect();

    let mut cluster = ClusterAccumulator::from_points(2, pool.iter().cloned()).unwrap();
    for point in pool.iter().step_by(3) {
        cluster.remove(point).unwrap();
    }
    let widest = cluster
        .iter()
        .max_by(|a, b| a.value_at(0).unwrap().partial_cmp(&b.value_at(0).unwrap()).unwrap())
        .cloned()
        .unwrap();
    cluster.remove(&widest).unwrap();

    let members: Vec<&Point> = cluster.iter().collect();
    assert_eq!(members.len(), cluster.len());
    for dimension in 0..2 {
        let values: Vec<f64> = members.iter().map(|p| p.value_at(dimension).unwrap()).collect();
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        assert_eq!(cluster.min().unwrap().value_at(dimension).unwrap(), lo);
        assert_eq!(cluster.max().unwrap().value_at(dimension).unwrap(), hi);
        assert_relative_eq!(cluster.mean().unwrap().value_at(dimension).unwrap(), mean, epsilon = 1e-9);
    }
}

#[test]
fn test_removing_current_extremum() {
    let mut cluster = ClusterAccumulator::from_points(1, line(&[3.0, -7.0, 12.0, 4.0])).unwrap();

    cluster.remove(&Point::new(vec![12.0])).unwrap();
    cluster.remove(&Point::new(vec![-7.0])).unwrap();

    assert_eq!(cluster.min().unwrap().value_at(0).unwrap(), 3.0);
    assert_eq!(cluster.max().unwrap().value_at(0).unwrap(), 4.0);
    assert_eq!(cluster.mean().unwrap().value_at(0).unwrap(), 3.5);
}

#[test]
fn test_dimension_mismatch_on_add() {
    let mut cluster = ClusterAccumulator::from_points(
        2,
        vec![Point::new(vec![1.0, 1.0]), Point::new(vec![3.0, 5.0])],
    )
    .unwrap();
    let before_mean = cluster.mean();

    let result = cluster.add(Point::new(vec![0.0, 0.0, 0.0]));
    assert!(matches!(result, Err(KMeansError::DimensionMismatch { expected: 2, found: 3 })));
    assert_eq!(cluster.len(), 2);
    assert_eq!(cluster.mean(), before_mean);
    assert_eq!(cluster.max().unwrap(), Point::new(vec![3.0, 5.0]));
}

// ============================================================================
// Clustering
// ============================================================================

#[test]
fn test_two_groups_with_explicit_centers() {
    let data = line(&[1.0, 2.0, 3.0, 20.0, 21.0, 22.0]);
    let mut kmeans = KMeans::with_centers(data, KMeansConfig::new(2), line(&[0.0, 30.0])).unwrap();

    assert!(matches!(kmeans.run().unwrap(), RunStatus::Converged { .. }));
    assert_eq!(
        kmeans.labels(),
        vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]
    );
    assert_relative_eq!(kmeans.centers()[0].value_at(0).unwrap(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(kmeans.centers()[1].value_at(0).unwrap(), 21.0, epsilon = 1e-9);
}

#[test]
fn test_two_groups_with_random_centers() {
    for seed in 0..8 {
        let data = line(&[1.0, 2.0, 3.0, 20.0, 21.0, 22.0]);
        let mut kmeans = KMeans::new(data, KMeansConfig::new(2).with_seed(seed)).unwrap();
        kmeans.run().unwrap();

        let centers = sorted_centers_1d(&kmeans);
        assert_relative_eq!(centers[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(centers[1], 21.0, epsilon = 1e-9);

        let labels = kmeans.labels();
        assert!(labels[..3].iter().all(|l| *l == labels[0]));
        assert!(labels[3..].iter().all(|l| *l == labels[3]));
        assert_ne!(labels[0], labels[3]);
    }
}

#[test]
fn test_conservation_across_iterations() {
    let data = three_blobs(11);
    let n = data.len();
    let mut kmeans = KMeans::new(data, KMeansConfig::new(3).with_seed(5)).unwrap();

    loop {
        let changed = kmeans.step().unwrap();
        let total: usize = kmeans.clusters().iter().map(ClusterAccumulator::len).sum();
        assert_eq!(total, n);

        for (idx, point) in kmeans.points().iter().enumerate() {
            let cluster = point.cluster().expect("every point is assigned after a step");
            assert!(kmeans.clusters()[cluster].contains(point), "point {} lost", idx);
            // blob coordinates are continuous draws, so values are unique
            let holders = kmeans.clusters().iter().filter(|c| c.contains(point)).count();
            assert_eq!(holders, 1, "point {} held by {} clusters", idx, holders);
        }
        if !changed {
            break;
        }
    }
}

#[test]
fn test_converged_step_is_idempotent() {
    let mut kmeans = KMeans::new(three_blobs(2), KMeansConfig::new(3).with_seed(9)).unwrap();
    let status = kmeans.run().unwrap();
    let RunStatus::Converged { iterations } = status else {
        panic!("unbounded run must converge, got {:?}", status);
    };

    let labels = kmeans.labels();
    let centers = kmeans.centers().to_vec();

    assert!(!kmeans.step().unwrap());
    assert_eq!(kmeans.labels(), labels);
    assert_eq!(kmeans.centers(), centers.as_slice());
    assert_eq!(kmeans.iterations(), iterations + 1);
}

#[test]
fn test_centers_match_cluster_means() {
    let mut kmeans = KMeans::new(three_blobs(4), KMeansConfig::new(3).with_seed(1)).unwrap();
    kmeans.run().unwrap();

    for (center, cluster) in kmeans.centers().iter().zip(kmeans.clusters()) {
        if let Some(mean) = cluster.mean() {
            assert_eq!(center, &mean);
        }
    }
}

#[test]
fn test_random_centers_over_extreme_range() {
    let data = line(&[-1e308, 1e308, 1e308]);
    let kmeans = KMeans::new(data, KMeansConfig::new(2).with_seed(3)).unwrap();

    for center in kmeans.centers() {
        let x = center.value_at(0).unwrap();
        assert!(x.is_finite());
        assert!((-1e308..=1e308).contains(&x));
    }
}

#[test]
fn test_caller_owned_random_source() {
    let mut first_rng = ChaCha8Rng::seed_from_u64(77);
    let mut second_rng = ChaCha8Rng::seed_from_u64(77);

    let mut first = KMeans::with_rng(three_blobs(6), KMeansConfig::new(3), &mut first_rng).unwrap();
    let mut second = KMeans::with_rng(three_blobs(6), KMeansConfig::new(3), &mut second_rng).unwrap();
    assert_eq!(first.centers(), second.centers());

    first.run().unwrap();
    second.run().unwrap();
    assert_eq!(first.labels(), second.labels());
}

#[test]
fn test_max_iters() {
    let config = KMeansConfig::new(3).with_seed(0).with_max_iters(1);
    let mut kmeans = KMeans::new(three_blobs(8), config).unwrap();

    match kmeans.run().unwrap() {
        RunStatus::Converged { iterations } => assert_eq!(iterations, 1),
        RunStatus::MaxIterationsReached { iterations } => assert_eq!(iterations, 1),
    }
    assert_eq!(kmeans.iterations(), 1);
}

#[test]
fn test_manhattan_metric() {
    let data = points_from_rows(&[
        vec![0, 0],
        vec![1, 0],
        vec![0, 1],
        vec![10, 10],
        vec![11, 10],
        vec![10, 11],
    ])
    .unwrap();
    let config = KMeansConfig::new(2).with_distance(manhattan_distance);
    let centers = vec![Point::new(vec![0.0, 0.0]), Point::new(vec![10.0, 10.0])];
    let mut kmeans = KMeans::with_centers(data, config, centers).unwrap();
    kmeans.run().unwrap();

    assert_eq!(
        kmeans.labels(),
        vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]
    );
    // per cluster, L1 distances to the mean are 2/3, 1 and 1
    assert_relative_eq!(kmeans.within_cluster_compactness().unwrap(), 16.0 / 3.0, epsilon = 1e-9);
}

// ============================================================================
// Quality metrics
// ============================================================================

#[test]
fn test_quality_metrics() {
    let data = line(&[1.0, 2.0, 3.0, 20.0, 21.0, 22.0]);
    let mut kmeans = KMeans::with_centers(data, KMeansConfig::new(2), line(&[0.0, 30.0])).unwrap();
    kmeans.run().unwrap();

    let wc = kmeans.within_cluster_compactness().unwrap();
    let bc = kmeans.between_cluster_separation().unwrap();
    assert_relative_eq!(wc, 4.0, epsilon = 1e-9);
    assert_relative_eq!(bc, 19.0, epsilon = 1e-9);
    assert_relative_eq!(kmeans.separation_ratio().unwrap(), 19.0 / 4.0, epsilon = 1e-9);
}

#[test]
fn test_separation_ratio_when_points_coincide_with_centers() {
    let data = line(&[4.0, 4.0, 9.0, 9.0]);
    let mut kmeans = KMeans::with_centers(data, KMeansConfig::new(2), line(&[0.0, 10.0])).unwrap();
    kmeans.run().unwrap();

    assert_eq!(kmeans.within_cluster_compactness().unwrap(), 0.0);
    assert_relative_eq!(kmeans.between_cluster_separation().unwrap(), 5.0, epsilon = 1e-9);
    assert_eq!(kmeans.separation_ratio().unwrap(), 0.0);
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_invalid_centers() {
    let data = line(&[1.0, 2.0, 3.0]);

    let too_few = KMeans::with_centers(data.clone(), KMeansConfig::new(2), line(&[1.0]));
    assert!(matches!(too_few, Err(KMeansError::InvalidCenters(_))));

    let wrong_dimension = KMeans::with_centers(
        data,
        KMeansConfig::new(2),
        vec![Point::new(vec![1.0]), Point::new(vec![1.0, 2.0])],
    );
    assert!(matches!(wrong_dimension, Err(KMeansError::InvalidCenters(_))));
}

#[test]
fn test_distance_dimension_mismatch() {
    let result = euclidian_distance(&Point::new(vec![1.0]), &Point::new(vec![1.0, 2.0]));
    assert!(matches!(result, Err(KMeansError::DimensionMismatch { .. })));
}

#[test]
fn test_remove_non_member() {
    let mut cluster = ClusterAccumulator::from_points(1, line(&[1.0])).unwrap();
    assert!(matches!(cluster.remove(&Point::new(vec![2.0])), Err(KMeansError::NotFound)));
}
