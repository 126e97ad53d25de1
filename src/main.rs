use kmeans_incremental::logger::init_logger;
use kmeans_incremental::{points_from_rows, ClusterAccumulator, KMeans, KMeansConfig, Point};

/// Run k-means once per seed and keep the initialization with the lowest WC.
fn kmeans(
    data: &[Point],
    k: usize,
    max_iters: usize,
    num_initializations: u64,
) -> kmeans_incremental::Result<Option<KMeans>> {
    let mut best: Option<KMeans> = None;
    let mut best_wc = f64::MAX;
    let mut wc_per_initialization: Vec<f64> = vec![];

    for initialization_index in 0..num_initializations {
        let config = KMeansConfig::new(k)
            .with_max_iters(max_iters)
            .with_seed(initialization_index);
        let mut kmeans = KMeans::new(data.to_vec(), config)?;
        let status = kmeans.run()?;

        let wc = kmeans.within_cluster_compactness()?;
        log::info!(
            "Finished KMeans for initialization #{} ({:?}) - WC: {}",
            initialization_index,
            status,
            wc
        );
        wc_per_initialization.push(wc);

        if wc < best_wc {
            best_wc = wc;
            best = Some(kmeans);
        }
    }

    log::info!("Finished all initializations!");
    log::info!("WC per initialization: {:?}", wc_per_initialization);

    Ok(best)
}

fn describe(cluster: &ClusterAccumulator) {
    match (cluster.min(), cluster.max(), cluster.mean(), cluster.standard_deviation()) {
        (Some(min), Some(max), Some(mean), Some(sd)) => {
            log::info!("size: {}", cluster.len());
            log::info!("min: {}", min);
            log::info!("max: {}", max);
            log::info!("mean: {}", mean);
            log::info!("standard deviation: {}", sd);
        }
        _ => log::info!("empty cluster"),
    }
}

fn main() {
    init_logger().expect("Failed to initialize logger");

    let series = points_from_rows(&[
        vec![5],
        vec![5],
        vec![10],
        vec![10],
        vec![10],
        vec![10],
        vec![15],
        vec![15],
        vec![20],
    ])
    .expect("Failed to build the 1-D series");
    let single =
        ClusterAccumulator::from_points(1, series).expect("Failed to accumulate the 1-D series");
    describe(&single);

    let test_dataset = points_from_rows(&[
        vec![34u32, 118],
        vec![34, 118],
        vec![34, 118],
        vec![34, 118],

        vec![40, 74],
        vec![40, 74],
        vec![40, 74],
        vec![40, 74],

        vec![37, 122],
        vec![37, 122],
        vec![37, 122],
        vec![37, 122],
    ])
    .expect("Failed to build the test dataset");

    let Some(best) = kmeans(&test_dataset, 2, 301, 5).expect("error during kmeans") else {
        return;
    };
    for (idx, (center, cluster)) in best.centers().iter().zip(best.clusters()).enumerate() {
        log::info!("cluster {}: center {}", idx, center);
        describe(cluster);
    }
    best.trace().expect("error while tracing the result");
}
