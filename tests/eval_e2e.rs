//! End-to-end recall: IVF-Flat against exact ground truth.

use ivfflat::eval::{mean_recall, recall_at_k};
use ivfflat::{
    Dataset, DistanceMetric, ExactIndex, IvfFlatIndex, IvfParams, NearestNeighbors, NoopObserver,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Points scattered around a handful of well-separated centers.
fn clustered(n: usize, dim: usize, centers: usize, rng: &mut StdRng) -> Dataset {
    let anchors: Vec<Vec<f32>> = (0..centers)
        .map(|_| (0..dim).map(|_| rng.random_range(-50.0..50.0)).collect())
        .collect();
    let flat: Vec<f32> = (0..n)
        .flat_map(|i| {
            let anchor = &anchors[i % centers];
            anchor
                .iter()
                .map(|a| a + rng.random_range(-1.0f32..1.0))
                .collect::<Vec<_>>()
        })
        .collect();
    Dataset::from_flat(flat, dim).unwrap()
}

#[test]
fn recall_grows_with_probes_and_reaches_one() {
    let mut rng = StdRng::seed_from_u64(11);
    let dataset = clustered(1_000, 8, 10, &mut rng);
    let queries: Vec<Vec<f32>> = (0..25)
        .map(|_| (0..8).map(|_| rng.random_range(-50.0..50.0)).collect())
        .collect();
    let k = 10;

    let params = IvfParams::default()
        .with_cluster_count(20)
        .with_iter_count(8)
        .with_seed(3);
    let ivf = IvfFlatIndex::build_with_measure(dataset.clone(), params, DistanceMetric::L2).unwrap();
    let exact = ExactIndex::with_measure(dataset, DistanceMetric::L2);

    let truth: Vec<Vec<u32>> = queries
        .iter()
        .map(|q| exact.nearest(q, k).unwrap().ids())
        .collect();

    let mut previous = 0.0;
    for probes in [1, 2, 5, 10, 20] {
        let got: Vec<Vec<u32>> = queries
            .iter()
            .map(|q| {
                ivf.search(q, k, probes, ivfflat::Direction::Nearest)
                    .unwrap()
                    .ids()
            })
            .collect();
        let recall = mean_recall(&truth, &got, k);
        assert!(
            recall + 1e-6 >= previous,
            "recall dropped from {previous} to {recall} at {probes} probes"
        );
        previous = recall;
    }
    assert!((previous - 1.0).abs() < 1e-6);
}

#[test]
fn one_probe_suffices_when_clusters_match_the_data() {
    let mut rng = StdRng::seed_from_u64(12);
    let dataset = clustered(500, 4, 5, &mut rng);
    let params = IvfParams::default()
        .with_cluster_count(5)
        .with_iter_count(3)
        .with_min_probe_count(1);
    // Ids 0..5 sit in five different blobs.
    let (ivf, _) = IvfFlatIndex::build_from_initial(
        dataset.clone(),
        params,
        DistanceMetric::L2,
        &[0, 1, 2, 3, 4],
        NoopObserver,
    )
    .unwrap();
    assert!(ivf.clusters().iter().all(|c| c.len() == 100));
    let exact = ExactIndex::with_measure(dataset.clone(), DistanceMetric::L2);

    for id in (0..500).step_by(25) {
        let q = dataset.get(id).unwrap();
        let truth = exact.nearest(q, 5).unwrap().ids();
        let got = ivf.nearest(q, 5).unwrap().ids();
        assert_eq!(recall_at_k(&truth, &got, 5), 1.0);
    }
}
