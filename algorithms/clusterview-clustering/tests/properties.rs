use clusterview::{ClusterAssignment, Point};
use clusterview_clustering::{run_dbscan, run_kmeans, ClusteringError};
use proptest::prelude::*;

fn points() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 0..60)
        .prop_map(|coords| coords.into_iter().map(Point::from).collect())
}

proptest! {
    #[test]
    fn prop_kmeans_labels_every_point(data in points(), k in 1usize..10, seed in any::<u64>()) {
        match run_kmeans(&data, k, seed) {
            Ok(outcome) => {
                prop_assert!(k <= data.len());
                prop_assert_eq!(outcome.assignments.len(), data.len());
                prop_assert_eq!(outcome.centroids.len(), k);
                for label in &outcome.assignments {
                    prop_assert!(matches!(label, ClusterAssignment::Cluster(c) if *c < k));
                }
            }
            Err(ClusteringError::EmptyInput) => prop_assert!(data.is_empty()),
            Err(ClusteringError::InvalidParameter(_)) => prop_assert!(k > data.len()),
        }
    }

    #[test]
    fn prop_kmeans_is_repeatable(data in points(), k in 1usize..5, seed in any::<u64>()) {
        prop_assume!(k <= data.len());
        let first = run_kmeans(&data, k, seed).unwrap();
        let second = run_kmeans(&data, k, seed).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_kmeans_points_sit_at_their_closest_centroid(
        data in points(),
        k in 1usize..5,
        seed in any::<u64>()
    ) {
        prop_assume!(k <= data.len());
        let outcome = run_kmeans(&data, k, seed).unwrap();
        for (point, label) in data.iter().zip(&outcome.assignments) {
            let own = point.distance(&outcome.centroids[label.cluster().unwrap()]);
            for centroid in &outcome.centroids {
                prop_assert!(own <= point.distance(centroid) + 1e-9);
            }
        }
    }

    #[test]
    fn prop_dbscan_labels_every_point(
        data in points(),
        epsilon in 1.0f64..100.0,
        min_points in 1usize..10
    ) {
        let labels = run_dbscan(&data, epsilon, min_points).unwrap();
        prop_assert_eq!(labels.len(), data.len());

        // Cluster indices are dense and every cluster holds a core point
        let n_clusters = labels.iter().filter_map(|l| l.cluster()).max().map_or(0, |m| m + 1);
        for cluster in 0..n_clusters {
            let has_core = data.iter().zip(&labels).any(|(p, l)| {
                l.cluster() == Some(cluster)
                    && data.iter().filter(|q| p.distance(q) <= epsilon).count() >= min_points
            });
            prop_assert!(has_core);
        }

        // Core points are never noise
        for (p, label) in data.iter().zip(&labels) {
            let neighbours = data.iter().filter(|q| p.distance(q) <= epsilon).count();
            if neighbours >= min_points {
                prop_assert!(!label.is_noise());
            }
        }
    }

    #[test]
    fn prop_dbscan_is_repeatable(
        data in points(),
        epsilon in 1.0f64..100.0,
        min_points in 1usize..10
    ) {
        let first = run_dbscan(&data, epsilon, min_points).unwrap();
        let second = run_dbscan(&data, epsilon, min_points).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_dbscan_rejects_non_positive_epsilon(data in points(), epsilon in -10.0f64..=0.0) {
        prop_assert!(matches!(
            run_dbscan(&data, epsilon, 2),
            Err(ClusteringError::InvalidParameter(_))
        ));
    }
}
