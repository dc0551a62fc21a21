// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod algorithm;
mod correcting;
mod error;
mod service;
mod setting;
mod tree;
mod worker;

pub use algorithm::Algorithm;
pub use error::{ParseError, PathError};
pub use service::{CancelToken, PathFinder, SegmentObserver};
pub use tree::{AllPaths, Path, ShortestPathTree};
pub use worker::PathFindingWorker;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use geo::LineString;

    use super::service::SearchContext;
    use super::*;
    use crate::{
        CandidatePolicy, Label, LabelManager, LabelStructure, PermanentLabelHeap,
        PermanentLabelManager, StreetNetwork, StreetSegment,
    };

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-9),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    const ALL_ALGORITHMS: [Algorithm; 7] = [
        Algorithm::LabelSetting(LabelStructure::List),
        Algorithm::LabelSetting(LabelStructure::Heap { d: 2 }),
        Algorithm::LabelSetting(LabelStructure::Heap { d: 3 }),
        Algorithm::LabelSetting(LabelStructure::Heap { d: 5 }),
        Algorithm::LabelSetting(LabelStructure::Buckets),
        Algorithm::LabelCorrecting(CandidatePolicy::Oldest),
        Algorithm::LabelCorrecting(CandidatePolicy::Newest),
    ];

    fn segment(id: &str, tail: usize, head: usize, length: f64) -> Arc<StreetSegment> {
        Arc::new(StreetSegment::new(
            id,
            tail,
            head,
            length,
            Arc::new(LineString::from(vec![(tail as f64, 0.0), (head as f64, 1.0)])),
        ))
    }

    /// Deterministic pseudo-random lengths in `[0.0, 10.0)`, with three decimal places.
    fn lengths(mut state: u64) -> impl FnMut() -> f64 {
        move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % 10_000) as f64 / 1000.0
        }
    }

    /// A `size × size` lattice with segments in both directions between neighbours,
    /// plus a few one-way diagonals and an isolated pair of intersections at the end.
    fn lattice(size: usize, seed: u64) -> StreetNetwork {
        let mut next_length = lengths(seed);
        let mut segments = Vec::default();
        let id = |row: usize, col: usize| row * size + col;

        for row in 0..size {
            for col in 0..size {
                let here = id(row, col);
                if col + 1 < size {
                    let right = id(row, col + 1);
                    segments.push(segment(&format!("{}>{}", here, right), here, right, next_length()));
                    segments.push(segment(&format!("{}>{}", right, here), right, here, next_length()));
                }
                if row + 1 < size {
                    let below = id(row + 1, col);
                    segments.push(segment(&format!("{}>{}", here, below), here, below, next_length()));
                    segments.push(segment(&format!("{}>{}", below, here), below, here, next_length()));
                }
                if row + 1 < size && col + 1 < size && (row + col) % 3 == 0 {
                    let diagonal = id(row + 1, col + 1);
                    segments.push(segment(&format!("{}>{}", here, diagonal), here, diagonal, next_length()));
                }
            }
        }

        let island = size * size;
        segments.push(segment("island", island, island + 1, 1.0));
        StreetNetwork::from_segments(segments)
    }

    #[test]
    fn prefers_shorter_indirect_path() {
        // A(0) -> B(1): 2, B -> C(2): 3, A -> C: 6
        let network = StreetNetwork::from_segments([
            segment("A-B", 0, 1, 2.0),
            segment("B-C", 1, 2, 3.0),
            segment("A-C", 0, 2, 6.0),
        ]);

        for algorithm in ALL_ALGORITHMS {
            let mut finder = PathFinder::new(algorithm);
            let mut all_paths = AllPaths::default();
            let path = finder.find_path(2, 0, &network, &mut all_paths).unwrap();

            assert_eq!(
                path.keys().map(String::as_str).collect::<Vec<_>>(),
                vec!["B-C", "A-B"],
                "{}",
                algorithm
            );
            assert_almost_eq!(path.values().map(|s| s.length()).sum::<f64>(), 5.0);

            let tree = finder.shortest_path_tree(0, &network).unwrap();
            assert_eq!(tree.distance(0), Some(0.0));
            assert_eq!(tree.distance(1), Some(2.0));
            assert_eq!(tree.distance(2), Some(5.0));
        }
    }

    #[test]
    fn all_algorithms_agree() {
        for seed in [1, 7, 42] {
            let network = lattice(8, seed);
            let destination = 27;

            let reference = PathFinder::new(Algorithm::LabelSetting(LabelStructure::List))
                .shortest_path_tree(destination, &network)
                .unwrap();

            for algorithm in ALL_ALGORITHMS {
                let tree = PathFinder::new(algorithm)
                    .shortest_path_tree(destination, &network)
                    .unwrap();

                for id in 0..network.len() {
                    match (reference.distance(id), tree.distance(id)) {
                        (Some(a), Some(b)) => assert_almost_eq!(a, b),
                        (a, b) => assert_eq!(a, b, "{} at {}", algorithm, id),
                    }
                }
            }
        }
    }

    #[test]
    fn path_lengths_match_distances() {
        let network = lattice(6, 3);
        let mut finder = PathFinder::new(Algorithm::LabelSetting(LabelStructure::Heap { d: 4 }));
        let tree = finder.shortest_path_tree(0, &network).unwrap();

        for origin in 0..36 {
            let path = tree.path_from(origin);
            let total: f64 = path.values().map(|s| s.length()).sum();
            assert_almost_eq!(total, tree.distance(origin).unwrap());

            // Each segment starts where the following one ends
            let segments = path.values().collect::<Vec<_>>();
            if let Some(first) = segments.first() {
                assert_eq!(first.head(), origin);
            }
            for pair in segments.windows(2) {
                assert_eq!(pair[0].tail(), pair[1].head());
            }
            if let Some(last) = segments.last() {
                assert_eq!(last.tail(), 0);
            }
        }
    }

    #[test]
    fn searches_are_idempotent() {
        let network = lattice(7, 11);
        for algorithm in ALL_ALGORITHMS {
            let mut finder = PathFinder::new(algorithm);
            let mut first_cache = AllPaths::default();
            let mut second_cache = AllPaths::default();

            let first = finder.find_path(48, 3, &network, &mut first_cache).unwrap();
            let second = finder.find_path(48, 3, &network, &mut second_cache).unwrap();

            assert_eq!(first, second);
            assert_eq!(first_cache, second_cache);
        }
    }

    #[test]
    fn unreachable_destination_gives_empty_path() {
        let network = lattice(4, 5);
        let island = 16;
        let mut all_paths = AllPaths::default();

        for algorithm in ALL_ALGORITHMS {
            let path = PathFinder::new(algorithm)
                .find_path(island, 0, &network, &mut all_paths)
                .unwrap();
            assert!(path.is_empty());

            let tree = PathFinder::new(algorithm).shortest_path_tree(0, &network).unwrap();
            assert_eq!(tree.distance(island), None);
            assert_eq!(tree.distance(island + 1), None);
            assert!(tree.labels()[island].predecessor().is_none());
        }

        assert!(!all_paths.contains_key("island"));
    }

    #[test]
    fn origin_equal_to_destination() {
        let network = lattice(3, 2);
        let path = PathFinder::default()
            .find_path(4, 4, &network, &mut AllPaths::default())
            .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn invalid_references() {
        let network = lattice(3, 2);
        let mut finder = PathFinder::default();
        let mut all_paths = AllPaths::default();

        assert_eq!(
            finder.find_path(100, 0, &network, &mut all_paths),
            Err(PathError::InvalidReference(100))
        );
        assert_eq!(
            finder.find_path(0, 100, &network, &mut all_paths),
            Err(PathError::InvalidReference(100))
        );
        assert!(all_paths.is_empty());
    }

    #[test]
    fn all_paths_are_keyed_by_first_segment() {
        let network = lattice(5, 9);
        let destination = 12;
        let mut finder = PathFinder::default();
        let mut all_paths = AllPaths::default();
        finder
            .find_path(0, destination, &network, &mut all_paths)
            .unwrap();

        // Every intersection of the lattice except the destination is reachable
        assert_eq!(all_paths.len(), 24);

        let tree = finder.shortest_path_tree(destination, &network).unwrap();
        for origin in (0..25).filter(|&o| o != destination) {
            let expected = tree.path_from(origin);
            let (first, _) = expected.first().unwrap();
            assert_eq!(all_paths[first], expected);
        }
    }

    #[test]
    fn observers_receive_growing_sets() {
        let network = lattice(4, 1);
        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::default();

        let mut finder = PathFinder::new(Algorithm::LabelSetting(LabelStructure::Heap { d: 2 }));
        let sink = seen.clone();
        finder.add_observer(move |ids: &[String]| sink.lock().unwrap().push(ids.to_vec()));
        finder.shortest_path_tree(0, &network).unwrap();

        let seen = seen.lock().unwrap();
        // One notification per settled intersection
        assert_eq!(seen.len(), 16);
        for pair in seen.windows(2) {
            assert!(pair[0].len() <= pair[1].len());
            assert!(pair[0].iter().all(|id| pair[1].contains(id)));
        }
        assert!(seen.last().unwrap().contains(&"0>1".to_string()));
    }

    #[test]
    fn cancelled_search() {
        let network = lattice(4, 1);
        let token = CancelToken::default();
        token.cancel();
        for algorithm in ALL_ALGORITHMS {
            let mut finder = PathFinder::new(algorithm);
            finder.set_cancel_token(token.clone());
            assert_eq!(
                finder.shortest_path_tree(0, &network),
                Err(PathError::Cancelled)
            );
        }
    }

    #[test]
    fn cancelling_from_an_observer() {
        let network = lattice(6, 4);
        let token = CancelToken::default();
        let mut finder = PathFinder::new(Algorithm::LabelCorrecting(CandidatePolicy::Newest));
        finder.set_cancel_token(token.clone());

        let mut iterations = 0;
        finder.add_observer(move |_: &[String]| {
            iterations += 1;
            if iterations == 5 {
                token.cancel();
            }
        });

        assert_eq!(
            finder.find_path(35, 0, &network, &mut AllPaths::default()),
            Err(PathError::Cancelled)
        );
    }

    /// Wraps a [PermanentLabelManager], asserting that permanent labels never change.
    struct Audited<M> {
        inner: M,
        finalized: Vec<(usize, f64)>,
    }

    impl<M: PermanentLabelManager> Audited<M> {
        fn check(&self) {
            for &(id, value) in &self.finalized {
                assert_eq!(self.inner.label(id).unwrap().value(), value);
                assert!(self.inner.label(id).unwrap().is_permanent());
            }
        }
    }

    impl<M: PermanentLabelManager> LabelManager for Audited<M> {
        fn adjust_head_value(&mut self, segment: &Arc<StreetSegment>) {
            self.inner.adjust_head_value(segment);
            self.check();
        }

        fn seed(&mut self, id: usize) {
            self.inner.seed(id);
        }

        fn label(&self, id: usize) -> Option<&Label> {
            self.inner.label(id)
        }

        fn labels(&self) -> &[Label] {
            self.inner.labels()
        }

        fn into_labels(self) -> Vec<Label> {
            self.inner.into_labels()
        }
    }

    impl<M: PermanentLabelManager> PermanentLabelManager for Audited<M> {
        fn smallest_label(&mut self) -> Option<usize> {
            let smallest = self.inner.smallest_label();
            if let (Some(id), Some(&(_, last))) = (smallest, self.finalized.last()) {
                assert!(self.inner.label(id).unwrap().value() >= last);
            }
            smallest
        }

        fn make_permanent(&mut self, id: usize) {
            self.inner.make_permanent(id);
            let value = self.inner.label(id).unwrap().value();
            self.finalized.push((id, value));
        }
    }

    #[test]
    fn permanent_labels_are_final() {
        let network = lattice(7, 13);
        let mut observers = Vec::default();
        let mut ctx = SearchContext::new(&mut observers, None);
        let audited = Audited {
            inner: PermanentLabelHeap::new(3, network.len()),
            finalized: Vec::default(),
        };

        let labels = setting::run(audited, 10, &network, &mut ctx).unwrap();
        assert_eq!(labels.iter().filter(|l| l.is_permanent()).count(), 49);
    }

    #[test]
    fn background_worker() {
        let network = Arc::new(lattice(5, 21));
        let worker = PathFindingWorker::spawn(
            PathFinder::new(Algorithm::LabelSetting(LabelStructure::Buckets)),
            24,
            0,
            network.clone(),
            true,
        );

        let updates = worker.progress().iter().collect::<Vec<_>>();
        let (path, all_paths) = worker.join().unwrap();

        // One message per settled intersection, each carrying only fresh ids
        assert_eq!(updates.len(), 25);
        let mut received = updates.concat();
        // 80 lattice segments and 6 diagonals; the island is unreachable
        assert_eq!(received.len(), 86);
        received.sort();
        received.dedup();
        assert_eq!(received.len(), 86);
        assert!(updates[0].contains(&"0>1".to_string()));
        assert!(updates.iter().skip(1).all(|u| !u.contains(&"0>1".to_string())));

        assert!(!path.is_empty());
        assert_eq!(all_paths.len(), 24);

        let expected = PathFinder::new(Algorithm::LabelSetting(LabelStructure::List))
            .find_path(24, 0, &network, &mut AllPaths::default())
            .unwrap();
        assert_almost_eq!(
            path.values().map(|s| s.length()).sum::<f64>(),
            expected.values().map(|s| s.length()).sum::<f64>()
        );
    }

    #[test]
    fn background_worker_invalid_reference() {
        let network = Arc::new(lattice(2, 1));
        let worker = PathFindingWorker::spawn(PathFinder::default(), 0, 99, network, false);
        assert_eq!(worker.progress().iter().count(), 0);
        assert_eq!(worker.join().map(|_| ()), Err(PathError::InvalidReference(99)));
    }
}
