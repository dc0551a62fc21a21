// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};

use super::{correcting, setting, AllPaths, Algorithm, Path, PathError, ShortestPathTree};
use crate::{
    CandidateLabelList, IntersectionId, LabelStructure, PermanentLabelBuckets, PermanentLabelHeap,
    PermanentLabelList, StreetNetwork, StreetSegment,
};

/// Receives the ids of all segments relaxed so far, once per iteration of a search.
///
/// The slice only ever grows between calls of a single search: ids are appended,
/// never removed or reordered. Notifications are meant for progressive display only;
/// the stream is finite and can't be restarted.
pub trait SegmentObserver: Send {
    fn handle_street_segments(&mut self, segment_ids: &[String]);
}

impl<F: FnMut(&[String]) + Send> SegmentObserver for F {
    fn handle_street_segments(&mut self, segment_ids: &[String]) {
        self(segment_ids)
    }
}

/// Cooperative cancellation flag for a running search.
///
/// Cloned tokens share the flag. A search checks it between iterations of
/// its outer loop and returns [PathError::Cancelled], discarding all labels.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-search state shared by both algorithms: observer notifications and cancellation.
pub(crate) struct SearchContext<'a> {
    observers: &'a mut [Box<dyn SegmentObserver>],
    cancel: Option<&'a CancelToken>,
    relaxed_ids: Vec<String>,
    relaxed_set: HashSet<String>,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(observers: &'a mut [Box<dyn SegmentObserver>], cancel: Option<&'a CancelToken>) -> Self {
        Self {
            observers,
            cancel,
            relaxed_ids: Vec::default(),
            relaxed_set: HashSet::default(),
        }
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), PathError> {
        match self.cancel {
            Some(token) if token.is_cancelled() => Err(PathError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Records the segments relaxed in one iteration and notifies the observers.
    pub(crate) fn relaxed(&mut self, segments: &[Arc<StreetSegment>]) {
        if self.observers.is_empty() {
            return;
        }

        for segment in segments {
            if self.relaxed_set.insert(segment.id().to_string()) {
                self.relaxed_ids.push(segment.id().to_string());
            }
        }

        for observer in self.observers.iter_mut() {
            observer.handle_street_segments(&self.relaxed_ids);
        }
    }
}

/// Finds shortest paths in a [StreetNetwork] with the configured [Algorithm].
///
/// Every search allocates its own labels, so the same finder may be reused
/// for any number of searches, over any networks.
pub struct PathFinder {
    algorithm: Algorithm,
    observers: Vec<Box<dyn SegmentObserver>>,
    cancel: Option<CancelToken>,
}

impl PathFinder {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            observers: Vec::default(),
            cancel: None,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Attaches an observer receiving intermediate results of every search.
    pub fn add_observer<O: SegmentObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// Detaches all observers.
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Makes searches check the provided token for cancellation.
    pub fn set_cancel_token(&mut self, token: CancelToken) {
        self.cancel = Some(token);
    }

    /// Computes shortest distances between `destination` and every intersection
    /// of the network. See [ShortestPathTree] on the direction of the search.
    ///
    /// Segment lengths must be non-negative, otherwise the result is undefined.
    pub fn shortest_path_tree(
        &mut self,
        destination: IntersectionId,
        network: &StreetNetwork,
    ) -> Result<ShortestPathTree, PathError> {
        if destination >= network.len() {
            return Err(PathError::InvalidReference(destination));
        }

        let size = network.len();
        let mut ctx = SearchContext::new(&mut self.observers, self.cancel.as_ref());
        let result = match self.algorithm {
            Algorithm::LabelSetting(LabelStructure::List) => {
                setting::run(PermanentLabelList::new(size), destination, network, &mut ctx)
            }
            Algorithm::LabelSetting(LabelStructure::Heap { d }) => {
                setting::run(PermanentLabelHeap::new(d, size), destination, network, &mut ctx)
            }
            Algorithm::LabelSetting(LabelStructure::Buckets) => {
                setting::run(PermanentLabelBuckets::new(size), destination, network, &mut ctx)
            }
            Algorithm::LabelCorrecting(policy) => correcting::run(
                CandidateLabelList::new(policy, size),
                destination,
                network,
                &mut ctx,
            ),
        };

        match result {
            Ok(labels) => Ok(ShortestPathTree::new(destination, labels)),
            Err(e) => {
                warn!("{} search to {} aborted: {}", self.algorithm, destination, e);
                Err(e)
            }
        }
    }

    /// Finds the shortest path between `origin` and `destination`.
    ///
    /// The paths of every other intersection reached by the search are inserted
    /// into `all_paths` (see [ShortestPathTree::extend_all_paths]), which allows
    /// re-routing later without searching again.
    ///
    /// Returns an empty path if there's no path between the two intersections.
    pub fn find_path(
        &mut self,
        origin: IntersectionId,
        destination: IntersectionId,
        network: &StreetNetwork,
        all_paths: &mut AllPaths,
    ) -> Result<Path, PathError> {
        if origin >= network.len() {
            return Err(PathError::InvalidReference(origin));
        }

        let tree = self.shortest_path_tree(destination, network)?;
        tree.extend_all_paths(all_paths);
        let path = tree.path_from(origin);

        info!(
            "{} search: {} -> {} takes {} segments ({} cached paths)",
            self.algorithm,
            origin,
            destination,
            path.len(),
            all_paths.len()
        );
        Ok(path)
    }
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

impl std::fmt::Debug for PathFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathFinder")
            .field("algorithm", &self.algorithm)
            .field("observers", &self.observers.len())
            .field("cancel", &self.cancel)
            .finish()
    }
}
