// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{IntersectionId, Label, StreetSegment};

/// Ordered mapping from segment id to segment, as returned by
/// [PathFinder::find_path](crate::PathFinder::find_path). The first entry is the segment
/// whose head is the origin, and each following entry ends where the previous one starts;
/// the tail of the last entry is the destination.
pub type Path = IndexMap<String, Arc<StreetSegment>>;

/// Paths to a single destination, keyed by the id of their first segment.
///
/// Knowing the segment one is currently on, this answers "what is my path to the
/// destination" without searching again.
pub type AllPaths = HashMap<String, Path>;

/// Final labels of a search rooted at `destination`.
///
/// The searches relax outbound segments of the intersection being processed,
/// starting at the destination. The value of a label is thus the length of the
/// shortest chain of segments *from* the destination to that intersection,
/// and predecessor chains lead from every reached intersection back to the
/// destination. To route along segment directions, build the network with
/// reversed segments.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    destination: IntersectionId,
    labels: Vec<Label>,
}

impl ShortestPathTree {
    pub(crate) fn new(destination: IntersectionId, labels: Vec<Label>) -> Self {
        Self {
            destination,
            labels,
        }
    }

    pub fn destination(&self) -> IntersectionId {
        self.destination
    }

    /// Gets all labels, indexed by intersection id.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns the shortest distance between an intersection and the destination,
    /// or `None` if the intersection was not reached (or doesn't exist).
    pub fn distance(&self, id: IntersectionId) -> Option<f64> {
        self.labels
            .get(id)
            .map(|l| l.value())
            .filter(|v| v.is_finite())
    }

    /// Walks the predecessor chain starting at `origin`.
    ///
    /// Returns an empty path if `origin` is the destination, was not reached,
    /// or doesn't exist.
    pub fn path_from(&self, origin: IntersectionId) -> Path {
        let mut path = Path::default();
        let mut current = self.labels.get(origin);

        while let Some(segment) = current.and_then(|l| l.predecessor()) {
            // Predecessor chains are acyclic as long as lengths are non-negative
            if path.insert(segment.id().to_string(), segment.clone()).is_some() {
                break;
            }
            current = self.labels.get(segment.tail());
        }

        path
    }

    /// Inserts the path of every reached intersection (other than the destination)
    /// into `all_paths`, keyed by the first segment of that path.
    pub fn extend_all_paths(&self, all_paths: &mut AllPaths) {
        for label in &self.labels {
            if let Some(first) = label.predecessor() {
                all_paths.insert(first.id().to_string(), self.path_from(label.id()));
            }
        }
    }

    /// Builds the paths of all reached intersections; see [ShortestPathTree::extend_all_paths].
    pub fn all_paths(&self) -> AllPaths {
        let mut all_paths = AllPaths::default();
        self.extend_all_paths(&mut all_paths);
        all_paths
    }
}
