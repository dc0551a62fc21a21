// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::HashMap;
use std::sync::Arc;

use geo::{BoundingRect, Rect};
use log::{debug, warn};

use crate::{Intersection, IntersectionId, StreetSegment, Street};

/// Represents a street network as a dense array of [Intersections](Intersection),
/// indexed by [IntersectionId], joined by directed [StreetSegments](StreetSegment).
///
/// The network is built once and never mutated afterwards; it can be freely shared
/// between threads (e.g. behind an [Arc]) while paths are searched and positions matched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StreetNetwork {
    intersections: Vec<Intersection>,
    segments: BTreeMap<String, Arc<StreetSegment>>,
}

impl StreetNetwork {
    /// Builds a network from a collection of segments.
    ///
    /// The intersection array grows to accommodate the largest tail or head id
    /// encountered, so every segment endpoint is always a valid index.
    /// Ids which are never referenced become empty intersections.
    pub fn from_segments<I: IntoIterator<Item = Arc<StreetSegment>>>(segments: I) -> Self {
        let mut network = Self::default();
        for segment in segments {
            network.add_segment(segment);
        }

        debug!(
            "street network built: {} intersections, {} segments",
            network.len(),
            network.segments.len()
        );
        network
    }

    /// Builds a network from all segments of the provided [Streets](Street).
    ///
    /// Streets are added in order of their names, so the order of inbound and outbound
    /// segments (and thus the choice between equally short paths) is always the same.
    pub fn from_streets(streets: &HashMap<String, Street>) -> Self {
        let mut sorted = streets.values().collect::<Vec<_>>();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));

        Self::from_segments(
            sorted
                .into_iter()
                .flat_map(|street| street.segments().iter().cloned()),
        )
    }

    fn add_segment(&mut self, segment: Arc<StreetSegment>) {
        match self.segments.entry(segment.id().to_string()) {
            Entry::Vacant(e) => {
                e.insert(segment.clone());
            }
            Entry::Occupied(_) => {
                warn!("duplicate street segment {} ignored", segment.id());
                return;
            }
        }

        self.expand_if_needed(segment.tail());
        self.expand_if_needed(segment.head());
        self.intersections[segment.tail()].add_outbound(segment.clone());
        self.intersections[segment.head()].add_inbound(segment);
    }

    fn expand_if_needed(&mut self, id: IntersectionId) {
        if self.intersections.len() <= id {
            self.intersections.resize_with(id + 1, Intersection::default);
        }
    }

    /// Returns the number of intersections in the network.
    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    /// Retrieves an [Intersection] with the provided id.
    pub fn intersection(&self, id: IntersectionId) -> Option<&Intersection> {
        self.intersections.get(id)
    }

    /// Returns an iterator over all [Intersections](Intersection) in the network.
    pub fn intersections(&self) -> impl Iterator<Item = &Intersection> {
        self.intersections.iter()
    }

    /// Gets all outgoing [StreetSegments](StreetSegment) from an intersection with a given id.
    pub fn outbound(&self, id: IntersectionId) -> &[Arc<StreetSegment>] {
        self.intersections
            .get(id)
            .map(|i| i.outbound())
            .unwrap_or_default()
    }

    /// Gets all incoming [StreetSegments](StreetSegment) to an intersection with a given id.
    pub fn inbound(&self, id: IntersectionId) -> &[Arc<StreetSegment>] {
        self.intersections
            .get(id)
            .map(|i| i.inbound())
            .unwrap_or_default()
    }

    /// Retrieves a [StreetSegment] by its id.
    pub fn segment(&self, id: &str) -> Option<&Arc<StreetSegment>> {
        self.segments.get(id)
    }

    /// Returns an iterator over all [StreetSegments](StreetSegment), ordered by id.
    pub fn segments(&self) -> impl Iterator<Item = &Arc<StreetSegment>> {
        self.segments.values()
    }

    /// Computes the bounding rectangle of all segment shapes.
    /// Returns `None` if there are no segments with a non-empty shape.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.segments
            .values()
            .filter_map(|s| s.shape().bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            })
    }
}
