// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Shortest paths and GPS map matching over directed street networks.
//!
//! The crate is made of three cooperating parts:
//!
//! 1. A [StreetNetwork] of [Intersections](Intersection) joined by directed
//!    [StreetSegments](StreetSegment), searched by label-setting or label-correcting
//!    shortest path algorithms (see [PathFinder] and [Algorithm]).
//! 2. A uniform [Grid] over the network's bounding box, answering
//!    "which segments are near this point" queries.
//! 3. A [MapMatcher] snapping position samples onto the nearest segment,
//!    evaluating neighbouring grid cells concurrently, and a [RouteFollower]
//!    which keeps a displayed route in sync with the matched position.
//!
//! All positions are planar (x, y) coordinates; projecting GPS fixes
//! into that system is the caller's job.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use streetnav::{Algorithm, AllPaths, PathFinder, StreetNetwork, StreetSegment};
//!
//! let segments = vec![
//!     StreetSegment::new("a-b", 0, 1, 2.0, Arc::new(vec![(0.0, 0.0), (2.0, 0.0)].into())),
//!     StreetSegment::new("b-c", 1, 2, 3.0, Arc::new(vec![(2.0, 0.0), (2.0, 3.0)].into())),
//! ];
//! let network = StreetNetwork::from_segments(segments.into_iter().map(Arc::new));
//!
//! let mut finder = PathFinder::new(Algorithm::default());
//! let mut all_paths = AllPaths::default();
//! let path = finder.find_path(2, 0, &network, &mut all_paths).expect("search failed");
//! println!("Route: {:?}", path.keys().collect::<Vec<_>>());
//! ```

use std::sync::Arc;

mod geometry;
mod grid;
mod labels;
pub mod matching;
mod network;
mod path;
mod street;

pub use geometry::{distance, nearest_on_polyline, project_onto_segment, Point, Polyline};
pub use grid::{CellKey, Grid, GridError, GRID_DIVISIONS};
pub use labels::{
    CandidateLabelList, CandidateLabelManager, CandidatePolicy, Label, LabelManager,
    LabelStructure, PermanentLabelBuckets, PermanentLabelHeap, PermanentLabelList,
    PermanentLabelManager, DEFAULT_HEAP_ARITY,
};
pub use matching::{MapMatcher, MatchError, MatchOptions, MatchResult, Navigator, RouteFollower};
pub use network::StreetNetwork;
pub use path::{
    AllPaths, Algorithm, CancelToken, ParseError, Path, PathError, PathFinder, PathFindingWorker,
    SegmentObserver, ShortestPathTree,
};
pub use street::{canonical_name, geocode, Geocoded, Street};

/// Index of an [Intersection] in a [StreetNetwork].
pub type IntersectionId = usize;

/// A directed edge of a [StreetNetwork], running from `tail` to `head`.
///
/// Segments are immutable once constructed. A two-way road is represented
/// by two segments, one in each direction; nothing in this crate infers
/// bidirectionality.
///
/// `length` must be non-negative. This is a precondition of the shortest path
/// algorithms and is only checked in debug builds.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetSegment {
    id: String,
    tail: IntersectionId,
    head: IntersectionId,
    length: f64,
    shape: Arc<Polyline>,
    low_address: i32,
    high_address: i32,
    code: String,
    street_name: String,
    tail_point: Option<Point>,
    head_point: Option<Point>,
}

impl StreetSegment {
    /// Creates a new segment. Endpoint coordinates are derived from `shape` immediately:
    /// the first point of the polyline is the tail point, the last one the head point.
    pub fn new<S: Into<String>>(
        id: S,
        tail: IntersectionId,
        head: IntersectionId,
        length: f64,
        shape: Arc<Polyline>,
    ) -> Self {
        debug_assert!(length >= 0.0, "negative segment lengths are not supported");

        let tail_point = shape.0.first().copied();
        let head_point = shape.0.last().copied();
        Self {
            id: id.into(),
            tail,
            head,
            length,
            shape,
            low_address: -1,
            high_address: -1,
            code: String::default(),
            street_name: String::default(),
            tail_point,
            head_point,
        }
    }

    /// Sets the address range of the segment. The bounds are normalized, so the
    /// order of the arguments does not matter.
    pub fn with_addresses(mut self, a: i32, b: i32) -> Self {
        self.low_address = a.min(b);
        self.high_address = a.max(b);
        self
    }

    /// Sets the street classification code of the segment.
    pub fn with_code<S: Into<String>>(mut self, code: S) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the canonical name of the [Street] this segment belongs to.
    pub fn with_street_name<S: Into<String>>(mut self, name: S) -> Self {
        self.street_name = name.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tail(&self) -> IntersectionId {
        self.tail
    }

    pub fn head(&self) -> IntersectionId {
        self.head
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn shape(&self) -> &Polyline {
        &self.shape
    }

    pub fn low_address(&self) -> i32 {
        self.low_address
    }

    pub fn high_address(&self) -> i32 {
        self.high_address
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn street_name(&self) -> &str {
        &self.street_name
    }

    /// First point of the polyline, or `None` if the polyline is empty.
    pub fn tail_point(&self) -> Option<Point> {
        self.tail_point
    }

    /// Last point of the polyline, or `None` if the polyline is empty.
    pub fn head_point(&self) -> Option<Point> {
        self.head_point
    }
}

/// A node of a [StreetNetwork]. Its id is its index in the network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intersection {
    inbound: Vec<Arc<StreetSegment>>,
    outbound: Vec<Arc<StreetSegment>>,
}

impl Intersection {
    /// Segments terminating at this intersection, in insertion order.
    pub fn inbound(&self) -> &[Arc<StreetSegment>] {
        &self.inbound
    }

    /// Segments departing from this intersection, in insertion order.
    pub fn outbound(&self) -> &[Arc<StreetSegment>] {
        &self.outbound
    }

    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty() && self.outbound.is_empty()
    }

    pub fn is_inbound_empty(&self) -> bool {
        self.inbound.is_empty()
    }

    pub fn is_outbound_empty(&self) -> bool {
        self.outbound.is_empty()
    }

    fn add_inbound(&mut self, segment: Arc<StreetSegment>) {
        self.inbound.push(segment);
    }

    fn add_outbound(&mut self, segment: Arc<StreetSegment>) {
        self.outbound.push(segment);
    }
}
