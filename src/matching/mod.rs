// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Snapping position samples onto a [StreetNetwork](crate::StreetNetwork),
//! and keeping a displayed route in sync with the matched position.

use std::sync::Arc;

use crate::{Point, StreetSegment};

mod matcher;
mod navigator;
mod route;

pub use matcher::{evaluate_cell, match_cells, MapMatcher};
pub use navigator::Navigator;
pub use route::RouteFollower;

/// The best [StreetSegment] for a position sample, together with the point
/// on that segment closest to the sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Sum of distances between the segment and the current sample, and between
    /// the segment and every point of the inertia history.
    pub distance: f64,

    /// Projection of the current sample onto the segment.
    pub point: Point,

    pub segment: Arc<StreetSegment>,
}

/// Error conditions which may occur when evaluating the segments of a single grid cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The distance to a segment is not a number, e.g. because of non-finite coordinates.
    #[error("distance to segment {0} is not a number")]
    InvalidDistance(String),
}

/// Tuning knobs of a [MapMatcher] and a [RouteFollower].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Maximum number of past samples kept in the inertia history.
    pub inertia_capacity: usize,

    /// Every `inertia_cadence`-th sample (starting with the first one)
    /// is recorded in the inertia history.
    pub inertia_cadence: usize,

    /// Number of consecutive matches outside of the active route after which
    /// the route is replaced.
    pub recalculation_threshold: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            inertia_capacity: 3,
            inertia_cadence: 4,
            recalculation_threshold: 40,
        }
    }
}
