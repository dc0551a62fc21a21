// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, trace, warn};
use rayon::prelude::*;

use super::{MatchError, MatchOptions, MatchResult};
use crate::geometry::nearest_on_polyline;
use crate::{Grid, Point, StreetSegment};

/// Finds the segment of a single grid cell closest to `position`.
///
/// The distance of a segment is the sum of its distances to `position` and to every
/// point of `inertia`; the snap point is the projection of `position` alone.
/// On ties, the earlier segment wins. Segments whose shape has fewer than two points
/// can't be matched onto and are passed over. Returns `None` if no segment qualifies.
///
/// Fails if a distance is not a number, which happens on non-finite coordinates.
pub fn evaluate_cell(
    cell: &[Arc<StreetSegment>],
    inertia: &[Point],
    position: Point,
) -> Result<Option<MatchResult>, MatchError> {
    let mut best: Option<MatchResult> = None;

    for segment in cell {
        let Some((mut distance, point)) = nearest_on_polyline(segment.shape(), position) else {
            debug!("segment {} has a degenerate shape - skipped", segment.id());
            continue;
        };

        distance += inertia
            .iter()
            .filter_map(|&p| nearest_on_polyline(segment.shape(), p))
            .map(|(d, _)| d)
            .sum::<f64>();

        if distance.is_nan() {
            return Err(MatchError::InvalidDistance(segment.id().to_string()));
        }

        if best.as_ref().map_or(true, |b| distance < b.distance) {
            best = Some(MatchResult {
                distance,
                point,
                segment: segment.clone(),
            });
        }
    }

    Ok(best)
}

/// Evaluates every cell concurrently with [evaluate_cell] and picks the overall best match.
///
/// Cells which failed to evaluate are logged and skipped.
pub fn match_cells(
    cells: &[&[Arc<StreetSegment>]],
    inertia: &[Point],
    position: Point,
) -> Option<MatchResult> {
    cells
        .par_iter()
        .filter_map(|cell| match evaluate_cell(cell, inertia, position) {
            Ok(result) => result,
            Err(e) => {
                warn!("skipping grid cell with {} segments: {}", cell.len(), e);
                None
            }
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// MapMatcher snaps position samples onto the segments of a [Grid].
///
/// Apart from the current sample, a short history of past samples ("inertia") is taken
/// into account, which damps jumps between nearby segments caused by noisy samples.
/// See [MatchOptions] on how the history is sampled.
#[derive(Debug, Clone)]
pub struct MapMatcher {
    grid: Arc<Grid>,
    options: MatchOptions,
    inertia: VecDeque<Point>,
    counter: usize,
}

impl MapMatcher {
    pub fn new(grid: Arc<Grid>) -> Self {
        Self::with_options(grid, MatchOptions::default())
    }

    pub fn with_options(grid: Arc<Grid>, options: MatchOptions) -> Self {
        Self {
            grid,
            options,
            inertia: VecDeque::with_capacity(options.inertia_capacity + 1),
            counter: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Past samples currently taken into account, oldest first.
    pub fn inertia(&self) -> impl Iterator<Item = &Point> {
        self.inertia.iter()
    }

    /// Forgets all past samples, e.g. after a jump in position.
    pub fn clear_inertia(&mut self) {
        self.inertia.clear();
        self.counter = 0;
    }

    /// Finds the segment closest to `position`, looking only at the 3×3 block
    /// of grid cells around it. Returns `None` if there are no segments nearby.
    ///
    /// The sample is recorded in the inertia history afterwards, regardless of the result.
    pub fn match_position(&mut self, position: Point) -> Option<MatchResult> {
        let cells = self.grid.surrounding_items(position.y, position.x);
        let inertia = self.inertia.make_contiguous();
        let result = match_cells(&cells, inertia, position);

        if let Some(ref m) = result {
            trace!(
                "matched ({}, {}) onto {} at distance {}",
                position.x,
                position.y,
                m.segment.id(),
                m.distance
            );
        }

        self.record(position);
        result
    }

    fn record(&mut self, position: Point) {
        if self.options.inertia_capacity == 0 {
            return;
        }

        if self.counter == 0 {
            self.inertia.push_back(position);
            while self.inertia.len() > self.options.inertia_capacity {
                self.inertia.pop_front();
            }
        }
        self.counter = (self.counter + 1) % self.options.inertia_cadence.max(1);
    }
}
