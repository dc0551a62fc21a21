// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use geo::{coord, BoundingRect, Rect};
use log::{debug, info};

use crate::geometry::{polyline_crosses_boundary, rect_contains, rects_overlap};
use crate::{StreetNetwork, StreetSegment};

/// Number of cells along each axis of a [Grid], regardless of its aspect ratio.
pub const GRID_DIVISIONS: usize = 100;

/// Error conditions which may occur when building a [Grid].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GridError {
    /// The bounding box has no area (or is not finite), so it can't be partitioned.
    #[error("degenerate grid bounds: {width} × {height}")]
    DegenerateBounds { width: f64, height: f64 },
}

/// Coordinates of a single cell of a [Grid]. `col` grows with x (longitude),
/// `row` grows with y (latitude).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub col: usize,
    pub row: usize,
}

/// Grid is a uniform spatial index over a rectangle, partitioned into
/// [GRID_DIVISIONS] × [GRID_DIVISIONS] cells. Every cell holds all
/// [StreetSegments](StreetSegment) whose shape touches the cell, including
/// segments which merely pass through without an endpoint inside.
///
/// Like [StreetNetwork], the grid is never mutated after it is built.
#[derive(Debug, Clone)]
pub struct Grid {
    bounds: Rect<f64>,
    cell_width: f64,
    cell_height: f64,
    cells: Vec<Vec<Arc<StreetSegment>>>,
}

impl Grid {
    /// Builds a grid covering `bounds` from the provided segments.
    ///
    /// A segment lands in a cell if one of its endpoints lies inside the cell (borders included),
    /// or if its bounding box overlaps the cell and its polyline crosses one of the cell's edges.
    /// Segments with an empty shape are not indexed.
    pub fn new<'a, I>(segments: I, bounds: Rect<f64>) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = &'a Arc<StreetSegment>>,
    {
        let width = bounds.width();
        let height = bounds.height();
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(GridError::DegenerateBounds { width, height });
        }

        let mut grid = Self {
            bounds,
            cell_width: width / GRID_DIVISIONS as f64,
            cell_height: height / GRID_DIVISIONS as f64,
            cells: vec![Vec::default(); GRID_DIVISIONS * GRID_DIVISIONS],
        };

        let mut indexed: usize = 0;
        let mut skipped: usize = 0;
        for segment in segments {
            if grid.insert(segment) {
                indexed += 1;
            } else {
                skipped += 1;
            }
        }

        info!(
            "grid built: {} segments in {} of {} cells ({} skipped)",
            indexed,
            grid.cells.iter().filter(|c| !c.is_empty()).count(),
            grid.cells.len(),
            skipped,
        );
        Ok(grid)
    }

    /// Builds a grid over the [bounding rectangle](StreetNetwork::bounding_rect)
    /// of all segments of a network.
    pub fn from_network(network: &StreetNetwork) -> Result<Self, GridError> {
        let bounds = network
            .bounding_rect()
            .ok_or(GridError::DegenerateBounds {
                width: 0.0,
                height: 0.0,
            })?;
        Self::new(network.segments(), bounds)
    }

    fn insert(&mut self, segment: &Arc<StreetSegment>) -> bool {
        let Some(extent) = segment.shape().bounding_rect() else {
            debug!("segment {} has no shape - not indexed", segment.id());
            return false;
        };

        // Only cells around the segment's extent can possibly be touched
        let low = self.clamped_key(extent.min());
        let high = self.clamped_key(extent.max());
        let endpoints = [segment.tail_point(), segment.head_point()];

        for row in low.row.saturating_sub(1)..=(high.row + 1).min(GRID_DIVISIONS - 1) {
            for col in low.col.saturating_sub(1)..=(high.col + 1).min(GRID_DIVISIONS - 1) {
                let key = CellKey { col, row };
                let cell = self.cell_rect(key);

                let touches = endpoints
                    .iter()
                    .flatten()
                    .any(|&p| rect_contains(&cell, p))
                    || (rects_overlap(&extent, &cell)
                        && polyline_crosses_boundary(segment.shape(), &cell));

                if touches {
                    self.cells[row * GRID_DIVISIONS + col].push(segment.clone());
                }
            }
        }

        return true;
    }

    /// The rectangle covered by the grid.
    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// The rectangle covered by a single cell.
    pub fn cell_rect(&self, key: CellKey) -> Rect<f64> {
        let min = self.bounds.min();
        Rect::new(
            coord! {
                x: min.x + key.col as f64 * self.cell_width,
                y: min.y + key.row as f64 * self.cell_height,
            },
            coord! {
                x: min.x + (key.col + 1) as f64 * self.cell_width,
                y: min.y + (key.row + 1) as f64 * self.cell_height,
            },
        )
    }

    /// Returns the segments of a cell. Keys outside of the grid have no segments.
    pub fn cell(&self, key: CellKey) -> &[Arc<StreetSegment>] {
        if key.col >= GRID_DIVISIONS || key.row >= GRID_DIVISIONS {
            return &[];
        }
        &self.cells[key.row * GRID_DIVISIONS + key.col]
    }

    /// Finds the cell containing the given position. Positions outside of the grid
    /// are clamped to the nearest cell on the grid's edge.
    pub fn cell_of(&self, lat: f64, lon: f64) -> CellKey {
        self.clamped_key(coord! { x: lon, y: lat })
    }

    fn clamped_key(&self, p: crate::Point) -> CellKey {
        let max = (GRID_DIVISIONS - 1) as f64;
        let col = ((p.x - self.bounds.min().x) / self.cell_width).floor();
        let row = ((p.y - self.bounds.min().y) / self.cell_height).floor();

        // NaN casts to 0
        CellKey {
            col: col.clamp(0.0, max) as usize,
            row: row.clamp(0.0, max) as usize,
        }
    }

    /// Returns the contents of every non-empty cell in the 3×3 block centered on the cell
    /// containing the given position. The block is clamped at the grid's edges.
    ///
    /// Each element is the contents of a single cell, so a segment spanning multiple
    /// cells appears once per cell.
    pub fn surrounding_items(&self, lat: f64, lon: f64) -> Vec<&[Arc<StreetSegment>]> {
        let center = self.cell_of(lat, lon);
        let mut items = Vec::with_capacity(9);

        for row in center.row.saturating_sub(1)..=(center.row + 1).min(GRID_DIVISIONS - 1) {
            for col in center.col.saturating_sub(1)..=(center.col + 1).min(GRID_DIVISIONS - 1) {
                let cell = self.cell(CellKey { col, row });
                if !cell.is_empty() {
                    items.push(cell);
                }
            }
        }

        items
    }
}
