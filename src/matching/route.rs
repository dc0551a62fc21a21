// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use log::{debug, info};

use super::MatchOptions;
use crate::{AllPaths, Path, StreetSegment};

/// RouteFollower decides which [Path] should be displayed, given the segment
/// the position was matched onto.
///
/// While no route is active, the first known path from the matched segment is adopted.
/// While a route is active, matches outside of it are counted; after
/// [recalculation_threshold](MatchOptions::recalculation_threshold) consecutive
/// such matches the route is replaced by the path from the matched segment
/// (or dropped, if no such path is known). A match on the route resets the count.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFollower {
    path: Option<Path>,
    off_route: usize,
    threshold: usize,
}

impl RouteFollower {
    pub fn new(threshold: usize) -> Self {
        Self {
            path: None,
            off_route: 0,
            threshold,
        }
    }

    /// The active route, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Replaces the active route, e.g. with the result of a new search.
    pub fn set_path(&mut self, path: Option<Path>) {
        self.path = path;
        self.off_route = 0;
    }

    /// Number of consecutive matches outside of the active route.
    pub fn off_route(&self) -> usize {
        self.off_route
    }

    /// Applies a new match and returns the active route.
    pub fn update(&mut self, matched: &StreetSegment, all_paths: &AllPaths) -> Option<&Path> {
        match self.path {
            Some(ref path) if path.contains_key(matched.id()) => {
                self.off_route = 0;
            }

            Some(_) => {
                self.off_route += 1;
                debug!("{} matches off route", self.off_route);
                if self.off_route >= self.threshold {
                    self.path = all_paths.get(matched.id()).cloned();
                    self.off_route = 0;
                    info!(
                        "route recalculated from {}: {} segments",
                        matched.id(),
                        self.path.as_ref().map_or(0, |p| p.len())
                    );
                }
            }

            None if !all_paths.is_empty() => {
                self.path = all_paths.get(matched.id()).cloned();
                self.off_route = 0;
                if let Some(ref path) = self.path {
                    info!("route adopted from {}: {} segments", matched.id(), path.len());
                }
            }

            None => {}
        }

        self.path.as_ref()
    }
}

impl Default for RouteFollower {
    fn default() -> Self {
        Self::new(MatchOptions::default().recalculation_threshold)
    }
}
