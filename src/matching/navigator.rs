// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{MapMatcher, MatchOptions, MatchResult, RouteFollower};
use crate::{AllPaths, Grid, Path, Point};

/// Navigator ties a [MapMatcher] with a [RouteFollower]: every position sample
/// is snapped onto the network, and the matched segment drives the displayed route.
#[derive(Debug, Clone)]
pub struct Navigator {
    matcher: MapMatcher,
    follower: RouteFollower,
}

impl Navigator {
    pub fn new(grid: Arc<Grid>, options: MatchOptions) -> Self {
        Self {
            matcher: MapMatcher::with_options(grid, options),
            follower: RouteFollower::new(options.recalculation_threshold),
        }
    }

    pub fn matcher(&self) -> &MapMatcher {
        &self.matcher
    }

    pub fn follower(&self) -> &RouteFollower {
        &self.follower
    }

    /// Replaces the active route, e.g. once a [PathFindingWorker](crate::PathFindingWorker)
    /// has finished.
    pub fn set_route(&mut self, path: Option<Path>) {
        self.follower.set_path(path);
    }

    /// Matches a position sample and updates the active route.
    ///
    /// The route is left untouched if nothing was matched.
    pub fn update(
        &mut self,
        position: Point,
        all_paths: &AllPaths,
    ) -> (Option<MatchResult>, Option<&Path>) {
        let matched = self.matcher.match_position(position);
        let route = match matched {
            Some(ref m) => self.follower.update(&m.segment, all_paths),
            None => self.follower.path(),
        };
        (matched, route)
    }
}
