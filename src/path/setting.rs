// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use log::debug;

use super::service::SearchContext;
use super::PathError;
use crate::{IntersectionId, Label, PermanentLabelManager, StreetNetwork};

/// Label-setting ([Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)-style)
/// search rooted at `destination`.
///
/// Each iteration makes the current label permanent and relaxes all outbound segments
/// of its intersection; the next label is the smallest non-permanent one. The search ends
/// when `labels` has no such label left. Once permanent, a label never changes.
pub(crate) fn run<M: PermanentLabelManager>(
    mut labels: M,
    destination: IntersectionId,
    network: &StreetNetwork,
    ctx: &mut SearchContext<'_>,
) -> Result<Vec<Label>, PathError> {
    labels.seed(destination);

    let mut settled: usize = 0;
    let mut working = Some(destination);
    while let Some(id) = working {
        ctx.check_cancelled()?;

        labels.make_permanent(id);
        settled += 1;

        let outbound = network.outbound(id);
        for segment in outbound {
            labels.adjust_head_value(segment);
        }
        ctx.relaxed(outbound);

        working = labels.smallest_label();
    }

    debug!(
        "label-setting search from {} settled {} of {} intersections",
        destination,
        settled,
        network.len()
    );
    Ok(labels.into_labels())
}
