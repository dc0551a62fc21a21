// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use log::debug;

use super::service::SearchContext;
use super::PathError;
use crate::{CandidateLabelManager, IntersectionId, Label, StreetNetwork};

/// Label-correcting search rooted at `destination`.
///
/// Candidates are taken from `labels` as per its policy, and all outbound segments
/// of a candidate are relaxed. Every improved label is queued again, even if it
/// is already waiting. No label is ever made permanent; the search ends once
/// no label can be improved any further.
pub(crate) fn run<M: CandidateLabelManager>(
    mut labels: M,
    destination: IntersectionId,
    network: &StreetNetwork,
    ctx: &mut SearchContext<'_>,
) -> Result<Vec<Label>, PathError> {
    labels.seed(destination);
    labels.initialize_candidates(destination);

    let mut examined: usize = 0;
    while let Some(id) = labels.candidate_label() {
        ctx.check_cancelled()?;
        examined += 1;

        let outbound = network.outbound(id);
        for segment in outbound {
            labels.adjust_head_value(segment);
        }
        ctx.relaxed(outbound);
    }

    debug!(
        "label-correcting search from {} examined {} candidates over {} intersections",
        destination,
        examined,
        network.len()
    );
    Ok(labels.into_labels())
}
