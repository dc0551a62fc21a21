// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::VecDeque;
use std::sync::Arc;

use super::{CandidateLabelManager, CandidatePolicy, Label, LabelArray, LabelManager, Relaxation};
use crate::{IntersectionId, StreetSegment};

/// Queues every intersection whose label improves, handing them out
/// as per a [CandidatePolicy].
///
/// An intersection may be queued multiple times; the policy only decides
/// the exploration order. Labels are never made permanent.
#[derive(Debug, Clone)]
pub struct CandidateLabelList {
    labels: LabelArray,
    policy: CandidatePolicy,
    candidates: VecDeque<IntersectionId>,
    enqueued: usize,
}

impl CandidateLabelList {
    pub fn new(policy: CandidatePolicy, network_size: usize) -> Self {
        Self {
            labels: LabelArray::new(network_size),
            policy,
            candidates: VecDeque::default(),
            enqueued: 0,
        }
    }

    pub fn policy(&self) -> CandidatePolicy {
        self.policy
    }

    /// Returns how many times intersections were added to the list so far.
    pub fn enqueued(&self) -> usize {
        self.enqueued
    }

    fn enqueue(&mut self, id: IntersectionId) {
        self.candidates.push_back(id);
        self.enqueued += 1;
    }
}

impl LabelManager for CandidateLabelList {
    fn adjust_head_value(&mut self, segment: &Arc<StreetSegment>) {
        if let Relaxation::Improved { .. } = self.labels.relax(segment) {
            self.enqueue(segment.head());
        }
    }

    fn seed(&mut self, id: IntersectionId) {
        self.labels.seed(id);
    }

    fn label(&self, id: IntersectionId) -> Option<&Label> {
        self.labels.get(id)
    }

    fn labels(&self) -> &[Label] {
        self.labels.as_slice()
    }

    fn into_labels(self) -> Vec<Label> {
        self.labels.into_vec()
    }
}

impl CandidateLabelManager for CandidateLabelList {
    fn candidate_label(&mut self) -> Option<IntersectionId> {
        match self.policy {
            CandidatePolicy::Oldest => self.candidates.pop_front(),
            CandidatePolicy::Newest => self.candidates.pop_back(),
        }
    }

    fn initialize_candidates(&mut self, id: IntersectionId) {
        if self.candidates.is_empty() && id < self.labels.len() {
            self.enqueue(id);
        }
    }

    fn is_candidates_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::tests::segment;

    fn filled(policy: CandidatePolicy) -> CandidateLabelList {
        let mut c = CandidateLabelList::new(policy, 4);
        c.seed(0);
        c.initialize_candidates(0);
        assert_eq!(c.candidate_label(), Some(0));
        c.adjust_head_value(&segment("0-1", 0, 1, 1.0));
        c.adjust_head_value(&segment("0-2", 0, 2, 1.0));
        c.adjust_head_value(&segment("0-3", 0, 3, 1.0));
        c
    }

    #[test]
    fn oldest_first() {
        let mut c = filled(CandidatePolicy::Oldest);
        assert_eq!(c.candidate_label(), Some(1));
        assert_eq!(c.candidate_label(), Some(2));
        assert_eq!(c.candidate_label(), Some(3));
        assert_eq!(c.candidate_label(), None);
        assert!(c.is_candidates_empty());
    }

    #[test]
    fn newest_first() {
        let mut c = filled(CandidatePolicy::Newest);
        assert_eq!(c.candidate_label(), Some(3));
        assert_eq!(c.candidate_label(), Some(2));
        assert_eq!(c.candidate_label(), Some(1));
        assert_eq!(c.candidate_label(), None);
    }

    #[test]
    fn duplicates_are_admitted() {
        let mut c = filled(CandidatePolicy::Oldest);
        c.adjust_head_value(&segment("0-2 shortcut", 0, 2, 0.5));
        assert_eq!(c.enqueued(), 5);

        let drained = std::iter::from_fn(|| c.candidate_label()).collect::<Vec<_>>();
        assert_eq!(drained, vec![1, 2, 3, 2]);
    }

    #[test]
    fn initialization_requires_empty_list() {
        let mut c = filled(CandidatePolicy::Oldest);
        c.initialize_candidates(0);
        assert_eq!(c.enqueued(), 4);
    }
}
