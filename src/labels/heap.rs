// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use log::debug;

use super::{Label, LabelArray, LabelManager, PermanentLabelManager, Relaxation};
use crate::{IntersectionId, StreetSegment};

/// Keeps labels in a [d-ary heap](https://en.wikipedia.org/wiki/D-ary_heap) ordered by value.
///
/// Permanent labels are deleted lazily: [make_permanent](PermanentLabelManager::make_permanent)
/// leaves the entry in place, and [smallest_label](PermanentLabelManager::smallest_label)
/// pops and discards permanent entries until a non-permanent one surfaces.
/// The heap starts out holding every label.
#[derive(Debug, Clone)]
pub struct PermanentLabelHeap {
    labels: LabelArray,
    d: usize,
    heap: Vec<IntersectionId>,
    positions: Vec<Option<usize>>,
    discarded: usize,
}

impl PermanentLabelHeap {
    /// Creates a heap with branching factor `d` over `network_size` labels.
    ///
    /// Panics if `d < 2`.
    pub fn new(d: usize, network_size: usize) -> Self {
        assert!(d >= 2, "heap arity must be at least 2, got {}", d);

        // All labels start at infinity, so any order is a valid heap.
        Self {
            labels: LabelArray::new(network_size),
            d,
            heap: (0..network_size).collect(),
            positions: (0..network_size).map(Some).collect(),
            discarded: 0,
        }
    }

    /// Returns the branching factor of the heap.
    pub fn arity(&self) -> usize {
        self.d
    }

    /// Returns the number of entries physically present in the heap,
    /// including permanent entries which haven't been discarded yet.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    fn value_at(&self, position: usize) -> f64 {
        self.labels.value(self.heap[position])
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a]] = Some(a);
        self.positions[self.heap[b]] = Some(b);
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / self.d;
            if self.value_at(position) >= self.value_at(parent) {
                break;
            }

            self.swap(position, parent);
            position = parent;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        loop {
            let mut smallest = position;
            for c in 1..=self.d {
                let child = position * self.d + c;
                if child < self.heap.len() && self.value_at(child) < self.value_at(smallest) {
                    smallest = child;
                }
            }

            if smallest == position {
                break;
            }

            self.swap(position, smallest);
            position = smallest;
        }
    }

    fn push(&mut self, id: IntersectionId) {
        self.heap.push(id);
        let position = self.heap.len() - 1;
        self.positions[id] = Some(position);
        self.sift_up(position);
    }

    fn pop(&mut self) -> Option<IntersectionId> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.swap(0, last);
        let id = self.heap.pop()?;
        self.positions[id] = None;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(id)
    }

    /// Restores heap order after the value of `id` decreased.
    fn reindex(&mut self, id: IntersectionId) {
        match self.positions.get(id).copied().flatten() {
            Some(position) => self.sift_up(position),
            None => self.push(id),
        }
    }
}

impl LabelManager for PermanentLabelHeap {
    fn adjust_head_value(&mut self, segment: &Arc<StreetSegment>) {
        if let Relaxation::Improved { .. } = self.labels.relax(segment) {
            self.reindex(segment.head());
        }
    }

    fn seed(&mut self, id: IntersectionId) {
        if let Relaxation::Improved { .. } = self.labels.seed(id) {
            self.reindex(id);
        }
    }

    fn label(&self, id: IntersectionId) -> Option<&Label> {
        self.labels.get(id)
    }

    fn labels(&self) -> &[Label] {
        self.labels.as_slice()
    }

    fn into_labels(self) -> Vec<Label> {
        debug!(
            "heap (d={}) discarded {} permanent entries, {} left",
            self.d,
            self.discarded,
            self.heap.len()
        );
        self.labels.into_vec()
    }
}

impl PermanentLabelManager for PermanentLabelHeap {
    fn smallest_label(&mut self) -> Option<IntersectionId> {
        while let Some(&root) = self.heap.first() {
            if self.labels.is_permanent(root) {
                self.pop();
                self.discarded += 1;
                continue;
            }

            // Only unreachable labels are left
            if self.labels.value(root).is_infinite() {
                return None;
            }

            return self.pop();
        }

        None
    }

    fn make_permanent(&mut self, id: IntersectionId) {
        self.labels.make_permanent(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::tests::{check_extraction_order, segment};

    fn check_heap_order(h: &PermanentLabelHeap) {
        for position in 1..h.heap.len() {
            let parent = (position - 1) / h.d;
            assert!(h.value_at(parent) <= h.value_at(position));
        }
        for (position, &id) in h.heap.iter().enumerate() {
            assert_eq!(h.positions[id], Some(position));
        }
    }

    #[test]
    fn extraction_order() {
        check_extraction_order(PermanentLabelHeap::new(2, 5));
        check_extraction_order(PermanentLabelHeap::new(3, 5));
        check_extraction_order(PermanentLabelHeap::new(5, 5));
    }

    #[test]
    fn permanent_entries_are_removed_lazily() {
        let mut h = PermanentLabelHeap::new(2, 5);
        h.seed(0);
        h.make_permanent(0);
        assert_eq!(h.len(), 5);

        h.adjust_head_value(&segment("0-1", 0, 1, 2.0));
        h.adjust_head_value(&segment("0-2", 0, 2, 1.0));
        check_heap_order(&h);

        // Pops the permanent root (0) and then 2
        assert_eq!(h.smallest_label(), Some(2));
        assert_eq!(h.len(), 3);
        assert_eq!(h.discarded, 1);
        check_heap_order(&h);
    }

    #[test]
    fn heap_order_survives_many_updates() {
        let mut h = PermanentLabelHeap::new(3, 40);
        h.seed(0);
        h.make_permanent(0);
        for i in 1..40 {
            let length = ((i * 37) % 17) as f64 + 1.0;
            h.adjust_head_value(&segment("x", 0, i, length));
            check_heap_order(&h);
        }
        for i in (1..40).step_by(3) {
            h.adjust_head_value(&segment("y", 0, i, 0.5));
            check_heap_order(&h);
        }

        let mut last = f64::NEG_INFINITY;
        while let Some(id) = h.smallest_label() {
            let value = h.label(id).unwrap().value();
            assert!(value >= last);
            last = value;
            h.make_permanent(id);
            check_heap_order(&h);
        }
        assert!(h.labels().iter().all(|l| l.is_permanent()));
    }

    #[test]
    #[should_panic]
    fn unary_heap_is_rejected() {
        PermanentLabelHeap::new(1, 3);
    }
}
