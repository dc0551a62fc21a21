// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Label, LabelArray, LabelManager, PermanentLabelManager, Relaxation};
use crate::{IntersectionId, StreetSegment};

/// Computes the bucket of a label value.
///
/// The value is scaled to thousandths and truncated before bucketing,
/// so the key keeps three decimal places of precision and buckets are
/// 100 thousandths wide.
pub fn bucket_key(value: f64) -> i64 {
    ((value * 1000.0) as i64 / 100) * 100
}

/// Groups labels into value buckets, see [bucket_key].
///
/// Extraction walks the buckets in ascending key order and returns the smallest
/// non-permanent label of the first bucket holding one. Every improvement
/// moves the label from the bucket of its old value into the bucket of its new value.
#[derive(Debug, Clone)]
pub struct PermanentLabelBuckets {
    labels: LabelArray,
    buckets: BTreeMap<i64, Vec<IntersectionId>>,
}

impl PermanentLabelBuckets {
    pub fn new(network_size: usize) -> Self {
        Self {
            labels: LabelArray::new(network_size),
            buckets: BTreeMap::default(),
        }
    }

    /// Returns the number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn rebucket(&mut self, id: IntersectionId, previous: f64) {
        if previous.is_finite() {
            let old_key = bucket_key(previous);
            if let Some(bucket) = self.buckets.get_mut(&old_key) {
                if let Some(idx) = bucket.iter().position(|&entry| entry == id) {
                    bucket.swap_remove(idx);
                }
                if bucket.is_empty() {
                    self.buckets.remove(&old_key);
                }
            }
        }

        self.buckets
            .entry(bucket_key(self.labels.value(id)))
            .or_default()
            .push(id);
    }
}

impl LabelManager for PermanentLabelBuckets {
    fn adjust_head_value(&mut self, segment: &Arc<StreetSegment>) {
        if let Relaxation::Improved { previous } = self.labels.relax(segment) {
            self.rebucket(segment.head(), previous);
        }
    }

    fn seed(&mut self, id: IntersectionId) {
        if let Relaxation::Improved { previous } = self.labels.seed(id) {
            self.rebucket(id, previous);
        }
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

impl PermanentLabelManager for PermanentLabelBuckets {
    fn smallest_label(&mut self) -> Option<IntersectionId> {
        let labels = &self.labels;
        while let Some(mut bucket) = self.buckets.first_entry() {
            // Permanent labels never leave their bucket through rebucketing,
            // so they are dropped here.
            bucket.get_mut().retain(|&id| !labels.is_permanent(id));

            let smallest = bucket
                .get()
                .iter()
                .copied()
                .min_by(|&a, &b| labels.value(a).total_cmp(&labels.value(b)));

            match smallest {
                Some(id) => return Some(id),
                None => {
                    bucket.remove();
                }
            }
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

    #[test]
    fn keys() {
        assert_eq!(bucket_key(0.0), 0);
        assert_eq!(bucket_key(0.0999), 0);
        assert_eq!(bucket_key(0.1), 100);
        assert_eq!(bucket_key(1.2345), 1200);
        assert_eq!(bucket_key(17.05), 17000);
    }

    #[test]
    fn extraction_order() {
        check_extraction_order(PermanentLabelBuckets::new(5));
    }

    #[test]
    fn improvements_move_labels_between_buckets() {
        let mut b = PermanentLabelBuckets::new(3);
        b.seed(0);
        b.make_permanent(0);

        b.adjust_head_value(&segment("slow", 0, 1, 5.0));
        assert_eq!(b.buckets[&5000], vec![1]);

        b.adjust_head_value(&segment("fast", 0, 1, 0.25));
        assert!(!b.buckets.contains_key(&5000));
        assert_eq!(b.buckets[&200], vec![1]);

        // No improvement - no move
        b.adjust_head_value(&segment("slower", 0, 1, 9.0));
        assert_eq!(b.buckets[&200], vec![1]);
        assert!(!b.buckets.contains_key(&9000));

        assert_eq!(b.smallest_label(), Some(1));
        b.make_permanent(1);
        assert_eq!(b.smallest_label(), None);
        assert_eq!(b.bucket_count(), 0);
    }

    #[test]
    fn smallest_within_bucket() {
        let mut b = PermanentLabelBuckets::new(4);
        b.seed(0);
        b.make_permanent(0);
        b.adjust_head_value(&segment("a", 0, 1, 0.35));
        b.adjust_head_value(&segment("b", 0, 2, 0.31));
        b.adjust_head_value(&segment("c", 0, 3, 0.33));
        assert_eq!(b.bucket_count(), 2);
        assert_eq!(b.smallest_label(), Some(2));
    }
}
