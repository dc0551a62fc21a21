// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{Label, LabelArray, LabelManager, PermanentLabelManager};
use crate::{IntersectionId, StreetSegment};

/// Finds the smallest label by scanning every label on each extraction.
///
/// Extraction is `O(n)`, which makes this structure usable only on small networks,
/// but its simplicity makes it a good reference for the other structures.
#[derive(Debug, Clone)]
pub struct PermanentLabelList {
    labels: LabelArray,
}

impl PermanentLabelList {
    pub fn new(network_size: usize) -> Self {
        Self {
            labels: LabelArray::new(network_size),
        }
    }
}

impl LabelManager for PermanentLabelList {
    fn adjust_head_value(&mut self, segment: &Arc<StreetSegment>) {
        self.labels.relax(segment);
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

impl PermanentLabelManager for PermanentLabelList {
    fn smallest_label(&mut self) -> Option<IntersectionId> {
        let mut min: Option<&Label> = None;
        for label in self.labels.as_slice() {
            if !label.is_permanent()
                && label.value() < min.map(|m| m.value()).unwrap_or(f64::INFINITY)
            {
                min = Some(label);
            }
        }
        min.map(|label| label.id())
    }

    fn make_permanent(&mut self, id: IntersectionId) {
        self.labels.make_permanent(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::tests::check_extraction_order;

    #[test]
    fn extraction_order() {
        check_extraction_order(PermanentLabelList::new(5));
    }

    #[test]
    fn ties_go_to_lower_id() {
        let mut m = PermanentLabelList::new(3);
        m.seed(2);
        m.seed(1);
        assert_eq!(m.smallest_label(), Some(1));
    }
}
