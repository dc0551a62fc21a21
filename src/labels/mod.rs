// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Per-intersection labels and the structures deciding which label is processed next.
//!
//! Every structure owns a fixed-size array of [Labels](Label), one per intersection,
//! and implements [LabelManager]. Label-setting search needs a [PermanentLabelManager]
//! ([PermanentLabelList], [PermanentLabelHeap] or [PermanentLabelBuckets]), while
//! label-correcting search is driven by a [CandidateLabelManager] ([CandidateLabelList]).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::trace;

use crate::path::ParseError;
use crate::{IntersectionId, StreetSegment};

mod buckets;
mod candidates;
mod heap;
mod list;

pub use buckets::PermanentLabelBuckets;
pub use candidates::CandidateLabelList;
pub use heap::PermanentLabelHeap;
pub use list::PermanentLabelList;

/// Branching factor of [PermanentLabelHeap] used when none is given explicitly.
pub const DEFAULT_HEAP_ARITY: usize = 5;

/// Tentative shortest distance of an intersection, together with the segment
/// through which that distance was achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    id: IntersectionId,
    value: f64,
    predecessor: Option<Arc<StreetSegment>>,
    permanent: bool,
}

impl Label {
    /// Creates a fresh label: infinite value, no predecessor, not permanent.
    pub fn new(id: IntersectionId) -> Self {
        Self {
            id,
            value: f64::INFINITY,
            predecessor: None,
            permanent: false,
        }
    }

    /// Replaces the value and predecessor if `value` is strictly smaller than the
    /// current value. Returns whether the label was changed.
    pub fn adjust_value(&mut self, value: f64, predecessor: Option<Arc<StreetSegment>>) -> bool {
        if value < self.value {
            self.value = value;
            self.predecessor = predecessor;
            true
        } else {
            false
        }
    }

    pub fn id(&self) -> IntersectionId {
        self.id
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn predecessor(&self) -> Option<&Arc<StreetSegment>> {
        self.predecessor.as_ref()
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    /// Marks the label as permanent. There is no way back.
    pub fn make_permanent(&mut self) {
        self.permanent = true;
    }
}

/// Outcome of relaxing a segment into its head label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Relaxation {
    /// The head label is permanent (or doesn't exist) and was left untouched.
    Ignored,

    /// The candidate value was not better than the current one.
    Unchanged,

    /// The head label improved; `previous` holds its value from before the change.
    Improved { previous: f64 },
}

/// Fixed-size array of labels, one per intersection, shared by all managers.
#[derive(Debug, Clone)]
pub(crate) struct LabelArray(Vec<Label>);

impl LabelArray {
    pub(crate) fn new(size: usize) -> Self {
        Self((0..size).map(Label::new).collect())
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn get(&self, id: IntersectionId) -> Option<&Label> {
        self.0.get(id)
    }

    pub(crate) fn as_slice(&self) -> &[Label] {
        &self.0
    }

    pub(crate) fn into_vec(self) -> Vec<Label> {
        self.0
    }

    pub(crate) fn value(&self, id: IntersectionId) -> f64 {
        self.0[id].value
    }

    pub(crate) fn is_permanent(&self, id: IntersectionId) -> bool {
        self.0[id].permanent
    }

    pub(crate) fn make_permanent(&mut self, id: IntersectionId) {
        if let Some(label) = self.0.get_mut(id) {
            label.make_permanent();
        }
    }

    /// Sets the value of a search root to zero.
    pub(crate) fn seed(&mut self, id: IntersectionId) -> Relaxation {
        match self.0.get_mut(id) {
            Some(label) => {
                let previous = label.value;
                if label.adjust_value(0.0, None) {
                    Relaxation::Improved { previous }
                } else {
                    Relaxation::Unchanged
                }
            }
            None => Relaxation::Ignored,
        }
    }

    /// Offers `tail.value + segment.length` to the head label of `segment`.
    pub(crate) fn relax(&mut self, segment: &Arc<StreetSegment>) -> Relaxation {
        let Some(tail_value) = self.0.get(segment.tail()).map(|l| l.value) else {
            return Relaxation::Ignored;
        };

        let Some(head) = self.0.get_mut(segment.head()) else {
            return Relaxation::Ignored;
        };

        if head.permanent {
            return Relaxation::Ignored;
        }

        let previous = head.value;
        let candidate = tail_value + segment.length();
        if head.adjust_value(candidate, Some(segment.clone())) {
            trace!(
                "relaxed {}: intersection {} {} -> {}",
                segment.id(),
                head.id,
                previous,
                candidate
            );
            Relaxation::Improved { previous }
        } else {
            Relaxation::Unchanged
        }
    }
}

/// Read and relax access to a label array.
pub trait LabelManager {
    /// Relaxes a segment whose tail label is already known: the head label receives
    /// `tail.value + segment.length` if that is an improvement and the head label
    /// is not permanent. Improved labels are re-indexed in the underlying structure.
    fn adjust_head_value(&mut self, segment: &Arc<StreetSegment>);

    /// Sets the label of a search root to zero and indexes it.
    fn seed(&mut self, id: IntersectionId);

    /// Gets the label of an intersection.
    fn label(&self, id: IntersectionId) -> Option<&Label>;

    /// Gets all labels, indexed by intersection id.
    fn labels(&self) -> &[Label];

    /// Consumes the manager, returning the label array.
    fn into_labels(self) -> Vec<Label>
    where
        Self: Sized;
}

/// A [LabelManager] which finalizes labels in order of increasing value.
pub trait PermanentLabelManager: LabelManager {
    /// Returns the id of the non-permanent label with the smallest finite value,
    /// or `None` if there is no such label.
    fn smallest_label(&mut self) -> Option<IntersectionId>;

    /// Marks the label of the given intersection as permanent.
    fn make_permanent(&mut self, id: IntersectionId);
}

/// A [LabelManager] which queues every label whose value improves.
pub trait CandidateLabelManager: LabelManager {
    /// Takes the next candidate as per the manager's policy.
    fn candidate_label(&mut self) -> Option<IntersectionId>;

    /// Adds the search root to an empty candidate list.
    fn initialize_candidates(&mut self, id: IntersectionId);

    fn is_candidates_empty(&self) -> bool;
}

/// Which [PermanentLabelManager] a label-setting search uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStructure {
    /// Linear scan over all labels; see [PermanentLabelList].
    List,

    /// d-ary heap with lazy deletion; see [PermanentLabelHeap].
    Heap { d: usize },

    /// Value buckets; see [PermanentLabelBuckets].
    #[default]
    Buckets,
}

impl fmt::Display for LabelStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Heap { d } => write!(f, "heap:{}", d),
            Self::Buckets => write!(f, "buckets"),
        }
    }
}

impl FromStr for LabelStructure {
    type Err = ParseError;

    /// Parses `list`, `buckets`, `heap` or `heap:<d>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "buckets" => Ok(Self::Buckets),
            "heap" => Ok(Self::Heap {
                d: DEFAULT_HEAP_ARITY,
            }),
            other => match other.strip_prefix("heap:") {
                Some(d) => match d.parse::<usize>() {
                    Ok(d) if d >= 2 => Ok(Self::Heap { d }),
                    _ => Err(ParseError::InvalidArity(d.to_string())),
                },
                None => Err(ParseError::UnknownStructure(s.to_string())),
            },
        }
    }
}

/// Order in which [CandidateLabelList] hands out candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidatePolicy {
    /// First in, first out.
    #[default]
    Oldest,

    /// Last in, first out.
    Newest,
}

impl fmt::Display for CandidatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oldest => write!(f, "oldest"),
            Self::Newest => write!(f, "newest"),
        }
    }
}

impl FromStr for CandidatePolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oldest" | "fifo" => Ok(Self::Oldest),
            "newest" | "lifo" => Ok(Self::Newest),
            _ => Err(ParseError::UnknownPolicy(s.to_string())),
        }
    }
}
