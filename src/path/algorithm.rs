// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use super::ParseError;
use crate::{CandidatePolicy, LabelStructure};

/// Shortest path algorithm used by a [PathFinder](crate::PathFinder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Dijkstra-style search finalizing one label at a time,
    /// using the given structure to pick the next label.
    LabelSetting(LabelStructure),

    /// Search re-examining every improved label, in the order given by the policy.
    /// Slower, but a useful cross-check for [Algorithm::LabelSetting].
    LabelCorrecting(CandidatePolicy),
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::LabelSetting(LabelStructure::default())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LabelSetting(structure) => write!(f, "{}", structure),
            Self::LabelCorrecting(policy) => write!(f, "correcting:{}", policy),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    /// Parses a [LabelStructure] (`list`, `heap`, `heap:<d>`, `buckets`) into
    /// [Algorithm::LabelSetting], or `correcting[:<policy>]` into [Algorithm::LabelCorrecting].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized == "correcting" {
            Ok(Self::LabelCorrecting(CandidatePolicy::default()))
        } else if let Some(policy) = normalized.strip_prefix("correcting:") {
            Ok(Self::LabelCorrecting(policy.parse()?))
        } else {
            Ok(Self::LabelSetting(normalized.parse()?))
        }
    }
}
