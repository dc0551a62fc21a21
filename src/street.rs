// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::geometry::interpolate;
use crate::{Point, StreetSegment};

/// Joins the parts of a street name with single spaces, skipping empty parts.
///
/// ```
/// assert_eq!(streetnav::canonical_name("N", "Main", "St", ""), "N Main St");
/// ```
pub fn canonical_name(prefix: &str, name: &str, category: &str, suffix: &str) -> String {
    [prefix, name, category, suffix]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A named street: an ordered collection of [StreetSegments](StreetSegment)
/// sharing the same canonical name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Street {
    name: String,
    code: String,
    segments: Vec<Arc<StreetSegment>>,
}

impl Street {
    pub fn new<S: Into<String>, C: Into<String>>(name: S, code: C) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            segments: Vec::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn segments(&self) -> &[Arc<StreetSegment>] {
        &self.segments
    }

    /// Appends a segment to the street. Segments with an already-known id are ignored.
    pub fn add_segment(&mut self, segment: Arc<StreetSegment>) {
        if !self.segments.iter().any(|s| s.id() == segment.id()) {
            self.segments.push(segment);
        }
    }

    /// Returns all segments whose address range contains `number`
    /// on the same side of the street (same parity as the low address).
    pub fn segments_for_number(&self, number: i32) -> impl Iterator<Item = &Arc<StreetSegment>> {
        self.segments.iter().filter(move |s| {
            s.low_address() <= number
                && s.high_address() >= number
                && s.low_address().rem_euclid(2) == number.rem_euclid(2)
        })
    }

    /// Groups segments into streets by their [street name](StreetSegment::street_name).
    /// Segments without a name are not part of any street.
    pub fn group<I: IntoIterator<Item = Arc<StreetSegment>>>(segments: I) -> HashMap<String, Street> {
        let mut streets: HashMap<String, Street> = HashMap::default();
        for segment in segments {
            if segment.street_name().is_empty() {
                continue;
            }

            streets
                .entry(segment.street_name().to_string())
                .or_insert_with(|| Street::new(segment.street_name(), segment.code()))
                .add_segment(segment);
        }
        streets
    }
}

/// A location found by [geocode].
#[derive(Debug, Clone, PartialEq)]
pub struct Geocoded {
    pub segment_id: String,
    pub location: Point,
}

/// Finds the locations of the address `number` on the street with the given canonical name.
///
/// The location is interpolated linearly between the first and the last point of every
/// matching segment, proportionally to where `number` falls in the segment's address range.
/// Returns an empty vector if there is no such street or no segment covers the number.
pub fn geocode(streets: &HashMap<String, Street>, name: &str, number: i32) -> Vec<Geocoded> {
    let Some(street) = streets.get(name) else {
        return vec![];
    };

    street
        .segments_for_number(number)
        .filter_map(|segment| {
            let (first, last) = (segment.tail_point()?, segment.head_point()?);
            let range = segment.high_address() - segment.low_address();
            let fraction = if range == 0 {
                0.0
            } else {
                (number - segment.low_address()) as f64 / range as f64
            };

            Some(Geocoded {
                segment_id: segment.id().to_string(),
                location: interpolate(first, last, fraction),
            })
        })
        .collect()
}
