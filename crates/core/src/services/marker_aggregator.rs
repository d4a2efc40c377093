use std::collections::HashSet;

use tracing::debug;

use crate::models::marker::{Marker, RawMarker};
use crate::services::time_normalizer::TimeNormalizer;

/// Merges marker sources into one time-ordered, deduplicated annotation layer.
///
/// The result replaces the chart's marker layer wholesale on every recomputation.
pub struct MarkerAggregator;

impl MarkerAggregator {
    /// Merge marker sources.
    ///
    /// 1. Concatenate the sources in the order given
    /// 2. Drop entries without a time
    /// 3. Normalize times to epoch seconds
    /// 4. Stable sort by time
    /// 5. Deduplicate on `(time, text)`, keeping the last occurrence
    ///
    /// The output is non-decreasing in time and holds at most one marker per key.
    pub fn merge(sources: &[&[RawMarker]]) -> Vec<Marker> {
        let mut formatted: Vec<Marker> = sources
            .iter()
            .flat_map(|source| source.iter())
            .filter_map(Self::normalize)
            .collect();

        // sort_by_key is stable: equal times keep their input order
        formatted.sort_by_key(|m| m.time);

        // Walk backwards so the occurrence nearest the end wins, then restore order.
        let mut seen: HashSet<(i64, String)> = HashSet::with_capacity(formatted.len());
        let mut unique = Vec::with_capacity(formatted.len());
        for marker in formatted.into_iter().rev() {
            if seen.insert((marker.time, marker.text.clone())) {
                unique.push(marker);
            }
        }
        unique.reverse();

        debug!(count = unique.len(), "markers merged");
        unique
    }

    /// Normalize one wire marker, or `None` when it has no time.
    pub fn normalize(raw: &RawMarker) -> Option<Marker> {
        let time = raw.time?;
        Some(Marker {
            time: TimeNormalizer::normalize(time),
            position: raw.position.unwrap_or_default(),
            color: raw.color.clone().unwrap_or_default(),
            shape: raw.shape.unwrap_or_default(),
            text: raw.text.clone().unwrap_or_default(),
        })
    }
}
