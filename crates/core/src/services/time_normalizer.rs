/// Values above this are taken to be milliseconds. As seconds it would be a
/// date past the year 2286.
pub const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Classifies epoch timestamps as seconds or milliseconds and normalizes them to seconds.
pub struct TimeNormalizer;

impl TimeNormalizer {
    /// Normalize an epoch timestamp to seconds.
    ///
    /// Anything at or below [`MILLIS_THRESHOLD`] is returned unchanged.
    pub fn normalize(t: i64) -> i64 {
        if t > MILLIS_THRESHOLD {
            t.div_euclid(1000)
        } else {
            t
        }
    }

    /// Whether `t` would be treated as a millisecond timestamp.
    pub fn is_millis(t: i64) -> bool {
        t > MILLIS_THRESHOLD
    }
}
