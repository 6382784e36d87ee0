//! Timestamp to output-frame-index mapping.
//!
//! A decoder timestamp is expressed in stream time-base ticks. Mapping it to
//! an output frame index multiplies the time base by the output frame rate
//! (yielding frames per tick), then by the tick count, then truncates. The
//! two scale steps reduce the fraction in between, which keeps the
//! intermediate products small and — more importantly — fixes the rounding
//! behaviour for timestamps at or near interval boundaries. Do not reorder
//! them.

use crate::rational::Rational;

/// Map a timestamp in stream time-base units to an output frame index.
///
/// `fps` is the output frame rate as an exact fraction. Truncates toward
/// zero, so a timestamp exactly on a frame boundary maps to that frame.
///
/// An invalid `time_base` (zero denominator) propagates through both scale
/// steps; the final truncation then divides by zero and panics, which is a
/// caller precondition violation rather than a supported input.
pub fn frame_index_for(timestamp: i64, time_base: Rational, fps: Rational) -> i64 {
    time_base
        .scale(fps.num, fps.den)
        .scale(timestamp, 1)
        .truncate()
}
