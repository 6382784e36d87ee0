//! Building the subtitle timeline.
//!
//! One forward pass over the source turns the decoder's event stream into an
//! ordered list of [`Interval`]s, each tying a range of output frames to the
//! packet payload needed to re-render its picture. A correction pass then
//! repairs intervals whose end is unknown: PGS streams often never emit a
//! zero-rect terminator between two pictures, and VobSub streams sometimes
//! report a zero display duration. In both cases the picture stays visible
//! until the next interval starts — or, for the last interval, through the
//! end of the video, which can over-extend a genuinely short final picture.

use crate::decoder::{DecodeOutcome, SubtitleDecoder};
use crate::error::SubImageError;
use crate::rational::Rational;
use crate::source::{Packet, PacketSource};
use crate::stream::{StreamCodec, StreamInfo};
use crate::timestamp::frame_index_for;

/// End-frame value meaning "not known yet"; replaced by the correction pass.
const END_FRAME_UNKNOWN: i64 = 0;

/// A contiguous range of output frames showing one subtitle picture.
///
/// `end_frame` is exclusive: the first frame where the picture is no longer
/// displayed. Gaps between intervals mean no subtitle is visible there.
#[derive(Debug, Clone)]
pub struct Interval {
    /// The packets that produce this picture when replayed through the
    /// decoder.
    pub(crate) packets: Vec<Packet>,
    /// First output frame covered.
    pub start_frame: i64,
    /// First output frame *not* covered.
    pub end_frame: i64,
}

impl Interval {
    /// Whether `frame` falls inside this interval.
    pub fn contains(&self, frame: i64) -> bool {
        self.start_frame <= frame && frame < self.end_frame
    }

    /// Number of packets in this interval's payload.
    pub fn packet_count(&self) -> usize {
        self.packets.len()
    }
}

/// The ordered list of subtitle display intervals for one stream.
#[derive(Debug, Clone)]
pub struct SubtitleTimeline {
    intervals: Vec<Interval>,
}

impl SubtitleTimeline {
    /// Run the single demux/decode pass and build the corrected timeline.
    ///
    /// Packets from other streams are ignored. A packet the decoder rejects
    /// is dropped and the pass continues — at this stage a broken packet
    /// costs at most one picture, while during render the same failure is
    /// fatal. A zero-rect event closes the previous interval at the frame
    /// of the event's own timestamp; one arriving before any interval
    /// exists is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SubImageError::NoUsableSubtitles`] if the pass produces no
    /// intervals.
    pub(crate) fn build<S: PacketSource>(
        source: &mut S,
        decoder: &mut dyn SubtitleDecoder,
        stream: &StreamInfo,
        fps: Rational,
        total_frames: i64,
    ) -> Result<Self, SubImageError> {
        let time_base = stream.time_base;
        let has_display_times = stream.codec == StreamCodec::DvdSubtitle;

        let mut intervals: Vec<Interval> = Vec::new();
        let mut pending: Vec<Packet> = Vec::new();

        while let Some(packet) = source.next_packet() {
            if packet.stream_index != stream.index {
                continue;
            }

            let outcome = match decoder.decode(&packet) {
                Ok(outcome) => outcome,
                Err(error) => {
                    log::trace!("dropping undecodable packet at pts {}: {error}", packet.pts);
                    continue;
                }
            };

            match outcome {
                DecodeOutcome::Pending => pending.push(packet),
                DecodeOutcome::Event(event) if event.is_terminator() => {
                    // The event's timestamp is the first packet of its
                    // accumulated run, or the triggering packet itself.
                    let pts = pending.first().map_or(packet.pts, |first| first.pts);
                    if let Some(previous) = intervals.last_mut() {
                        previous.end_frame = frame_index_for(pts, time_base, fps);
                    }
                    pending.clear();
                }
                DecodeOutcome::Event(event) => {
                    let event_pts = packet.pts;
                    pending.push(packet);

                    let mut start_time = pending[0].pts;
                    let mut end_frame = END_FRAME_UNKNOWN;
                    if has_display_times {
                        start_time += event.start_display;
                        if event.end_display != 0 {
                            end_frame =
                                frame_index_for(event_pts + event.end_display, time_base, fps);
                        }
                    }

                    intervals.push(Interval {
                        packets: std::mem::take(&mut pending),
                        start_frame: frame_index_for(start_time, time_base, fps),
                        end_frame,
                    });
                }
            }
        }

        if intervals.is_empty() {
            return Err(SubImageError::NoUsableSubtitles);
        }

        // Correction pass: an unknown end extends to the next interval's
        // start, or through the end of the video for the last interval.
        for i in 0..intervals.len() {
            let next_start = intervals.get(i + 1).map(|next| next.start_frame);
            let interval = &mut intervals[i];
            if interval.end_frame == END_FRAME_UNKNOWN {
                interval.end_frame = next_start.unwrap_or(total_frames);
            }
        }

        log::debug!("built subtitle timeline with {} intervals", intervals.len());

        Ok(Self { intervals })
    }

    /// Point query: the index of the interval covering `frame`, if any.
    ///
    /// Supports arbitrary, non-monotonic query order.
    pub fn find(&self, frame: i64) -> Option<usize> {
        self.intervals
            .iter()
            .position(|interval| interval.contains(frame))
    }

    /// Flatten query: frame `i` maps directly to interval `i`.
    pub(crate) fn flatten_index(&self, frame: i64) -> Option<usize> {
        if frame >= 0 && (frame as usize) < self.intervals.len() {
            Some(frame as usize)
        } else {
            None
        }
    }

    /// The corrected intervals, in display order.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether the timeline holds no intervals. Never true for a timeline
    /// returned by construction.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The interval at `index`.
    pub(crate) fn interval(&self, index: usize) -> &Interval {
        &self.intervals[index]
    }
}
