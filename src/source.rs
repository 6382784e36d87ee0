//! The demux collaborator contract.
//!
//! The crate does not demux containers itself. A [`PacketSource`] hands over
//! the container format name, the stream table, and an ordered sequence of
//! packets; anything that can do that (an FFmpeg binding, a bespoke
//! `.sup`/`.idx` reader, a test fixture) can feed a
//! [`SubtitleRenderer`](crate::SubtitleRenderer).
//!
//! [`MemorySource`] is a ready-made implementation over an in-memory packet
//! list.

use crate::stream::StreamInfo;

/// One demuxed packet of compressed subtitle data.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Position of the owning stream in the container's stream table.
    pub stream_index: usize,
    /// Presentation timestamp in the owning stream's time-base units.
    pub pts: i64,
    /// Raw compressed payload.
    pub data: Vec<u8>,
}

impl Packet {
    /// Convenience constructor.
    pub fn new(stream_index: usize, pts: i64, data: Vec<u8>) -> Self {
        Self {
            stream_index,
            pts,
            data,
        }
    }
}

/// An ordered source of demuxed subtitle packets.
///
/// Implementations are consumed in a single forward pass during timeline
/// construction. Read errors are the implementation's concern: returning
/// `None` ends the pass, exactly like end-of-file.
pub trait PacketSource {
    /// Short container format name (e.g. `"vobsub"`, `"sup"`). Checked
    /// against the supported set at construction time.
    fn format_name(&self) -> &str;

    /// The container's stream table. Must not change between calls.
    fn streams(&self) -> &[StreamInfo];

    /// Produce the next packet in container order, or `None` at end of
    /// stream.
    fn next_packet(&mut self) -> Option<Packet>;
}

/// A [`PacketSource`] over an in-memory packet list.
///
/// Useful for callers that already hold raw packet dumps, and throughout
/// this crate's tests and benchmarks.
#[derive(Debug, Clone)]
pub struct MemorySource {
    format: String,
    streams: Vec<StreamInfo>,
    packets: std::vec::IntoIter<Packet>,
}

impl MemorySource {
    /// Create a source over `packets`, served in order.
    pub fn new(
        format: impl Into<String>,
        streams: Vec<StreamInfo>,
        packets: Vec<Packet>,
    ) -> Self {
        Self {
            format: format.into(),
            streams,
            packets: packets.into_iter(),
        }
    }
}

impl PacketSource for MemorySource {
    fn format_name(&self) -> &str {
        &self.format
    }

    fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    fn next_packet(&mut self) -> Option<Packet> {
        self.packets.next()
    }
}
