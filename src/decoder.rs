//! The decoder collaborator contract.
//!
//! Decoding the subtitle bitstream is not this crate's job. A
//! [`SubtitleDecoder`] accepts packets one at a time and either reports
//! "nothing materialised yet" or hands back a fully decoded
//! [`SubtitleEvent`]. A [`DecoderOpener`] creates one decoder for the
//! selected stream at construction time; the same decoder instance then
//! serves both the timeline pass and every render replay, because some
//! formats keep composition state between events.
//!
//! # Seek behaviour
//!
//! PGS decoders are only reliably accurate when fed several preceding
//! events first; random access without that context produces wrong or
//! missing bitmaps. [`SeekProfile`] lets a decoder declare this so the
//! renderer knows when to replay earlier intervals ("priming"). The
//! lookback count is an empirical workaround, not a proven bound — see
//! [`SeekProfile::ForwardOnly`].

use thiserror::Error;

use crate::source::Packet;
use crate::stream::StreamInfo;

/// Number of palette slots in a bitmap rect.
pub const PALETTE_COUNT: usize = 256;

/// Decoder verbosity, passed to [`DecoderOpener::open`].
///
/// Decoders built on C libraries usually have their own logging separate
/// from the Rust [`log`](https://crates.io/crates/log) crate; this maps onto
/// such a library's level set. The renderer default is
/// [`Panic`](DecoderLogLevel::Panic): only messages about unrecoverable
/// aborts get through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecoderLogLevel {
    /// Print no output at all.
    Quiet,
    /// Only log when the decoder is about to abort.
    #[default]
    Panic,
    /// Log unrecoverable errors.
    Fatal,
    /// Log recoverable errors.
    Error,
    /// Log warnings.
    Warning,
    /// Log informational messages.
    Info,
    /// Log verbose informational messages.
    Verbose,
    /// Log debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

/// How a decoder behaves under random access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekProfile {
    /// The decoder produces correct output for any interval regardless of
    /// what was decoded before it. DVD subtitle decoders qualify: every
    /// event is self-contained.
    SeekSafe,
    /// The decoder needs preceding events replayed before a non-adjacent
    /// interval decodes correctly. The renderer replays up to `lookback`
    /// preceding intervals (discarding their output) before the target.
    ///
    /// The lookback count is empirical: for PGS, 5 was not enough and 10
    /// seems to work. There is no proof of sufficiency for all streams.
    ForwardOnly {
        /// How many preceding intervals to replay.
        lookback: usize,
    },
}

/// Kind of content in a decoded rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RectKind {
    /// A paletted bitmap. The only kind this crate composites.
    Bitmap,
    /// Plain text (not supported, skipped).
    Text,
    /// ASS markup (not supported, skipped).
    Ass,
}

/// A rectangular paletted image inside a decoded event.
#[derive(Debug, Clone)]
pub struct SubtitleRect {
    /// Kind of content. Non-bitmap rects are skipped during compositing.
    pub kind: RectKind,
    /// Horizontal origin on the subtitle canvas.
    pub x: i32,
    /// Vertical origin on the subtitle canvas.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Row stride of `data` in bytes; at least `width` for bitmap rects.
    pub stride: usize,
    /// 256-entry palette, each entry packed `0xAARRGGBB`.
    pub palette: [u32; PALETTE_COUNT],
    /// Row-major palette indices, one byte per pixel, `stride` bytes per
    /// row.
    pub data: Vec<u8>,
}

/// One fully materialised decoder output.
#[derive(Debug, Clone, Default)]
pub struct SubtitleEvent {
    /// Offset added to the event's base timestamp to get the moment the
    /// picture appears. Only meaningful for formats with explicit display
    /// times (DVD).
    pub start_display: i64,
    /// Offset added to the event's base timestamp to get the moment the
    /// picture disappears. Zero means "not stated"; the timeline correction
    /// pass fills it in from the following interval.
    pub end_display: i64,
    /// The decoded rects. Empty marks a terminator: the previous picture's
    /// display ends now.
    pub rects: Vec<SubtitleRect>,
}

impl SubtitleEvent {
    /// Whether this event is a terminator (no rects).
    pub fn is_terminator(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Result of feeding one packet to a decoder.
#[derive(Debug, Clone)]
pub enum DecodeOutcome {
    /// The packet was consumed but no event materialised yet.
    Pending,
    /// A complete event materialised.
    Event(SubtitleEvent),
}

/// Error reported by a decoder for a single packet.
///
/// During timeline construction the renderer skips the offending packet;
/// during render replay the same error is fatal to the call
/// ([`DecodeFailed`](crate::SubImageError::DecodeFailed)).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

/// Error from [`DecoderOpener::open`].
#[derive(Debug, Clone, Error)]
pub enum DecoderSetupError {
    /// No decoder exists for the stream's codec.
    #[error("no decoder for '{codec}'")]
    NotFound {
        /// Codec name a decoder was requested for.
        codec: String,
    },
    /// The decoder could not be allocated.
    #[error("decoder allocation failed")]
    AllocFailed,
    /// The decoder refused to open with the stream's parameters.
    #[error("decoder open failed: {reason}")]
    OpenFailed {
        /// Diagnostic string from the decoder.
        reason: String,
    },
}

/// A stateful subtitle decoder for one stream.
///
/// The renderer calls [`decode`](SubtitleDecoder::decode) sequentially; the
/// decoder may keep arbitrary internal state between calls (PGS composition
/// buffers, DVD palettes from stream extradata, ...). Implementations only
/// need to be safe for sequential use from one thread; the `Send` bound
/// exists so whole renderer instances can move between threads when the
/// host runs one instance per stream.
pub trait SubtitleDecoder: Send {
    /// Feed one packet. Returns [`DecodeOutcome::Pending`] while an event is
    /// still being assembled from multiple packets.
    fn decode(&mut self, packet: &Packet) -> Result<DecodeOutcome, DecodeError>;

    /// Declare how this decoder behaves under random access.
    fn seek_profile(&self) -> SeekProfile;
}

/// Opens a [`SubtitleDecoder`] for a selected stream.
///
/// Called exactly once during renderer construction, after stream
/// selection. The `verbosity` parameter replaces any process-global log
/// toggle the underlying library might have.
pub trait DecoderOpener {
    /// Open a decoder configured for `stream`.
    fn open(
        &self,
        stream: &StreamInfo,
        verbosity: DecoderLogLevel,
    ) -> Result<Box<dyn SubtitleDecoder>, DecoderSetupError>;
}
