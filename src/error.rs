//! Error types for the `subimage` crate.
//!
//! This module defines [`SubImageError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry enough context to
//! identify the failing stage and, where available, the underlying decoder's
//! diagnostic string.

use thiserror::Error;

use crate::decoder::{DecodeError, DecoderSetupError};

/// The unified error type for all `subimage` operations.
///
/// Construction-time errors are fatal:
/// [`SubtitleRenderer::open`](crate::SubtitleRenderer::open) either returns a
/// fully initialised renderer or one of these — never a partial object.
/// Render-time errors are fatal to that single
/// [`render`](crate::SubtitleRenderer::render) call only; the renderer stays
/// usable afterwards.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubImageError {
    /// The subtitle source could not be opened.
    ///
    /// Produced by [`PacketSource`](crate::PacketSource) implementations,
    /// never by the core itself.
    #[error("failed to open subtitle source: {reason}")]
    SourceOpen {
        /// Underlying reason the open failed.
        reason: String,
    },

    /// Stream information could not be read from the source.
    ///
    /// Produced by [`PacketSource`](crate::PacketSource) implementations.
    #[error("failed to read stream info: {reason}")]
    StreamInfo {
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// The container format is not one of the supported subtitle containers.
    #[error("unsupported file format '{format}'")]
    UnsupportedFormat {
        /// The container format name reported by the source.
        format: String,
    },

    /// The source contains no streams at all.
    #[error("no streams found")]
    NoStreamsFound,

    /// No stream carries the explicitly requested id.
    #[error("there is no stream with id {id:#x}")]
    NoSuchStream {
        /// The requested stream id.
        id: i32,
    },

    /// The explicitly selected stream does not carry a supported subtitle
    /// codec.
    #[error("selected stream has unsupported codec '{codec}'")]
    UnsupportedStreamCodec {
        /// Name of the stream's actual codec.
        codec: String,
    },

    /// No stream with a supported subtitle codec exists (auto-selection).
    #[error("no supported subtitle streams found")]
    NoSupportedStream,

    /// No decoder is available for the selected stream's codec.
    #[error("failed to find decoder for '{codec}'")]
    DecoderNotFound {
        /// Name of the codec a decoder was requested for.
        codec: String,
    },

    /// The decoder could not be allocated.
    #[error("failed to allocate subtitle decoder")]
    DecoderAllocFailed,

    /// The decoder was found and allocated but refused to open.
    #[error("failed to open subtitle decoder: {reason}")]
    DecoderOpenFailed {
        /// Diagnostic string from the decoder.
        reason: String,
    },

    /// The full decode pass over the source produced zero intervals.
    #[error("no usable subtitle pictures found")]
    NoUsableSubtitles,

    /// A packet failed to decode while rendering an interval.
    ///
    /// During timeline construction the same condition skips the packet
    /// instead; only the render path treats it as fatal.
    #[error("failed to decode subtitle: {reason}")]
    DecodeFailed {
        /// Diagnostic string from the decoder.
        reason: String,
    },

    /// The decoder produced an event before the interval's payload was
    /// exhausted.
    #[error("got subtitle sooner than expected")]
    UnexpectedEarlyEvent,

    /// The decoder produced no event after the interval's entire payload
    /// was replayed.
    #[error("got no subtitle after decoding all the packets")]
    NoEventProduced,

    /// The decoder produced an event with zero rects where a picture was
    /// expected.
    #[error("got subtitle with no rects")]
    EmptyEvent,

    /// The palette override table has more entries than palette slots.
    #[error("the palette can have at most {max} elements, got {got}")]
    InvalidPaletteSize {
        /// Maximum number of palette slots.
        max: usize,
        /// Number of entries supplied.
        got: usize,
    },
}

impl From<DecoderSetupError> for SubImageError {
    fn from(error: DecoderSetupError) -> Self {
        match error {
            DecoderSetupError::NotFound { codec } => SubImageError::DecoderNotFound { codec },
            DecoderSetupError::AllocFailed => SubImageError::DecoderAllocFailed,
            DecoderSetupError::OpenFailed { reason } => SubImageError::DecoderOpenFailed { reason },
        }
    }
}

impl From<DecodeError> for SubImageError {
    fn from(error: DecodeError) -> Self {
        SubImageError::DecodeFailed {
            reason: error.to_string(),
        }
    }
}
