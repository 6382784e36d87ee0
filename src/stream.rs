//! Subtitle stream descriptions and stream selection.
//!
//! A [`PacketSource`](crate::PacketSource) exposes one [`StreamInfo`] per
//! stream in the container. Selection follows the host contract: an explicit
//! stream id must exist and carry a supported codec, otherwise the first
//! stream with a supported codec wins.

use crate::error::SubImageError;
use crate::rational::Rational;

/// Codec carried by a subtitle stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StreamCodec {
    /// DVD (VobSub) bitmap subtitles. Events carry explicit display
    /// offsets relative to the packet timestamp.
    DvdSubtitle,
    /// Blu-ray (HDMV PGS) bitmap subtitles. Display ends are signalled by a
    /// later zero-rect event, not by the event itself.
    HdmvPgs,
    /// Any other codec; the name is kept for error messages.
    Other(String),
}

impl StreamCodec {
    /// Whether this codec is in the supported bitmap-subtitle set.
    pub fn is_supported(&self) -> bool {
        matches!(self, StreamCodec::DvdSubtitle | StreamCodec::HdmvPgs)
    }

    /// Codec name as used in diagnostics and the info description.
    pub fn name(&self) -> &str {
        match self {
            StreamCodec::DvdSubtitle => "dvd_subtitle",
            StreamCodec::HdmvPgs => "hdmv_pgs_subtitle",
            StreamCodec::Other(name) => name,
        }
    }
}

/// Description of one stream in the opened container.
#[derive(Debug, Clone)]
pub struct StreamInfo {
    /// Position of the stream in the container's stream table.
    pub index: usize,
    /// Container-level stream id (e.g. the MPEG program id), used for
    /// explicit selection.
    pub id: i32,
    /// The stream's codec.
    pub codec: StreamCodec,
    /// Coded subtitle canvas width in pixels.
    pub width: u32,
    /// Coded subtitle canvas height in pixels.
    pub height: u32,
    /// Time base for this stream's packet timestamps.
    pub time_base: Rational,
    /// Language tag from the container metadata, if present.
    pub language: Option<String>,
}

/// Pick the stream to decode.
///
/// With `Some(id)`, the stream carrying that container id must exist and
/// must have a supported codec. With `None`, the first stream whose codec is
/// supported is chosen.
///
/// Returns the position of the chosen stream within `streams`.
pub(crate) fn select_stream(
    streams: &[StreamInfo],
    id: Option<i32>,
) -> Result<usize, SubImageError> {
    match id {
        Some(id) => {
            let position = streams
                .iter()
                .position(|stream| stream.id == id)
                .ok_or(SubImageError::NoSuchStream { id })?;

            let codec = &streams[position].codec;
            if !codec.is_supported() {
                return Err(SubImageError::UnsupportedStreamCodec {
                    codec: codec.name().to_string(),
                });
            }

            Ok(position)
        }
        None => streams
            .iter()
            .position(|stream| stream.codec.is_supported())
            .ok_or(SubImageError::NoSupportedStream),
    }
}

/// Build the "Supported subtitle streams:" description text.
///
/// One line per supported stream: hex id, language when known, coded size,
/// codec name. Attached to rendered frames when the `info` option is set.
pub(crate) fn describe_streams(streams: &[StreamInfo]) -> String {
    let mut description = String::from("Supported subtitle streams:\n");

    for stream in streams {
        if !stream.codec.is_supported() {
            continue;
        }

        description.push_str(&format!("Id: {:#x}", stream.id));
        if let Some(language) = &stream.language {
            description.push_str(&format!(", language: {language}"));
        }
        description.push_str(&format!(
            ", size: {}x{}, type: {}\n",
            stream.width,
            stream.height,
            stream.codec.name()
        ));
    }

    description.pop();
    description
}
