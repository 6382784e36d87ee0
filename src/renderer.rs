//! Core [`SubtitleRenderer`] implementation.
//!
//! `SubtitleRenderer` is the main entry point for the crate. It consumes a
//! [`PacketSource`] once at construction to build the subtitle timeline,
//! keeps the opened decoder for render-time replays, and answers random
//! frame requests with planar RGB + alpha images.
//!
//! Rendering is synchronous and single-threaded: one frame completes before
//! the next request. For concurrent rendering across logical streams, open
//! one independent renderer per stream — instances share nothing.

use std::sync::Arc;

use crate::compositor::composite_rects;
use crate::decoder::{DecodeOutcome, DecoderOpener, SeekProfile, SubtitleDecoder, SubtitleEvent};
use crate::error::SubImageError;
use crate::frame::RenderedFrame;
use crate::options::RenderOptions;
use crate::palette::PaletteOverride;
use crate::rational::Rational;
use crate::source::PacketSource;
use crate::stream::{StreamInfo, describe_streams, select_stream};
use crate::timeline::SubtitleTimeline;

/// Container formats the renderer accepts.
const SUPPORTED_FORMATS: [&str; 2] = ["vobsub", "sup"];

/// Single-slot render cache: the most recently rendered interval and its
/// frame.
#[derive(Default)]
struct RenderState {
    /// Index of the last successfully rendered interval. Never set for
    /// "no subtitle" frames, so a blank never masks a real interval.
    last_interval: Option<usize>,
    /// The frame produced for `last_interval`.
    last_frame: Option<Arc<RenderedFrame>>,
}

/// Renders one subtitle stream to per-frame planar RGB + alpha images.
///
/// Created via [`SubtitleRenderer::open`]; construction runs the full
/// demux/decode pass and either yields a ready renderer or fails — there is
/// no partially initialised state.
///
/// # Example
///
/// ```no_run
/// use subimage::{
///     DecodeError, DecodeOutcome, DecoderLogLevel, DecoderOpener, DecoderSetupError,
///     MemorySource, Packet, RenderOptions, Rational, StreamInfo, SubtitleDecoder,
///     SubtitleRenderer,
/// };
///
/// // A demuxer/decoder pair for `.sup` files, provided by the caller.
/// struct SupDecoder;
///
/// impl SubtitleDecoder for SupDecoder {
///     fn decode(&mut self, _packet: &Packet) -> Result<DecodeOutcome, DecodeError> {
///         unimplemented!("parse PGS segments here")
///     }
///     fn seek_profile(&self) -> subimage::SeekProfile {
///         subimage::SeekProfile::ForwardOnly { lookback: 10 }
///     }
/// }
///
/// struct SupOpener;
///
/// impl DecoderOpener for SupOpener {
///     fn open(
///         &self,
///         _stream: &StreamInfo,
///         _verbosity: DecoderLogLevel,
///     ) -> Result<Box<dyn SubtitleDecoder>, DecoderSetupError> {
///         Ok(Box::new(SupDecoder))
///     }
/// }
///
/// # fn demux() -> MemorySource { unimplemented!() }
/// let source: MemorySource = demux();
/// let mut renderer = SubtitleRenderer::open(
///     source,
///     &SupOpener,
///     Rational::new(24000, 1001),
///     34_047,
///     RenderOptions::new(),
/// )
/// .unwrap();
///
/// let frame = renderer.render(500).unwrap();
/// frame.to_rgba_image().save("subtitle_500.png").unwrap();
/// ```
pub struct SubtitleRenderer {
    /// The decoder opened for the selected stream; shared by the
    /// construction pass and every render replay.
    decoder: Box<dyn SubtitleDecoder>,
    /// The corrected interval list.
    timeline: SubtitleTimeline,
    /// The selected stream's description.
    stream: StreamInfo,
    /// Zero-filled canvas template, cloned (never mutated) per render.
    blank: RenderedFrame,
    /// Palette overrides applied to every rect.
    palette: PaletteOverride,
    /// Desaturate pictures.
    grayscale: bool,
    /// One output frame per interval instead of per video frame.
    flatten: bool,
    /// Stream-listing text attached to frames, when requested.
    description: Option<String>,
    /// Host-provided output frame count (per-frame mode).
    total_frames: i64,
    /// Single-slot cache.
    state: RenderState,
}

impl std::fmt::Debug for SubtitleRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtitleRenderer")
            .field("timeline", &self.timeline)
            .field("stream", &self.stream)
            .field("palette", &self.palette)
            .field("grayscale", &self.grayscale)
            .field("flatten", &self.flatten)
            .field("description", &self.description)
            .field("total_frames", &self.total_frames)
            .finish_non_exhaustive()
    }
}

impl SubtitleRenderer {
    /// Open a renderer over `source`.
    ///
    /// `fps` and `total_frames` describe the output timeline the subtitles
    /// are mapped onto (normally the base video's frame rate and length).
    /// The whole source is demuxed and decoded here; the source is consumed.
    ///
    /// # Errors
    ///
    /// - [`SubImageError::UnsupportedFormat`] if the container is not
    ///   VobSub or SUP.
    /// - [`SubImageError::NoStreamsFound`] if the source has no streams.
    /// - [`SubImageError::NoSuchStream`] /
    ///   [`SubImageError::UnsupportedStreamCodec`] /
    ///   [`SubImageError::NoSupportedStream`] from stream selection.
    /// - [`SubImageError::DecoderNotFound`] /
    ///   [`SubImageError::DecoderAllocFailed`] /
    ///   [`SubImageError::DecoderOpenFailed`] from the decoder opener.
    /// - [`SubImageError::NoUsableSubtitles`] if the decode pass produces
    ///   zero intervals.
    pub fn open<S: PacketSource>(
        mut source: S,
        opener: &dyn DecoderOpener,
        fps: Rational,
        total_frames: i64,
        options: RenderOptions,
    ) -> Result<Self, SubImageError> {
        let format = source.format_name();
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(SubImageError::UnsupportedFormat {
                format: format.to_string(),
            });
        }

        if source.streams().is_empty() {
            return Err(SubImageError::NoStreamsFound);
        }

        let position = select_stream(source.streams(), options.stream_id)?;
        let stream = source.streams()[position].clone();
        log::debug!(
            "selected subtitle stream {} (id {:#x}, codec {})",
            stream.index,
            stream.id,
            stream.codec.name()
        );

        let description = options.info.then(|| describe_streams(source.streams()));

        let mut decoder = opener.open(&stream, options.decoder_log_level)?;

        let timeline =
            SubtitleTimeline::build(&mut source, decoder.as_mut(), &stream, fps, total_frames)?;

        let blank = RenderedFrame::blank(stream.width as usize, stream.height as usize);

        Ok(Self {
            decoder,
            timeline,
            stream,
            blank,
            palette: options.palette,
            grayscale: options.grayscale,
            flatten: options.flatten,
            description,
            total_frames,
            state: RenderState::default(),
        })
    }

    /// Render output frame `n`.
    ///
    /// Returns the RGB planes with the alpha plane attached. When no
    /// interval covers `n`, the blank (fully transparent) frame is
    /// returned. Requesting the same interval twice in a row returns the
    /// cached frame without touching the decoder.
    ///
    /// # Errors
    ///
    /// - [`SubImageError::DecodeFailed`] if a payload packet fails to
    ///   decode.
    /// - [`SubImageError::UnexpectedEarlyEvent`] if an event materialises
    ///   before the payload is exhausted.
    /// - [`SubImageError::NoEventProduced`] if the payload yields no event.
    /// - [`SubImageError::EmptyEvent`] if the event has no rects.
    pub fn render(&mut self, n: i64) -> Result<Arc<RenderedFrame>, SubImageError> {
        let index = if self.flatten {
            self.timeline.flatten_index(n)
        } else {
            self.timeline.find(n)
        };

        if index.is_some() && index == self.state.last_interval {
            if let Some(frame) = &self.state.last_frame {
                return Ok(Arc::clone(frame));
            }
        }

        let mut frame = self.blank.clone();

        if let Some(idx) = index {
            self.prime_decoder(idx);

            let event = self.replay_interval(idx)?;
            if event.rects.is_empty() {
                return Err(SubImageError::EmptyEvent);
            }

            composite_rects(&event.rects, &self.palette, self.grayscale, &mut frame);
        }

        frame.description = self.description.clone();
        let frame = Arc::new(frame);

        // Only a real interval updates the cache; a blank result must not
        // make the next real request look sequential.
        if index.is_some() {
            self.state.last_interval = index;
            self.state.last_frame = Some(Arc::clone(&frame));
        }

        Ok(frame)
    }

    /// Replay earlier intervals when the decoder cannot seek backward.
    ///
    /// Forward-only decoders (PGS) produce wrong pictures on random access
    /// unless several preceding events are decoded first. Replay output and
    /// errors are both discarded — this rebuilds decoder state, nothing
    /// more.
    fn prime_decoder(&mut self, idx: usize) {
        let SeekProfile::ForwardOnly { lookback } = self.decoder.seek_profile() else {
            return;
        };

        let sequential = self
            .state
            .last_interval
            .is_some_and(|last| last + 1 == idx);
        if sequential {
            return;
        }

        let first = idx.saturating_sub(lookback);
        if first < idx {
            log::debug!("priming decoder by replaying intervals {first}..{idx}");
        }
        for s in first..idx {
            for packet in &self.timeline.interval(s).packets {
                let _ = self.decoder.decode(packet);
            }
        }
    }

    /// Replay one interval's payload and return the materialised event.
    fn replay_interval(&mut self, idx: usize) -> Result<SubtitleEvent, SubImageError> {
        let packets = &self.timeline.interval(idx).packets;
        let mut produced = None;

        for (i, packet) in packets.iter().enumerate() {
            match self.decoder.decode(packet)? {
                DecodeOutcome::Pending => {}
                DecodeOutcome::Event(_) if i + 1 < packets.len() => {
                    return Err(SubImageError::UnexpectedEarlyEvent);
                }
                DecodeOutcome::Event(event) => produced = Some(event),
            }
        }

        produced.ok_or(SubImageError::NoEventProduced)
    }

    /// The output frame count: the host-provided total in per-frame mode,
    /// or the interval count in flatten mode.
    pub fn frame_count(&self) -> i64 {
        if self.flatten {
            self.timeline.len() as i64
        } else {
            self.total_frames
        }
    }

    /// Canvas width in pixels (the selected stream's coded width).
    pub fn width(&self) -> usize {
        self.blank.width()
    }

    /// Canvas height in pixels (the selected stream's coded height).
    pub fn height(&self) -> usize {
        self.blank.height()
    }

    /// The selected stream.
    pub fn stream(&self) -> &StreamInfo {
        &self.stream
    }

    /// The constructed timeline.
    pub fn timeline(&self) -> &SubtitleTimeline {
        &self.timeline
    }

    /// The stream-listing text attached to rendered frames, when the
    /// `info` option was set.
    pub fn stream_description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
