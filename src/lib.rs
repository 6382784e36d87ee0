//! # subimage
//!
//! Render DVD (VobSub) and Blu-ray (PGS) bitmap subtitle streams into a
//! deterministic per-video-frame image sequence: for any requested output
//! frame index, `subimage` knows which subtitle (if any) is visible and
//! composites its paletted bitmap onto a fixed-size canvas with separate
//! planar RGB and alpha planes.
//!
//! The crate owns the hard parts — mapping decoder timestamps onto the
//! output frame grid with exact rational arithmetic, grouping decoded
//! events into display intervals and repairing missing end times, answering
//! random-access frame queries against a decoder that is only reliable
//! reading forward, and the palette-to-plane compositing itself. Demuxing
//! and bitstream decoding stay outside: callers plug in a [`PacketSource`]
//! and a [`DecoderOpener`] (an FFmpeg binding, a bespoke `.sup` parser, a
//! test fixture — anything honouring the contracts).
//!
//! ## Quick start
//!
//! ```no_run
//! use subimage::{RenderOptions, Rational, SubtitleRenderer};
//! # fn open_source() -> subimage::MemorySource { unimplemented!() }
//! # struct MyOpener;
//! # impl subimage::DecoderOpener for MyOpener {
//! #     fn open(
//! #         &self,
//! #         _stream: &subimage::StreamInfo,
//! #         _verbosity: subimage::DecoderLogLevel,
//! #     ) -> Result<Box<dyn subimage::SubtitleDecoder>, subimage::DecoderSetupError> {
//! #         unimplemented!()
//! #     }
//! # }
//!
//! // Map the subtitles onto a 30 fps, 54 000-frame output timeline.
//! let mut renderer = SubtitleRenderer::open(
//!     open_source(),
//!     &MyOpener,
//!     Rational::new(30, 1),
//!     54_000,
//!     RenderOptions::new().with_info(true),
//! )
//! .unwrap();
//!
//! let frame = renderer.render(1234).unwrap();
//! println!(
//!     "{}x{}, alpha at (0,0) = {}",
//!     frame.width(),
//!     frame.height(),
//!     frame.alpha().get(0, 0),
//! );
//! frame.to_rgba_image().save("frame_1234.png").unwrap();
//! ```
//!
//! ## Features
//!
//! - **Random access** — request frames in any order; a single-slot cache
//!   makes immediately repeated requests free, and forward-only decoders
//!   are transparently primed with preceding intervals
//! - **Exact timing** — timestamps map to frame indices through reduced
//!   integer fractions, never floats
//! - **End-time repair** — intervals with no stated end run until the next
//!   subtitle (or the end of the video)
//! - **Palette control** — per-slot color overrides and a grayscale mode
//! - **Flatten mode** — one output frame per subtitle instead of one per
//!   video frame, for subtitle browsing and OCR pipelines
//! - **Stream info** — a per-frame textual listing of the container's
//!   supported subtitle streams
//!
//! ## Concurrency
//!
//! A renderer is single-threaded: [`render`](SubtitleRenderer::render)
//! takes `&mut self` and one frame completes before the next starts. For
//! parallel rendering, open several independent renderers — instances share
//! nothing.

mod compositor;

pub mod decoder;
pub mod error;
pub mod frame;
pub mod options;
pub mod palette;
pub mod rational;
pub mod renderer;
pub mod source;
pub mod stream;
pub mod timeline;
pub mod timestamp;

pub use decoder::{
    DecodeError, DecodeOutcome, DecoderLogLevel, DecoderOpener, DecoderSetupError, PALETTE_COUNT,
    RectKind, SeekProfile, SubtitleDecoder, SubtitleEvent, SubtitleRect,
};
pub use error::SubImageError;
pub use frame::{PlaneBuf, RenderedFrame};
pub use options::RenderOptions;
pub use palette::PaletteOverride;
pub use rational::Rational;
pub use renderer::SubtitleRenderer;
pub use source::{MemorySource, Packet, PacketSource};
pub use stream::{StreamCodec, StreamInfo};
pub use timeline::{Interval, SubtitleTimeline};
pub use timestamp::frame_index_for;
