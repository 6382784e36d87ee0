//! Renderer configuration.
//!
//! [`RenderOptions`] collects the optional construction-time settings for a
//! [`SubtitleRenderer`](crate::SubtitleRenderer). All fields have defaults —
//! a default-constructed value selects the first supported stream, applies
//! no palette overrides, and renders one output frame per video frame.
//!
//! # Example
//!
//! ```
//! use subimage::{PaletteOverride, RenderOptions};
//!
//! let options = RenderOptions::new()
//!     .with_stream_id(0x20)
//!     .with_palette(PaletteOverride::new(vec![Some(0xFF11_2233)]).unwrap())
//!     .with_grayscale(true)
//!     .with_info(true);
//! ```

use crate::decoder::DecoderLogLevel;
use crate::palette::PaletteOverride;

/// Construction-time configuration for a
/// [`SubtitleRenderer`](crate::SubtitleRenderer).
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Explicit container stream id. `None` auto-selects the first stream
    /// with a supported codec.
    pub(crate) stream_id: Option<i32>,
    /// Palette slots to replace before compositing.
    pub(crate) palette: PaletteOverride,
    /// Desaturate the working palette after overrides.
    pub(crate) grayscale: bool,
    /// Attach the stream-listing description to every rendered frame.
    pub(crate) info: bool,
    /// One output frame per interval instead of one per video frame.
    pub(crate) flatten: bool,
    /// Verbosity handed to [`DecoderOpener::open`](crate::DecoderOpener::open).
    pub(crate) decoder_log_level: DecoderLogLevel,
}

impl RenderOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a stream by its container id instead of auto-selection.
    #[must_use]
    pub fn with_stream_id(mut self, id: i32) -> Self {
        self.stream_id = Some(id);
        self
    }

    /// Replace palette slots before compositing.
    #[must_use]
    pub fn with_palette(mut self, palette: PaletteOverride) -> Self {
        self.palette = palette;
        self
    }

    /// Render desaturated pictures: every palette color is replaced by the
    /// unweighted average of its three channels, alpha untouched.
    #[must_use]
    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// Attach a textual listing of the source's supported subtitle streams
    /// to every rendered frame.
    #[must_use]
    pub fn with_info(mut self, info: bool) -> Self {
        self.info = info;
        self
    }

    /// Redefine the output timeline to one frame per subtitle interval.
    /// [`frame_count`](crate::SubtitleRenderer::frame_count) then reports
    /// the interval count.
    #[must_use]
    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    /// Set the verbosity passed to the decoder opener. Defaults to
    /// [`DecoderLogLevel::Panic`].
    #[must_use]
    pub fn with_decoder_log_level(mut self, level: DecoderLogLevel) -> Self {
        self.decoder_log_level = level;
        self
    }
}
