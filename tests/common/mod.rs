//! Shared test doubles: a scriptable decoder and source builders.
//!
//! The decoder resolves each packet to a scripted outcome keyed by the
//! packet's pts, so replaying an interval reproduces the timeline-pass
//! behaviour. The script table is shared through an `Arc`, which lets a
//! test rewrite outcomes *after* construction to exercise render-time
//! failure paths.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use subimage::{
    DecodeError, DecodeOutcome, DecoderLogLevel, DecoderOpener, DecoderSetupError, MemorySource,
    PALETTE_COUNT, Packet, Rational, RectKind, SeekProfile, StreamCodec, StreamInfo,
    SubtitleDecoder, SubtitleEvent, SubtitleRect,
};

/// Scripted outcome for one packet.
#[derive(Clone)]
pub enum Script {
    /// Packet consumed, no event yet.
    Pending,
    /// Decode error with the given diagnostic.
    Fail(String),
    /// A materialised event.
    Event(SubtitleEvent),
}

/// Script table shared between the test and the opened decoder.
#[derive(Clone, Default)]
pub struct SharedScript {
    outcomes: Arc<Mutex<HashMap<i64, Script>>>,
}

impl SharedScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) the outcome for packets with this pts.
    pub fn set(&self, pts: i64, script: Script) {
        self.outcomes.lock().unwrap().insert(pts, script);
    }

    fn get(&self, pts: i64) -> Script {
        self.outcomes
            .lock()
            .unwrap()
            .get(&pts)
            .unwrap_or_else(|| panic!("no scripted outcome for pts {pts}"))
            .clone()
    }
}

/// Log of every pts fed to the decoder, shared with the test.
pub type DecodeLog = Arc<Mutex<Vec<i64>>>;

/// A [`SubtitleDecoder`] driven entirely by a [`SharedScript`].
pub struct ScriptedDecoder {
    script: SharedScript,
    seek: SeekProfile,
    log: DecodeLog,
}

impl SubtitleDecoder for ScriptedDecoder {
    fn decode(&mut self, packet: &Packet) -> Result<DecodeOutcome, DecodeError> {
        self.log.lock().unwrap().push(packet.pts);
        match self.script.get(packet.pts) {
            Script::Pending => Ok(DecodeOutcome::Pending),
            Script::Fail(reason) => Err(DecodeError(reason)),
            Script::Event(event) => Ok(DecodeOutcome::Event(event)),
        }
    }

    fn seek_profile(&self) -> SeekProfile {
        self.seek
    }
}

/// Opens [`ScriptedDecoder`]s, or fails on demand.
pub struct ScriptedOpener {
    pub script: SharedScript,
    pub seek: SeekProfile,
    pub log: DecodeLog,
    pub fail_with: Option<DecoderSetupError>,
}

impl ScriptedOpener {
    pub fn new(script: SharedScript, seek: SeekProfile) -> Self {
        Self {
            script,
            seek,
            log: DecodeLog::default(),
            fail_with: None,
        }
    }

    pub fn seek_safe(script: SharedScript) -> Self {
        Self::new(script, SeekProfile::SeekSafe)
    }

    pub fn forward_only(script: SharedScript, lookback: usize) -> Self {
        Self::new(script, SeekProfile::ForwardOnly { lookback })
    }
}

impl DecoderOpener for ScriptedOpener {
    fn open(
        &self,
        _stream: &StreamInfo,
        _verbosity: DecoderLogLevel,
    ) -> Result<Box<dyn SubtitleDecoder>, DecoderSetupError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        Ok(Box::new(ScriptedDecoder {
            script: self.script.clone(),
            seek: self.seek,
            log: Arc::clone(&self.log),
        }))
    }
}

/// Count how many times `pts` appears in the decode log.
pub fn decode_count(log: &DecodeLog, pts: i64) -> usize {
    log.lock().unwrap().iter().filter(|&&p| p == pts).count()
}

// ── Stream / source builders ─────────────────────────────────────────

pub const CANVAS_WIDTH: u32 = 64;
pub const CANVAS_HEIGHT: u32 = 32;

/// Millisecond time base.
pub fn time_base_ms() -> Rational {
    Rational::new(1, 1000)
}

/// 30 fps output rate.
pub fn fps_30() -> Rational {
    Rational::new(30, 1)
}

pub fn stream(index: usize, id: i32, codec: StreamCodec) -> StreamInfo {
    StreamInfo {
        index,
        id,
        codec,
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        time_base: time_base_ms(),
        language: None,
    }
}

/// A single-stream PGS source over the given packets.
pub fn sup_source(packets: Vec<Packet>) -> MemorySource {
    MemorySource::new(
        "sup",
        vec![stream(0, 0x1200, StreamCodec::HdmvPgs)],
        packets,
    )
}

/// A single-stream DVD source over the given packets.
pub fn vobsub_source(packets: Vec<Packet>) -> MemorySource {
    MemorySource::new(
        "vobsub",
        vec![stream(0, 0x20, StreamCodec::DvdSubtitle)],
        packets,
    )
}

/// A packet on stream 0 with empty payload (the scripted decoder only
/// looks at the pts).
pub fn packet(pts: i64) -> Packet {
    Packet::new(0, pts, Vec::new())
}

// ── Event / rect builders ────────────────────────────────────────────

/// A palette with the given slots set and every other slot zero.
pub fn palette(entries: &[(usize, u32)]) -> [u32; PALETTE_COUNT] {
    let mut palette = [0u32; PALETTE_COUNT];
    for &(slot, color) in entries {
        palette[slot] = color;
    }
    palette
}

/// A bitmap rect with stride equal to width.
pub fn rect(
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    palette: [u32; PALETTE_COUNT],
    data: Vec<u8>,
) -> SubtitleRect {
    SubtitleRect {
        kind: RectKind::Bitmap,
        x,
        y,
        width,
        height,
        stride: width as usize,
        palette,
        data,
    }
}

/// A 2x2 rect at the origin whose four pixels all use palette slot 1,
/// which maps to `color`.
pub fn solid_rect(color: u32) -> SubtitleRect {
    rect(0, 0, 2, 2, palette(&[(1, color)]), vec![1, 1, 1, 1])
}

/// An event carrying the given rects and no display offsets.
pub fn event(rects: Vec<SubtitleRect>) -> SubtitleEvent {
    SubtitleEvent {
        start_display: 0,
        end_display: 0,
        rects,
    }
}

/// A DVD event with explicit display offsets.
pub fn dvd_event(start_display: i64, end_display: i64, rects: Vec<SubtitleRect>) -> SubtitleEvent {
    SubtitleEvent {
        start_display,
        end_display,
        rects,
    }
}

/// A zero-rect terminator event.
pub fn terminator() -> SubtitleEvent {
    event(Vec::new())
}
