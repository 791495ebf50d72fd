//! Render / audio facade
//!
//! The engine describes each frame as a flat draw-list in arena coordinates
//! and raises sound cues by name; sinks decide how (or whether) to show and
//! play them.

use crate::entities::{Cue, TargetKind};
use crate::geometry::{Point, Rect};

/// A labelled clickable region of a modal overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    pub label: String,
    pub rect: Rect,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub level: u32,
    pub max_level: u32,
    pub difficulty: String,
    /// `None` when the game has no time limit.
    pub time_left_ms: Option<u64>,
    pub escaped: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    Menu { buttons: Vec<Button> },
    DifficultySelect { buttons: Vec<Button> },
    Paused,
    GameOver { score: u32, level: u32, won: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Background,
    Obstacle(Rect),
    Target { rect: Rect, kind: TargetKind },
    Projectile(Point),
    Avatar(Rect),
    Hud(Hud),
    Overlay(Overlay),
}

/// Everything needed to draw one frame, back to front.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub arena: Rect,
    pub commands: Vec<DrawCmd>,
}

impl Frame {
    pub fn overlay(&self) -> Option<&Overlay> {
        self.commands.iter().find_map(|c| match c {
            DrawCmd::Overlay(o) => Some(o),
            _ => None,
        })
    }

    pub fn hud(&self) -> Option<&Hud> {
        self.commands.iter().find_map(|c| match c {
            DrawCmd::Hud(h) => Some(h),
            _ => None,
        })
    }
}

pub trait RenderSink {
    fn present(&mut self, frame: &Frame) -> std::io::Result<()>;
}

/// Fire-and-forget sound playback.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Discards every cue.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}
}

/// Records cues in order; handy for replays and tests.
impl AudioSink for Vec<Cue> {
    fn play(&mut self, cue: Cue) {
        self.push(cue);
    }
}
