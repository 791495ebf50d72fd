//! All game entity types: pure data, no per-frame logic.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

// ── Difficulty ────────────────────────────────────────────────────────────────

/// One row of the difficulty table: the level-1 speed cap and target count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub name: String,
    pub speed_cap: f32,
    pub count: u32,
}

impl Difficulty {
    pub fn new(name: &str, speed_cap: f32, count: u32) -> Self {
        Self {
            name: name.to_string(),
            speed_cap,
            count,
        }
    }
}

// ── Targets ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Zombie1,
    Zombie2,
    Zombie3,
}

impl TargetKind {
    pub const ALL: [TargetKind; 3] = [TargetKind::Zombie1, TargetKind::Zombie2, TargetKind::Zombie3];

    /// Asset key of the sprite drawn for this kind.
    pub fn sprite_key(self) -> &'static str {
        match self {
            TargetKind::Zombie1 => "zombie1",
            TargetKind::Zombie2 => "zombie2",
            TargetKind::Zombie3 => "zombie3",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub rect: Rect,
    /// Horizontal velocity in pixels per tick.
    pub vx: f32,
    /// Vertical velocity in pixels per tick (positive = downward).
    pub vy: f32,
    pub kind: TargetKind,
}

impl Target {
    /// Distance covered in one tick.
    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Point,
    /// Heading in radians, `atan2(dy, dx)` in screen coordinates.
    pub angle: f32,
    /// Pixels per tick.
    pub speed: f32,
    pub radius: f32,
}

impl Projectile {
    pub fn hitbox(&self) -> Rect {
        Rect::around(self.pos, self.radius)
    }

    /// True once the centre has left the arena on any side.
    pub fn is_out_of(&self, arena: &Rect) -> bool {
        self.pos.x < arena.x
            || self.pos.x > arena.right()
            || self.pos.y < arena.y
            || self.pos.y > arena.bottom()
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    /// -1, 0 (static) or +1.
    pub direction: f32,
    pub lower: f32,
    pub upper: f32,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Avatar {
    pub rect: Rect,
}

impl Avatar {
    /// Where projectiles leave the barrel.
    pub fn muzzle(&self) -> Point {
        Point::new(self.rect.x + self.rect.w / 2.0, self.rect.y)
    }
}

// ── Sound cues ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Gunshot,
    Hit,
    LevelUp,
    GameOver,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Gunshot, Cue::Hit, Cue::LevelUp, Cue::GameOver];

    pub fn name(self) -> &'static str {
        match self {
            Cue::Gunshot => "gunshot",
            Cue::Hit => "hit",
            Cue::LevelUp => "level_up",
            Cue::GameOver => "game_over",
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// Final level cleared.
    Won,
    /// Time limit expired.
    TimeUp,
}

/// Everything that makes up one game from start to game over.
/// Cloneable so pure update functions can return a new copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub avatar: Avatar,
    /// Live targets in insertion order.
    pub targets: Vec<Target>,
    /// Live projectiles in insertion order.
    pub projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub level: u32,
    /// Falling targets that left through the bottom edge unhit.
    pub escaped: u32,
    /// Simulated time since the session started.
    pub elapsed_ms: u64,
    pub ticks: u64,
    pub difficulty: Difficulty,
    pub status: SessionStatus,
    /// Sound cues raised since the engine last drained them.
    pub cues: Vec<Cue>,
}
