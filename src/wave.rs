//! Wave / difficulty controller.
//!
//! Decides how many targets a level gets and how fast they may move, and
//! when a level or the whole game is complete.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::{GameConfig, TargetMotion};
use crate::entities::{Difficulty, Target, TargetKind};
use crate::geometry::Rect;

/// Target count and speed cap for one level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
    pub count: u32,
    /// Speeds are drawn from `(0, speed_cap]`.
    pub speed_cap: f32,
}

/// Scaling applied at `level`: `1 + (level - 1) * 0.5`.
pub fn level_multiplier(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * 0.5
}

pub fn compute_wave(difficulty: &Difficulty, level: u32) -> Wave {
    let m = level_multiplier(level);
    Wave {
        count: (difficulty.count as f32 * m).floor() as u32,
        speed_cap: difficulty.speed_cap * m,
    }
}

pub fn is_level_complete(targets: &[Target]) -> bool {
    targets.is_empty()
}

pub fn is_game_complete(level: u32, max_level: u32, targets: &[Target]) -> bool {
    level == max_level && is_level_complete(targets)
}

/// Uniform draw from the half-open-on-the-left range `(0, cap]`.
fn draw_speed(cap: f32, rng: &mut impl Rng) -> f32 {
    cap - rng.gen_range(0.0..cap)
}

/// Random top-left position for a new target. Falling targets start in the
/// upper half so they have room to descend.
pub fn random_target_rect(config: &GameConfig, rng: &mut impl Rng) -> Rect {
    let (w, h) = (config.target_width, config.target_height);
    let max_x = config.arena_width as f32 - w;
    let max_y = match config.target_motion {
        TargetMotion::Fall => config.arena_height as f32 / 2.0 - h,
        TargetMotion::Wander => config.arena_height as f32 - h,
    };
    Rect::new(
        rng.gen_range(0.0..=max_x.max(0.0)),
        rng.gen_range(0.0..=max_y.max(0.0)),
        w,
        h,
    )
}

/// Build one target with a fresh position, speed and kind.
pub fn spawn_target(config: &GameConfig, speed_cap: f32, rng: &mut impl Rng) -> Target {
    let rect = random_target_rect(config, rng);
    let speed = draw_speed(speed_cap, rng);
    let (vx, vy) = match config.target_motion {
        TargetMotion::Fall => (0.0, speed),
        TargetMotion::Wander => {
            let heading = rng.gen_range(0.0..TAU);
            (speed * heading.cos(), speed * heading.sin())
        }
    };
    let kind = TargetKind::ALL[rng.gen_range(0..TargetKind::ALL.len())];
    Target { rect, vx, vy, kind }
}

/// Generate the full target set for `level`.
pub fn spawn_wave(
    config: &GameConfig,
    difficulty: &Difficulty,
    level: u32,
    rng: &mut impl Rng,
) -> Vec<Target> {
    let wave = compute_wave(difficulty, level);
    log::debug!(
        "Spawning level {} wave: {} targets, speed cap {:.2}",
        level,
        wave.count,
        wave.speed_cap
    );
    (0..wave.count)
        .map(|_| spawn_target(config, wave.speed_cap, rng))
        .collect()
}
