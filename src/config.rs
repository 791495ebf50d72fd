//! Game configuration
//!
//! Every field has a default, so a JSON file only needs to name the values it
//! overrides. `validate` must pass before an `Engine` is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::Difficulty;
use crate::error::GameError;
use crate::geometry::Rect;

/// How targets move each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetMotion {
    /// Straight down at constant speed; despawn past the bottom edge.
    #[default]
    Fall,
    /// Random heading, bouncing off the arena edges.
    Wander,
}

/// What a fire command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FireMode {
    /// Spawn a projectile from the avatar toward the aim point.
    #[default]
    Projectile,
    /// Hit-test the aim point immediately, no projectile.
    DirectHit,
}

/// What happens to a target that is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    #[default]
    Remove,
    /// Relocate to a fresh random position; the wave never empties.
    Respawn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena_width: u32,
    pub arena_height: u32,
    /// Ordered difficulty table, shown in this order on the selection screen.
    pub difficulties: Vec<Difficulty>,
    /// `None` ends the game by waves only.
    pub time_limit_ms: Option<u64>,
    pub max_level: u32,
    pub frame_delay_ms: u64,
    pub target_motion: TargetMotion,
    pub fire_mode: FireMode,
    pub hit_policy: HitPolicy,
    pub select_difficulty: bool,
    /// Auto-restart after showing the game-over screen this long.
    pub game_over_delay_ms: Option<u64>,

    pub avatar_width: f32,
    pub avatar_height: f32,
    /// Distance from the avatar's top edge to the arena bottom.
    pub avatar_offset: f32,
    pub avatar_step: f32,

    pub target_width: f32,
    pub target_height: f32,

    pub projectile_speed: f32,
    pub projectile_radius: f32,

    pub obstacle_count: usize,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub obstacle_step: f32,
    /// Obstacles oscillate between `obstacle_margin` and `arena_width - obstacle_margin`.
    pub obstacle_margin: f32,
    /// Obstacles oscillate; `false` leaves them where they were placed.
    pub obstacles_move: bool,
    /// Projectiles touching an obstacle are absorbed.
    pub obstacles_block: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: 800,
            arena_height: 600,
            difficulties: vec![
                Difficulty::new("Easy", 1.0, 10),
                Difficulty::new("Medium", 2.0, 15),
                Difficulty::new("Hard", 3.0, 20),
            ],
            time_limit_ms: None,
            max_level: 3,
            frame_delay_ms: 30,
            target_motion: TargetMotion::Fall,
            fire_mode: FireMode::Projectile,
            hit_policy: HitPolicy::Remove,
            select_difficulty: true,
            game_over_delay_ms: None,

            avatar_width: 50.0,
            avatar_height: 50.0,
            avatar_offset: 60.0,
            avatar_step: 10.0,

            target_width: 50.0,
            target_height: 50.0,

            projectile_speed: 10.0,
            projectile_radius: 5.0,

            obstacle_count: 5,
            obstacle_width: 50.0,
            obstacle_height: 20.0,
            obstacle_step: 3.0,
            obstacle_margin: 50.0,
            obstacles_move: true,
            obstacles_block: false,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let io_err = |source: Box<dyn std::error::Error + Send + Sync>| GameError::ConfigIo {
            path: path.display().to_string(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(|e| io_err(Box::new(e)))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| io_err(Box::new(e)))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject configurations that cannot produce a playable game.
    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |msg: String| Err(GameError::InvalidConfiguration(msg));

        if self.arena_width == 0 || self.arena_height == 0 {
            return invalid(format!(
                "arena must be non-empty, got {}x{}",
                self.arena_width, self.arena_height
            ));
        }
        if self.difficulties.is_empty() {
            return invalid("difficulty table is empty".to_string());
        }
        for d in &self.difficulties {
            if !(d.speed_cap > 0.0) || d.count == 0 {
                return invalid(format!(
                    "difficulty '{}' needs a positive speed cap and count",
                    d.name
                ));
            }
        }
        if self.max_level == 0 {
            return invalid("max_level must be at least 1".to_string());
        }
        if self.frame_delay_ms == 0 {
            return invalid("frame_delay_ms must be positive".to_string());
        }
        // Respawned targets keep the wave from ever emptying.
        if self.hit_policy == HitPolicy::Respawn && self.time_limit_ms.is_none() {
            return invalid("respawn hit policy needs a time limit".to_string());
        }

        let sizes = [
            ("avatar_width", self.avatar_width),
            ("avatar_height", self.avatar_height),
            ("avatar_step", self.avatar_step),
            ("target_width", self.target_width),
            ("target_height", self.target_height),
            ("projectile_speed", self.projectile_speed),
            ("projectile_radius", self.projectile_radius),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
            ("obstacle_step", self.obstacle_step),
        ];
        if let Some((name, value)) = sizes.iter().find(|(_, v)| !(*v > 0.0)) {
            return invalid(format!("{} must be positive, got {}", name, value));
        }

        let (w, h) = (self.arena_width as f32, self.arena_height as f32);
        if self.avatar_width > w || self.avatar_offset > h {
            return invalid("avatar does not fit in the arena".to_string());
        }
        // Falling targets spawn in the upper half.
        if self.target_width > w || self.target_height * 2.0 > h {
            return invalid("targets do not fit in the arena".to_string());
        }
        if self.obstacle_count > 0 && self.obstacle_width + self.obstacle_margin * 2.0 > w {
            return invalid("obstacles do not fit between their margins".to_string());
        }
        Ok(())
    }

    pub fn arena(&self) -> Rect {
        Rect::new(0.0, 0.0, self.arena_width as f32, self.arena_height as f32)
    }

    /// Index of the difficulty called `name`, ignoring case.
    pub fn difficulty_index(&self, name: &str) -> Option<usize> {
        self.difficulties
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name))
    }
}
