//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `Session` (and, where needed, an RNG handle) and returns a brand-new
//! `Session` or entity.  Side effects are limited to the injected RNG.

use std::f32::consts::FRAC_PI_2;

use rand::Rng;

use crate::config::{FireMode, GameConfig, HitPolicy, TargetMotion};
use crate::entities::{
    Avatar, Cue, Difficulty, Obstacle, Projectile, Session, SessionStatus, Target,
};
use crate::geometry::{contains, intersects, Point, Rect};
use crate::wave::{is_game_complete, is_level_complete, random_target_rect, spawn_wave};

// ── Constructors ─────────────────────────────────────────────────────────────

fn place_obstacles(config: &GameConfig, rng: &mut impl Rng) -> Vec<Obstacle> {
    let w = config.arena_width as f32;
    let h = config.arena_height as f32;
    let lower = config.obstacle_margin;
    let upper = (w - config.obstacle_margin).min(w - config.obstacle_width);
    let top = h / 6.0;
    let bottom = (h - h / 3.0).max(top);

    (0..config.obstacle_count)
        .map(|_| Obstacle {
            rect: Rect::new(
                rng.gen_range(lower..=upper.max(lower)),
                rng.gen_range(top..=bottom),
                config.obstacle_width,
                config.obstacle_height,
            ),
            direction: if config.obstacles_move { 1.0 } else { 0.0 },
            lower,
            upper,
        })
        .collect()
}

/// Build a fresh level-1 session for `difficulty`.
pub fn init_session(config: &GameConfig, difficulty: &Difficulty, rng: &mut impl Rng) -> Session {
    let w = config.arena_width as f32;
    let h = config.arena_height as f32;
    Session {
        avatar: Avatar {
            rect: Rect::new(
                (w - config.avatar_width) / 2.0,
                h - config.avatar_offset,
                config.avatar_width,
                config.avatar_height,
            ),
        },
        targets: spawn_wave(config, difficulty, 1, rng),
        projectiles: Vec::new(),
        obstacles: place_obstacles(config, rng),
        score: 0,
        level: 1,
        escaped: 0,
        elapsed_ms: 0,
        ticks: 0,
        difficulty: difficulty.clone(),
        status: SessionStatus::Running,
        cues: Vec::new(),
    }
}

// ── Entity update rules ──────────────────────────────────────────────────────

/// Move a target by one step of `dt` ticks.
///
/// Wandering targets are not pushed back inside the arena: when the box
/// crosses an edge the matching velocity component is turned to point back
/// in, so the box can overshoot by at most one step's travel.
pub fn advance_target(target: &Target, dt: f32, arena: &Rect, motion: TargetMotion) -> Target {
    let mut next = target.clone();
    next.rect.x += target.vx * dt;
    next.rect.y += target.vy * dt;

    if motion == TargetMotion::Wander {
        if (next.rect.x < arena.x && next.vx < 0.0)
            || (next.rect.right() > arena.right() && next.vx > 0.0)
        {
            next.vx = -next.vx;
        }
        if (next.rect.y < arena.y && next.vy < 0.0)
            || (next.rect.bottom() > arena.bottom() && next.vy > 0.0)
        {
            next.vy = -next.vy;
        }
    }
    next
}

/// Put a falling target that left through the bottom back just above the
/// top edge, keeping its column and speed.
pub fn wrap_to_top(target: &Target, arena: &Rect) -> Target {
    let mut next = target.clone();
    next.rect.y = arena.y - next.rect.h;
    next
}

pub fn advance_projectile(projectile: &Projectile, dt: f32) -> Projectile {
    let step = projectile.speed * dt;
    Projectile {
        pos: Point::new(
            projectile.pos.x + step * projectile.angle.cos(),
            projectile.pos.y + step * projectile.angle.sin(),
        ),
        ..projectile.clone()
    }
}

/// Slide a moving obstacle by `step`, turning around at its bounds.
pub fn advance_obstacle(obstacle: &Obstacle, step: f32) -> Obstacle {
    let mut next = obstacle.clone();
    next.rect.x += next.direction * step;
    if next.direction != 0.0 {
        if next.rect.x <= next.lower {
            next.direction = 1.0;
        } else if next.rect.x >= next.upper {
            next.direction = -1.0;
        }
    }
    next
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

fn move_avatar(state: &Session, config: &GameConfig, dx: f32) -> Session {
    let max_x = config.arena_width as f32 - state.avatar.rect.w;
    let mut rect = state.avatar.rect;
    rect.x = (rect.x + dx).clamp(0.0, max_x);
    Session {
        avatar: Avatar { rect },
        ..state.clone()
    }
}

pub fn move_avatar_left(state: &Session, config: &GameConfig) -> Session {
    move_avatar(state, config, -config.avatar_step)
}

pub fn move_avatar_right(state: &Session, config: &GameConfig) -> Session {
    move_avatar(state, config, config.avatar_step)
}

/// Fire at `aim`, or straight up when no aim point is given.
pub fn fire(state: &Session, config: &GameConfig, aim: Option<Point>, rng: &mut impl Rng) -> Session {
    let mut next = state.clone();
    next.cues.push(Cue::Gunshot);
    let muzzle = state.avatar.muzzle();

    match config.fire_mode {
        FireMode::Projectile => {
            let angle = match aim {
                Some(p) => (p.y - muzzle.y).atan2(p.x - muzzle.x),
                None => -FRAC_PI_2,
            };
            next.projectiles.push(Projectile {
                pos: muzzle,
                angle,
                speed: config.projectile_speed,
                radius: config.projectile_radius,
            });
        }
        FireMode::DirectHit => {
            let hit = match aim {
                Some(p) => next.targets.iter().position(|t| contains(&t.rect, p)),
                None => {
                    let column = Rect::new(muzzle.x, 0.0, 0.0, muzzle.y);
                    next.targets.iter().position(|t| intersects(&t.rect, &column))
                }
            };
            if let Some(i) = hit {
                let mut flags = vec![false; next.targets.len()];
                flags[i] = true;
                next.targets = resolve_hits(&next.targets, &flags, config, rng);
                next.score += 1;
                next.cues.push(Cue::Hit);
            }
        }
    }
    next
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Result of matching projectiles against targets for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Collisions {
    /// `true` for each target (by index) hit this tick.
    pub hit_targets: Vec<bool>,
    /// Projectiles that neither hit a target nor were absorbed.
    pub survivors: Vec<Projectile>,
    pub hits: u32,
}

/// Match each projectile against the targets in insertion order. The first
/// live target it touches is consumed together with the projectile; a target
/// already hit this tick cannot absorb a second projectile.
pub fn collide(
    targets: &[Target],
    projectiles: &[Projectile],
    obstacles: &[Obstacle],
    obstacles_block: bool,
) -> Collisions {
    let mut hit_targets = vec![false; targets.len()];
    let mut survivors = Vec::with_capacity(projectiles.len());
    let mut hits = 0;

    for projectile in projectiles {
        let hitbox = projectile.hitbox();
        let struck = targets
            .iter()
            .enumerate()
            .position(|(i, t)| !hit_targets[i] && intersects(&t.rect, &hitbox));

        match struck {
            Some(i) => {
                hit_targets[i] = true;
                hits += 1;
            }
            None => {
                let blocked =
                    obstacles_block && obstacles.iter().any(|o| intersects(&o.rect, &hitbox));
                if !blocked {
                    survivors.push(projectile.clone());
                }
            }
        }
    }

    Collisions {
        hit_targets,
        survivors,
        hits,
    }
}

/// Next generation of targets after hits: removed, or relocated under
/// `HitPolicy::Respawn`.
pub fn resolve_hits(
    targets: &[Target],
    hit: &[bool],
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<Target> {
    targets
        .iter()
        .zip(hit)
        .filter_map(|(t, &was_hit)| match (was_hit, config.hit_policy) {
            (false, _) => Some(t.clone()),
            (true, HitPolicy::Remove) => None,
            (true, HitPolicy::Respawn) => Some(Target {
                rect: random_target_rect(config, rng),
                ..t.clone()
            }),
        })
        .collect()
}

// ── Per-frame tick (RNG injected) ──────────────────────────────────────

/// Advance the session by one frame.  A session that is no longer running
/// is returned unchanged.
pub fn tick(state: &Session, config: &GameConfig, rng: &mut impl Rng) -> Session {
    if state.status != SessionStatus::Running {
        return state.clone();
    }
    let arena = config.arena();
    let mut cues = state.cues.clone();

    // ── 1. Move projectiles, drop the ones that left the arena ───────────────
    let projectiles: Vec<Projectile> = state
        .projectiles
        .iter()
        .map(|p| advance_projectile(p, 1.0))
        .filter(|p| !p.is_out_of(&arena))
        .collect();

    // ── 2. Move targets; falling targets past the bottom edge wrap to the top ─
    let mut escaped = state.escaped;
    let targets: Vec<Target> = state
        .targets
        .iter()
        .map(|t| advance_target(t, 1.0, &arena, config.target_motion))
        .map(|t| match config.target_motion {
            TargetMotion::Fall if t.rect.y > arena.bottom() => {
                escaped += 1;
                wrap_to_top(&t, &arena)
            }
            _ => t,
        })
        .collect();

    // ── 3. Collision: projectiles ↔ targets ──────────────────────────────────
    let collisions = collide(&targets, &projectiles, &state.obstacles, config.obstacles_block);
    let mut targets = resolve_hits(&targets, &collisions.hit_targets, config, rng);
    let projectiles = collisions.survivors;
    cues.extend(std::iter::repeat(Cue::Hit).take(collisions.hits as usize));
    let score = state.score + collisions.hits;

    // ── 4. Obstacles ─────────────────────────────────────────────────────────
    let obstacles: Vec<Obstacle> = state
        .obstacles
        .iter()
        .map(|o| advance_obstacle(o, config.obstacle_step))
        .collect();

    // ── 5. Level / game completion ───────────────────────────────────────────
    let mut level = state.level;
    let mut status = SessionStatus::Running;
    if is_game_complete(level, config.max_level, &targets) {
        log::info!("Final level {} cleared with score {}", level, score);
        status = SessionStatus::Won;
        cues.push(Cue::GameOver);
    } else if is_level_complete(&targets) && level < config.max_level {
        level += 1;
        log::info!("Level {} cleared, advancing to level {}", state.level, level);
        targets = spawn_wave(config, &state.difficulty, level, rng);
        cues.push(Cue::LevelUp);
    }

    // ── 6. Time limit ────────────────────────────────────────────────────────
    let elapsed_ms = state.elapsed_ms + config.frame_delay_ms;
    if status == SessionStatus::Running {
        if let Some(limit) = config.time_limit_ms {
            if elapsed_ms >= limit {
                log::info!("Time limit of {} ms reached with score {}", limit, score);
                status = SessionStatus::TimeUp;
                cues.push(Cue::GameOver);
            }
        }
    }

    Session {
        targets,
        projectiles,
        obstacles,
        score,
        level,
        escaped,
        elapsed_ms,
        ticks: state.ticks + 1,
        status,
        cues,
        ..state.clone()
    }
}
