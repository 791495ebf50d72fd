use std::f32::consts::{FRAC_PI_2, PI};

use shooting_gallery::compute::*;
use shooting_gallery::config::{FireMode, GameConfig, HitPolicy, TargetMotion};
use shooting_gallery::entities::*;
use shooting_gallery::geometry::{Point, Rect};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_config() -> GameConfig {
    GameConfig { obstacle_count: 0, ..GameConfig::default() }
}

fn make_state() -> Session {
    Session {
        avatar: Avatar { rect: Rect::new(375.0, 540.0, 50.0, 50.0) },
        targets: Vec::new(),
        projectiles: Vec::new(),
        obstacles: Vec::new(),
        score: 0,
        level: 1,
        escaped: 0,
        elapsed_ms: 0,
        ticks: 0,
        difficulty: Difficulty::new("Easy", 1.0, 10),
        status: SessionStatus::Running,
        cues: Vec::new(),
    }
}

fn target_at(x: f32, y: f32, kind: TargetKind) -> Target {
    Target { rect: Rect::new(x, y, 50.0, 50.0), vx: 0.0, vy: 0.0, kind }
}

/// A motionless target out of every projectile's way, so the wave never empties.
fn parked() -> Target {
    target_at(740.0, 0.0, TargetKind::Zombie3)
}

fn projectile(x: f32, y: f32, angle: f32) -> Projectile {
    Projectile { pos: Point::new(x, y), angle, speed: 10.0, radius: 5.0 }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── init_session ──────────────────────────────────────────────────────────────

#[test]
fn init_session_layout() {
    let config = GameConfig::default();
    let s = init_session(&config, &config.difficulties[0], &mut seeded_rng());
    assert_eq!(s.avatar.rect, Rect::new(375.0, 540.0, 50.0, 50.0));
    assert_eq!(s.targets.len(), 10);
    assert_eq!(s.obstacles.len(), 5);
    assert!(s.projectiles.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.level, 1);
    assert_eq!(s.status, SessionStatus::Running);
}

#[test]
fn init_session_obstacles_start_between_bounds() {
    let config = GameConfig::default();
    let s = init_session(&config, &config.difficulties[1], &mut seeded_rng());
    for o in &s.obstacles {
        assert!(o.rect.x >= o.lower && o.rect.x <= o.upper);
        assert!(o.rect.right() <= 800.0);
    }
}

#[test]
fn init_session_static_obstacles_stay_put() {
    let config = GameConfig { obstacles_move: false, ..GameConfig::default() };
    let mut rng = seeded_rng();
    let s = init_session(&config, &config.difficulties[0], &mut rng);
    assert!(s.obstacles.iter().all(|o| o.direction == 0.0));

    let s2 = tick(&s, &config, &mut rng);
    let xs: Vec<f32> = s.obstacles.iter().map(|o| o.rect.x).collect();
    let xs2: Vec<f32> = s2.obstacles.iter().map(|o| o.rect.x).collect();
    assert_eq!(xs, xs2);
}

#[test]
fn init_session_obstacles_move_by_default() {
    let config = GameConfig::default();
    let s = init_session(&config, &config.difficulties[0], &mut seeded_rng());
    assert!(s.obstacles.iter().all(|o| o.direction == 1.0));
}

// ── avatar movement ───────────────────────────────────────────────────────────

#[test]
fn move_left_from_centre() {
    let s = move_avatar_left(&make_state(), &make_config());
    assert_eq!(s.avatar.rect.x, 365.0);
}

#[test]
fn move_left_clamps_at_zero() {
    let config = make_config();
    let mut s = make_state();
    for _ in 0..50 {
        s = move_avatar_left(&s, &config);
    }
    assert_eq!(s.avatar.rect.x, 0.0);
}

#[test]
fn move_right_clamps_at_arena_edge() {
    let config = make_config();
    let mut s = make_state();
    s.avatar.rect.x = 745.0;
    let s = move_avatar_right(&s, &config);
    assert_eq!(s.avatar.rect.x, 750.0); // 800 - 50
}

#[test]
fn move_does_not_mutate_original() {
    let config = make_config();
    let s = make_state();
    let _ = move_avatar_left(&s, &config);
    let _ = move_avatar_right(&s, &config);
    assert_eq!(s.avatar.rect.x, 375.0);
}

// ── fire ──────────────────────────────────────────────────────────────────────

#[test]
fn fire_aims_projectile_at_pointer() {
    let s = fire(&make_state(), &make_config(), Some(Point::new(500.0, 540.0)), &mut seeded_rng());
    assert_eq!(s.projectiles.len(), 1);
    let p = &s.projectiles[0];
    assert_eq!(p.pos, Point::new(400.0, 540.0));
    assert!(p.angle.abs() < 1e-6); // due right
    assert_eq!(s.cues, vec![Cue::Gunshot]);
}

#[test]
fn fire_without_aim_goes_straight_up() {
    let s = fire(&make_state(), &make_config(), None, &mut seeded_rng());
    assert!((s.projectiles[0].angle + FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn fire_does_not_mutate_original() {
    let s = make_state();
    let _ = fire(&s, &make_config(), None, &mut seeded_rng());
    assert!(s.projectiles.is_empty());
    assert!(s.cues.is_empty());
}

#[test]
fn direct_hit_removes_first_target_under_pointer() {
    let config = GameConfig { fire_mode: FireMode::DirectHit, ..make_config() };
    let mut s = make_state();
    s.targets = vec![
        target_at(100.0, 100.0, TargetKind::Zombie1),
        target_at(120.0, 120.0, TargetKind::Zombie2),
    ];
    let s = fire(&s, &config, Some(Point::new(130.0, 130.0)), &mut seeded_rng());
    assert!(s.projectiles.is_empty());
    assert_eq!(s.score, 1);
    assert_eq!(s.targets.len(), 1);
    assert_eq!(s.targets[0].kind, TargetKind::Zombie2);
    assert_eq!(s.cues, vec![Cue::Gunshot, Cue::Hit]);
}

#[test]
fn direct_hit_miss_only_plays_gunshot() {
    let config = GameConfig { fire_mode: FireMode::DirectHit, ..make_config() };
    let mut s = make_state();
    s.targets = vec![target_at(100.0, 100.0, TargetKind::Zombie1)];
    let s = fire(&s, &config, Some(Point::new(500.0, 500.0)), &mut seeded_rng());
    assert_eq!(s.score, 0);
    assert_eq!(s.targets.len(), 1);
    assert_eq!(s.cues, vec![Cue::Gunshot]);
}

#[test]
fn direct_hit_without_aim_scans_column_above_avatar() {
    let config = GameConfig { fire_mode: FireMode::DirectHit, ..make_config() };
    let mut s = make_state();
    s.targets = vec![
        target_at(100.0, 100.0, TargetKind::Zombie1),
        target_at(380.0, 200.0, TargetKind::Zombie2),
    ];
    let s = fire(&s, &config, None, &mut seeded_rng());
    assert_eq!(s.score, 1);
    assert_eq!(s.targets[0].kind, TargetKind::Zombie1);
}

// ── entity update rules ───────────────────────────────────────────────────────

#[test]
fn projectile_advances_along_heading() {
    let p = advance_projectile(&projectile(100.0, 100.0, 0.0), 1.0);
    assert!((p.pos.x - 110.0).abs() < 1e-4);
    assert!((p.pos.y - 100.0).abs() < 1e-4);

    let p = advance_projectile(&projectile(100.0, 100.0, -FRAC_PI_2), 2.0);
    assert!((p.pos.x - 100.0).abs() < 1e-4);
    assert!((p.pos.y - 80.0).abs() < 1e-4);
}

#[test]
fn falling_target_moves_down_without_bounce() {
    let arena = Rect::new(0.0, 0.0, 800.0, 600.0);
    let mut t = target_at(100.0, 580.0, TargetKind::Zombie1);
    t.vy = 2.0;
    let t2 = advance_target(&t, 1.0, &arena, TargetMotion::Fall);
    assert_eq!(t2.rect.y, 582.0);
    assert_eq!(t2.vy, 2.0);
}

#[test]
fn wandering_target_flips_speed_at_left_edge() {
    let arena = Rect::new(0.0, 0.0, 800.0, 600.0);
    let mut t = target_at(1.0, 300.0, TargetKind::Zombie1);
    t.vx = -3.0;
    t.vy = 1.0;
    let t2 = advance_target(&t, 1.0, &arena, TargetMotion::Wander);
    // Overshoots by one step, then heads back in
    assert_eq!(t2.rect.x, -2.0);
    assert_eq!(t2.vx, 3.0);
    assert_eq!(t2.vy, 1.0);

    let t3 = advance_target(&t2, 1.0, &arena, TargetMotion::Wander);
    assert_eq!(t3.rect.x, 1.0);
    assert_eq!(t3.vx, 3.0);
}

#[test]
fn wandering_target_flips_speed_at_bottom_edge() {
    let arena = Rect::new(0.0, 0.0, 800.0, 600.0);
    let mut t = target_at(300.0, 549.0, TargetKind::Zombie1);
    t.vy = 2.0;
    let t2 = advance_target(&t, 1.0, &arena, TargetMotion::Wander);
    assert_eq!(t2.rect.y, 551.0);
    assert_eq!(t2.vy, -2.0);
}

#[test]
fn wandering_target_inside_keeps_heading() {
    let arena = Rect::new(0.0, 0.0, 800.0, 600.0);
    let mut t = target_at(300.0, 300.0, TargetKind::Zombie1);
    t.vx = -2.0;
    t.vy = -2.0;
    let t2 = advance_target(&t, 1.0, &arena, TargetMotion::Wander);
    assert_eq!((t2.vx, t2.vy), (-2.0, -2.0));
}

fn obstacle(x: f32, direction: f32) -> Obstacle {
    Obstacle { rect: Rect::new(x, 200.0, 50.0, 20.0), direction, lower: 50.0, upper: 750.0 }
}

#[test]
fn obstacle_turns_at_lower_bound() {
    let o = advance_obstacle(&obstacle(52.0, -1.0), 3.0);
    assert_eq!(o.rect.x, 49.0);
    assert_eq!(o.direction, 1.0);
    let o = advance_obstacle(&o, 3.0);
    assert_eq!(o.rect.x, 52.0);
}

#[test]
fn obstacle_turns_at_upper_bound() {
    let o = advance_obstacle(&obstacle(748.0, 1.0), 3.0);
    assert_eq!(o.rect.x, 751.0);
    assert_eq!(o.direction, -1.0);
}

#[test]
fn static_obstacle_stays_put() {
    let o = advance_obstacle(&obstacle(50.0, 0.0), 3.0);
    assert_eq!(o.rect.x, 50.0);
    assert_eq!(o.direction, 0.0);
}

// ── collide ───────────────────────────────────────────────────────────────────

#[test]
fn collide_first_target_in_insertion_order_wins() {
    let targets = vec![
        target_at(100.0, 100.0, TargetKind::Zombie1),
        target_at(110.0, 110.0, TargetKind::Zombie2),
    ];
    let c = collide(&targets, &[projectile(130.0, 130.0, 0.0)], &[], false);
    assert_eq!(c.hit_targets, vec![true, false]);
    assert_eq!(c.hits, 1);
    assert!(c.survivors.is_empty());
}

#[test]
fn collide_target_absorbs_only_one_projectile() {
    let targets = vec![target_at(100.0, 100.0, TargetKind::Zombie1)];
    let shots = [projectile(120.0, 120.0, 0.0), projectile(125.0, 125.0, 0.0)];
    let c = collide(&targets, &shots, &[], false);
    assert_eq!(c.hits, 1);
    assert_eq!(c.survivors.len(), 1);
    assert_eq!(c.survivors[0].pos, Point::new(125.0, 125.0));
}

#[test]
fn collide_obstacle_absorbs_when_blocking() {
    let o = obstacle(200.0, 0.0);
    let shot = [projectile(210.0, 210.0, 0.0)];
    assert_eq!(collide(&[], &shot, &[o.clone()], true).survivors.len(), 0);
    assert_eq!(collide(&[], &shot, &[o], false).survivors.len(), 1);
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_counts_frames_and_time() {
    let mut s = make_state();
    s.targets.push(parked());
    let s2 = tick(&s, &make_config(), &mut seeded_rng());
    assert_eq!(s2.ticks, 1);
    assert_eq!(s2.elapsed_ms, 30);
}

#[test]
fn tick_moves_projectile() {
    let mut s = make_state();
    s.targets.push(parked());
    s.projectiles.push(projectile(400.0, 500.0, -FRAC_PI_2));
    let s2 = tick(&s, &make_config(), &mut seeded_rng());
    assert_eq!(s2.projectiles.len(), 1);
    assert!((s2.projectiles[0].pos.y - 490.0).abs() < 1e-4);
}

#[test]
fn tick_drops_projectile_leaving_arena() {
    let mut s = make_state();
    s.targets.push(parked());
    s.projectiles.push(projectile(5.0, 300.0, PI));
    let s2 = tick(&s, &make_config(), &mut seeded_rng());
    assert!(s2.projectiles.is_empty());
}

#[test]
fn tick_projectile_hits_target() {
    // Projectiles move before collision: 140 → 130, inside the box.
    let mut s = make_state();
    s.targets = vec![target_at(100.0, 100.0, TargetKind::Zombie1), parked()];
    s.projectiles.push(projectile(125.0, 140.0, -FRAC_PI_2));
    let s2 = tick(&s, &make_config(), &mut seeded_rng());
    assert_eq!(s2.score, 1);
    assert!(s2.projectiles.is_empty());
    assert_eq!(s2.targets.len(), 1);
    assert_eq!(s2.targets[0].kind, TargetKind::Zombie3);
    assert_eq!(s2.cues, vec![Cue::Hit]);
}

#[test]
fn tick_single_projectile_takes_one_of_overlapping_targets() {
    let mut s = make_state();
    s.targets = vec![
        target_at(100.0, 100.0, TargetKind::Zombie1),
        target_at(100.0, 100.0, TargetKind::Zombie2),
    ];
    s.projectiles.push(projectile(125.0, 140.0, -FRAC_PI_2));
    let s2 = tick(&s, &make_config(), &mut seeded_rng());
    assert_eq!(s2.score, 1);
    assert_eq!(s2.targets.len(), 1);
    assert_eq!(s2.targets[0].kind, TargetKind::Zombie2);
}

#[test]
fn tick_respawn_policy_relocates_hit_target() {
    let config = GameConfig { hit_policy: HitPolicy::Respawn, ..make_config() };
    let mut s = make_state();
    s.targets = vec![target_at(100.0, 100.0, TargetKind::Zombie1)];
    s.projectiles.push(projectile(125.0, 140.0, -FRAC_PI_2));
    let s2 = tick(&s, &config, &mut seeded_rng());
    assert_eq!(s2.score, 1);
    assert_eq!(s2.level, 1);
    assert_eq!(s2.targets.len(), 1);
    assert_eq!(s2.targets[0].kind, TargetKind::Zombie1);
    assert_ne!(s2.targets[0].rect, Rect::new(100.0, 100.0, 50.0, 50.0));
}

#[test]
fn tick_falling_target_wraps_back_to_top() {
    let mut s = make_state();
    let mut t = target_at(100.0, 599.0, TargetKind::Zombie1);
    t.vy = 2.0;
    s.targets = vec![t];
    let s2 = tick(&s, &make_config(), &mut seeded_rng());
    assert_eq!(s2.targets.len(), 1);
    assert_eq!(s2.targets[0].rect, Rect::new(100.0, -50.0, 50.0, 50.0));
    assert_eq!(s2.targets[0].vy, 2.0);
    assert_eq!(s2.escaped, 1);
    assert_eq!(s2.score, 0);
    assert_eq!(s2.level, 1);
    assert!(s2.cues.is_empty());
}

#[test]
fn session_without_hits_never_wins() {
    let config = GameConfig::default();
    let mut rng = seeded_rng();
    let mut s = init_session(&config, &config.difficulties[0], &mut rng);
    for _ in 0..12_000 {
        s = tick(&s, &config, &mut rng);
    }
    assert_eq!(s.status, SessionStatus::Running);
    assert_eq!(s.level, 1);
    assert_eq!(s.score, 0);
    assert_eq!(s.targets.len(), 10);
    assert!(s.escaped > 0);
}

#[test]
fn wrap_to_top_keeps_column_and_speed() {
    let arena = Rect::new(0.0, 0.0, 800.0, 600.0);
    let mut t = target_at(320.0, 601.0, TargetKind::Zombie2);
    t.vy = 1.5;
    let w = wrap_to_top(&t, &arena);
    assert_eq!(w.rect, Rect::new(320.0, -50.0, 50.0, 50.0));
    assert_eq!(w.vy, 1.5);
    assert_eq!(w.kind, TargetKind::Zombie2);
}

#[test]
fn tick_cleared_level_advances_with_scaled_wave() {
    let s = make_state(); // level 1, no targets
    let s2 = tick(&s, &make_config(), &mut seeded_rng());
    assert_eq!(s2.level, 2);
    assert_eq!(s2.targets.len(), 15);
    assert_eq!(s2.status, SessionStatus::Running);
    assert_eq!(s2.cues, vec![Cue::LevelUp]);
}

#[test]
fn tick_cleared_final_level_wins() {
    let mut s = make_state();
    s.level = 3;
    let s2 = tick(&s, &make_config(), &mut seeded_rng());
    assert_eq!(s2.status, SessionStatus::Won);
    assert_eq!(s2.level, 3);
    assert_eq!(s2.cues, vec![Cue::GameOver]);
}

#[test]
fn tick_time_limit_ends_game_regardless_of_targets() {
    let config = GameConfig { time_limit_ms: Some(30_000), ..make_config() };
    let mut s = make_state();
    s.targets = vec![parked(), target_at(10.0, 10.0, TargetKind::Zombie1)];
    s.elapsed_ms = 30_001;
    let s2 = tick(&s, &config, &mut seeded_rng());
    assert_eq!(s2.status, SessionStatus::TimeUp);
    assert_eq!(s2.targets.len(), 2);
}

#[test]
fn tick_before_time_limit_keeps_running() {
    let config = GameConfig { time_limit_ms: Some(30_000), ..make_config() };
    let mut s = make_state();
    s.targets.push(parked());
    s.elapsed_ms = 29_000;
    let s2 = tick(&s, &config, &mut seeded_rng());
    assert_eq!(s2.status, SessionStatus::Running);
}

#[test]
fn tick_finished_session_is_frozen() {
    let mut s = make_state();
    s.status = SessionStatus::TimeUp;
    s.projectiles.push(projectile(400.0, 300.0, 0.0));
    let s2 = tick(&s, &make_config(), &mut seeded_rng());
    assert_eq!(s2.ticks, 0);
    assert_eq!(s2.projectiles[0].pos, Point::new(400.0, 300.0));
}

#[test]
fn tick_does_not_mutate_original() {
    let mut s = make_state();
    s.targets.push(parked());
    s.projectiles.push(projectile(400.0, 300.0, 0.0));
    let _ = tick(&s, &make_config(), &mut seeded_rng());
    assert_eq!(s.projectiles[0].pos, Point::new(400.0, 300.0));
    assert_eq!(s.ticks, 0);
}
