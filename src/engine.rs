//! Game state machine
//!
//! `Engine` owns the canonical phase and the current `Session`, applies
//! mapped commands, advances the simulation once per tick and describes the
//! result as a `Frame`. It is the only mutator of game state; the frame loop
//! drives it from a single thread.

use rand::Rng;

use crate::compute;
use crate::config::GameConfig;
use crate::entities::{Session, SessionStatus};
use crate::error::GameError;
use crate::frame::{AudioSink, Button, DrawCmd, Frame, Hud, Overlay};
use crate::geometry::{contains, Point, Rect};
use crate::input::Command;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Title screen; `selected` indexes `MENU_ITEMS`.
    Menu { selected: usize },
    /// `selected` indexes the configured difficulty table.
    DifficultySelect { selected: usize },
    Playing,
    Paused,
    GameOver { won: bool, shown_ms: u64 },
    /// Terminal: the loop should exit.
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Quit,
}

pub const MENU_ITEMS: [MenuItem; 2] = [MenuItem::Start, MenuItem::Quit];

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Start => "Start",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Stacked, horizontally centred button slots starting at `top`.
fn button_column(config: &GameConfig, top: f32, count: usize) -> Vec<Rect> {
    let w = config.arena_width as f32;
    let h = config.arena_height as f32;
    let bw = w / 3.0;
    let bh = h / 12.0;
    (0..count)
        .map(|i| Rect::new((w - bw) / 2.0, top + i as f32 * bh * 1.5, bw, bh))
        .collect()
}

/// Clickable regions of the title screen, in `MENU_ITEMS` order.
pub fn menu_layout(config: &GameConfig) -> Vec<Rect> {
    button_column(config, config.arena_height as f32 / 2.0, MENU_ITEMS.len())
}

/// Clickable regions of the difficulty screen, in table order.
pub fn difficulty_layout(config: &GameConfig) -> Vec<Rect> {
    button_column(config, config.arena_height as f32 / 4.0, config.difficulties.len())
}

pub struct Engine {
    config: GameConfig,
    phase: Phase,
    /// Index into the difficulty table used for the next session.
    difficulty: usize,
    session: Option<Session>,
}

impl Engine {
    /// Validate `config` and start on the title screen.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Menu { selected: 0 },
            difficulty: 0,
            session: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Preselect a difficulty; out-of-range indices are ignored.
    pub fn set_difficulty(&mut self, index: usize) -> bool {
        if index < self.config.difficulties.len() {
            self.difficulty = index;
            true
        } else {
            false
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Quit
    }

    fn set_phase(&mut self, phase: Phase) {
        if std::mem::discriminant(&phase) != std::mem::discriminant(&self.phase) {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
    }

    /// Replace the session with a fresh one and start playing.
    pub fn start(&mut self, rng: &mut impl Rng) {
        let difficulty = &self.config.difficulties[self.difficulty];
        log::info!("Starting new game on {}", difficulty.name);
        self.session = Some(compute::init_session(&self.config, difficulty, rng));
        self.set_phase(Phase::Playing);
    }

    fn quit(&mut self) {
        self.session = None;
        self.set_phase(Phase::Quit);
    }

    fn activate_menu_item(&mut self, item: MenuItem, rng: &mut impl Rng) {
        match item {
            MenuItem::Start if self.config.select_difficulty => {
                self.set_phase(Phase::DifficultySelect { selected: self.difficulty });
            }
            MenuItem::Start => self.start(rng),
            MenuItem::Quit => self.quit(),
        }
    }

    fn commit_difficulty(&mut self, index: usize, rng: &mut impl Rng) {
        self.difficulty = index;
        self.start(rng);
    }

    fn update_session(&mut self, f: impl FnOnce(&Session, &GameConfig) -> Session) {
        if let Some(session) = &self.session {
            self.session = Some(f(session, &self.config));
        }
    }

    fn drain_cues(&mut self, audio: &mut impl AudioSink) {
        if let Some(session) = &mut self.session {
            for cue in session.cues.drain(..) {
                audio.play(cue);
            }
        }
    }

    /// Apply one domain command.
    pub fn apply(&mut self, command: Command, rng: &mut impl Rng, audio: &mut impl AudioSink) {
        if command == Command::Quit {
            self.quit();
            return;
        }

        match self.phase {
            Phase::Menu { selected } => {
                let n = MENU_ITEMS.len();
                match command {
                    Command::SelectPrev => self.phase = Phase::Menu { selected: (selected + n - 1) % n },
                    Command::SelectNext => self.phase = Phase::Menu { selected: (selected + 1) % n },
                    Command::Confirm => self.activate_menu_item(MENU_ITEMS[selected], rng),
                    Command::Click(p) => {
                        if let Some(i) = hit_button(&menu_layout(&self.config), p) {
                            self.activate_menu_item(MENU_ITEMS[i], rng);
                        }
                    }
                    _ => {}
                }
            }
            Phase::DifficultySelect { selected } => {
                let n = self.config.difficulties.len();
                match command {
                    Command::SelectPrev => {
                        self.phase = Phase::DifficultySelect { selected: (selected + n - 1) % n }
                    }
                    Command::SelectNext => {
                        self.phase = Phase::DifficultySelect { selected: (selected + 1) % n }
                    }
                    Command::Confirm => self.commit_difficulty(selected, rng),
                    Command::Click(p) => {
                        if let Some(i) = hit_button(&difficulty_layout(&self.config), p) {
                            self.commit_difficulty(i, rng);
                        }
                    }
                    Command::Back => self.set_phase(Phase::Menu { selected: 0 }),
                    _ => {}
                }
            }
            Phase::Playing => match command {
                Command::MoveLeft => self.update_session(compute::move_avatar_left),
                Command::MoveRight => self.update_session(compute::move_avatar_right),
                Command::Fire(aim) => self.update_session(|s, c| compute::fire(s, c, aim, rng)),
                Command::TogglePause => self.set_phase(Phase::Paused),
                Command::Restart => self.start(rng),
                _ => {}
            },
            Phase::Paused => match command {
                Command::TogglePause => self.set_phase(Phase::Playing),
                Command::Restart => self.start(rng),
                _ => {}
            },
            Phase::GameOver { .. } => {
                if command == Command::Restart {
                    self.start(rng);
                }
            }
            Phase::Quit => {}
        }

        self.drain_cues(audio);
    }

    /// Advance one frame. Only `Playing` simulates; `GameOver` counts down
    /// the optional auto-restart delay.
    pub fn tick(&mut self, rng: &mut impl Rng, audio: &mut impl AudioSink) {
        match self.phase {
            Phase::Playing => {
                self.update_session(|s, c| compute::tick(s, c, rng));
                let status = self.session.as_ref().map(|s| s.status);
                match status {
                    Some(SessionStatus::Won) => {
                        self.set_phase(Phase::GameOver { won: true, shown_ms: 0 })
                    }
                    Some(SessionStatus::TimeUp) => {
                        self.set_phase(Phase::GameOver { won: false, shown_ms: 0 })
                    }
                    _ => {}
                }
            }
            Phase::GameOver { won, shown_ms } => {
                let shown_ms = shown_ms + self.config.frame_delay_ms;
                match self.config.game_over_delay_ms {
                    Some(delay) if shown_ms >= delay => self.start(rng),
                    _ => self.phase = Phase::GameOver { won, shown_ms },
                }
            }
            _ => {}
        }
        self.drain_cues(audio);
    }

    /// Describe the current state as a draw-list.
    pub fn frame(&self) -> Frame {
        let mut commands = vec![DrawCmd::Background];

        match self.phase {
            Phase::Menu { selected } => {
                let buttons = menu_layout(&self.config)
                    .into_iter()
                    .zip(MENU_ITEMS)
                    .enumerate()
                    .map(|(i, (rect, item))| Button {
                        label: item.label().to_string(),
                        rect,
                        selected: i == selected,
                    })
                    .collect();
                commands.push(DrawCmd::Overlay(Overlay::Menu { buttons }));
            }
            Phase::DifficultySelect { selected } => {
                let buttons = difficulty_layout(&self.config)
                    .into_iter()
                    .zip(&self.config.difficulties)
                    .enumerate()
                    .map(|(i, (rect, d))| Button {
                        label: d.name.clone(),
                        rect,
                        selected: i == selected,
                    })
                    .collect();
                commands.push(DrawCmd::Overlay(Overlay::DifficultySelect { buttons }));
            }
            Phase::Playing | Phase::Paused | Phase::GameOver { .. } => {
                if let Some(session) = &self.session {
                    self.draw_session(session, &mut commands);
                }
            }
            Phase::Quit => {}
        }

        Frame {
            arena: self.config.arena(),
            commands,
        }
    }

    fn draw_session(&self, session: &Session, commands: &mut Vec<DrawCmd>) {
        commands.extend(session.obstacles.iter().map(|o| DrawCmd::Obstacle(o.rect)));
        commands.extend(session.targets.iter().map(|t| DrawCmd::Target {
            rect: t.rect,
            kind: t.kind,
        }));
        commands.extend(session.projectiles.iter().map(|p| DrawCmd::Projectile(p.pos)));
        commands.push(DrawCmd::Avatar(session.avatar.rect));
        commands.push(DrawCmd::Hud(Hud {
            score: session.score,
            level: session.level,
            max_level: self.config.max_level,
            difficulty: session.difficulty.name.clone(),
            time_left_ms: self
                .config
                .time_limit_ms
                .map(|limit| limit.saturating_sub(session.elapsed_ms)),
            escaped: session.escaped,
        }));

        match self.phase {
            Phase::Paused => commands.push(DrawCmd::Overlay(Overlay::Paused)),
            Phase::GameOver { won, .. } => commands.push(DrawCmd::Overlay(Overlay::GameOver {
                score: session.score,
                level: session.level,
                won,
            })),
            _ => {}
        }
    }
}

fn hit_button(layout: &[Rect], p: Point) -> Option<usize> {
    layout.iter().position(|r| contains(r, p))
}
