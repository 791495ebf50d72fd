//! Rendering layer. All terminal I/O lives here.
//!
//! The display receives a `Frame` (arena coordinates) and maps it onto the
//! terminal grid through a `Viewport`.  No game logic is performed; this
//! module only translates draw commands into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::assets::{self, Assets};
use crate::entities::{Cue, TargetKind};
use crate::frame::{AudioSink, Button, DrawCmd, Frame, Hud, Overlay, RenderSink};
use crate::geometry::{Point, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_BACKGROUND: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HUD_TIME: Color = Color::Red;
const C_AVATAR: Color = Color::White;
const C_ZOMBIE1: Color = Color::Green;
const C_ZOMBIE2: Color = Color::DarkGreen;
const C_ZOMBIE3: Color = Color::Magenta;
const C_PROJECTILE: Color = Color::Red;
const C_OBSTACLE: Color = Color::Red;
const C_BUTTON: Color = Color::White;
const C_BUTTON_SELECTED: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

const CONTROLS_HINT: &str = "← → / A D : Move   SPACE : Shoot   Click : Aim   P : Pause   Q : Quit";

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps arena space onto the terminal grid.
///
/// Row 0 is the HUD, rows 1 and `rows - 2` are the border, the last row holds
/// the controls hint; the arena fills the cells inside the border.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    arena_w: f32,
    arena_h: f32,
    cols: u16,
    rows: u16,
}

impl Viewport {
    pub fn new(arena_w: u32, arena_h: u32, cols: u16, rows: u16) -> Self {
        Self {
            arena_w: arena_w as f32,
            arena_h: arena_h as f32,
            cols,
            rows,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn play_cols(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(4).max(1)
    }

    fn cell_w(&self) -> f32 {
        self.arena_w / self.play_cols() as f32
    }

    fn cell_h(&self) -> f32 {
        self.arena_h / self.play_rows() as f32
    }

    /// Terminal cell (column, row) containing `p`, clamped to the play area.
    pub fn to_cell(&self, p: Point) -> (u16, u16) {
        let col = (p.x / self.cell_w()).floor().clamp(0.0, (self.play_cols() - 1) as f32);
        let row = (p.y / self.cell_h()).floor().clamp(0.0, (self.play_rows() - 1) as f32);
        (1 + col as u16, 2 + row as u16)
    }

    /// Centre of the arena region under a terminal cell.
    pub fn to_arena(&self, column: u16, row: u16) -> Point {
        let col = column.saturating_sub(1).min(self.play_cols() - 1);
        let row = row.saturating_sub(2).min(self.play_rows() - 1);
        Point::new(
            (col as f32 + 0.5) * self.cell_w(),
            (row as f32 + 0.5) * self.cell_h(),
        )
    }

    /// Width of `r` in whole cells, at least one.
    pub fn cells_wide(&self, r: &Rect) -> usize {
        ((r.w / self.cell_w()).round() as usize).max(1)
    }
}

// ── Terminal display ──────────────────────────────────────────────────────────

pub struct TerminalDisplay<W: Write> {
    out: W,
    assets: Assets,
    viewport: Viewport,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, assets: Assets, viewport: Viewport) -> Self {
        Self {
            out,
            assets,
            viewport,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport.cols = cols;
        self.viewport.rows = rows;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_at(&mut self, col: u16, row: u16, color: Color, text: &str) -> std::io::Result<()> {
        let room = self.viewport.cols.saturating_sub(col) as usize;
        if room == 0 || row >= self.viewport.rows {
            return Ok(());
        }
        let clipped: String = text.chars().take(room).collect();
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(clipped))?;
        Ok(())
    }

    fn print_centered(&mut self, row: u16, color: Color, text: &str) -> std::io::Result<()> {
        let col = (self.viewport.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
        self.print_at(col, row, color, text)
    }

    /// Draw `key`'s sprite at `p`, clipped to `max_cells`. Placeholders are skipped.
    fn draw_sprite(&mut self, key: &str, p: Point, max_cells: usize, color: Color) -> std::io::Result<()> {
        let Some(sprite) = self.assets.sprite(key) else {
            return Ok(());
        };
        let sprite: String = sprite.chars().take(max_cells).collect();
        let (col, row) = self.viewport.to_cell(p);
        self.print_at(col, row, color, &sprite)
    }

    // ── Border ────────────────────────────────────────────────────────────────

    fn draw_border(&mut self) -> std::io::Result<()> {
        let (w, h) = self.viewport.size();
        let bar = "─".repeat(w.saturating_sub(2) as usize);

        self.print_at(0, 1, C_BORDER, &format!("┌{}┐", bar))?;
        self.print_at(0, h.saturating_sub(2), C_BORDER, &format!("└{}┘", bar))?;
        for row in 2..h.saturating_sub(2) {
            self.print_at(0, row, C_BORDER, "│")?;
            self.print_at(w.saturating_sub(1), row, C_BORDER, "│")?;
        }
        Ok(())
    }

    fn draw_background(&mut self) -> std::io::Result<()> {
        let Some(glyph) = self.assets.sprite(assets::BACKGROUND).map(str::to_string) else {
            return Ok(());
        };
        let (w, h) = self.viewport.size();
        for row in (3..h.saturating_sub(2)).step_by(4) {
            let offset = if row % 8 == 3 { 2 } else { 6 };
            for col in (offset..w.saturating_sub(1)).step_by(8) {
                self.print_at(col, row, C_BACKGROUND, &glyph)?;
            }
        }
        Ok(())
    }

    // ── HUD (row 0) ───────────────────────────────────────────────────────────

    fn draw_hud(&mut self, hud: &Hud) -> std::io::Result<()> {
        self.print_at(1, 0, C_HUD_SCORE, &format!("Score:{:>5}", hud.score))?;

        let level = format!("Level {}/{}  [ {} ]", hud.level, hud.max_level, hud.difficulty);
        self.print_centered(0, C_HUD_LEVEL, &level)?;

        let mut right = String::new();
        if hud.escaped > 0 {
            right.push_str(&format!("Escaped:{}  ", hud.escaped));
        }
        if let Some(ms) = hud.time_left_ms {
            right.push_str(&format!("Time:{:>5.1}s", ms as f32 / 1000.0));
        }
        if !right.is_empty() {
            let col = self
                .viewport
                .cols
                .saturating_sub(right.chars().count() as u16 + 1);
            self.print_at(col, 0, C_HUD_TIME, &right)?;
        }
        Ok(())
    }

    // ── Overlays ──────────────────────────────────────────────────────────────

    fn draw_buttons(&mut self, title: &str, buttons: &[Button]) -> std::io::Result<()> {
        if let Some(first) = buttons.first() {
            let (_, row) = self.viewport.to_cell(Point::new(first.rect.x, first.rect.y));
            self.print_centered(row.saturating_sub(3).max(2), Color::Cyan, title)?;
        }
        for button in buttons {
            let (_, row) = self.viewport.to_cell(button.rect.center());
            if button.selected {
                self.print_centered(row, C_BUTTON_SELECTED, &format!("> {} <", button.label))?;
            } else {
                self.print_centered(row, C_BUTTON, &button.label)?;
            }
        }
        Ok(())
    }

    fn draw_box(&mut self, lines: &[(String, Color)]) -> std::io::Result<()> {
        let start = (self.viewport.rows / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, (text, color)) in lines.iter().enumerate() {
            self.print_centered(start + i as u16, *color, text)?;
        }
        Ok(())
    }

    fn draw_overlay(&mut self, overlay: &Overlay) -> std::io::Result<()> {
        match overlay {
            Overlay::Menu { buttons } => self.draw_buttons("★  ZOMBIE SHOOTING GALLERY  ★", buttons),
            Overlay::DifficultySelect { buttons } => self.draw_buttons("Select Difficulty", buttons),
            Overlay::Paused => self.draw_box(&[
                ("╔════════════════════╗".to_string(), Color::Yellow),
                ("║       PAUSED       ║".to_string(), Color::Yellow),
                ("╚════════════════════╝".to_string(), Color::Yellow),
                ("P - Resume  R - Restart  Q - Quit".to_string(), Color::White),
            ]),
            Overlay::GameOver { score, level, won } => {
                let (banner, color) = if *won {
                    ("║      YOU  WIN      ║", Color::Green)
                } else {
                    ("║     GAME  OVER     ║", Color::Red)
                };
                self.draw_box(&[
                    ("╔════════════════════╗".to_string(), color),
                    (banner.to_string(), color),
                    ("╚════════════════════╝".to_string(), color),
                    (format!("Final Score: {:>5}   Level: {}", score, level), Color::Yellow),
                    ("R - Play Again  Q - Quit".to_string(), Color::White),
                ])
            }
        }
    }

    fn draw(&mut self, cmd: &DrawCmd) -> std::io::Result<()> {
        match cmd {
            DrawCmd::Background => self.draw_background(),
            DrawCmd::Obstacle(rect) => {
                let cells = self.viewport.cells_wide(rect);
                let Some(glyph) = self.assets.sprite(assets::OBSTACLE) else {
                    return Ok(());
                };
                let bar = glyph.repeat(cells);
                let (col, row) = self.viewport.to_cell(Point::new(rect.x, rect.y));
                self.print_at(col, row, C_OBSTACLE, &bar)
            }
            DrawCmd::Target { rect, kind } => {
                let color = match kind {
                    TargetKind::Zombie1 => C_ZOMBIE1,
                    TargetKind::Zombie2 => C_ZOMBIE2,
                    TargetKind::Zombie3 => C_ZOMBIE3,
                };
                let cells = self.viewport.cells_wide(rect);
                self.draw_sprite(kind.sprite_key(), Point::new(rect.x, rect.y), cells, color)
            }
            DrawCmd::Projectile(p) => self.draw_sprite(assets::PROJECTILE, *p, 1, C_PROJECTILE),
            DrawCmd::Avatar(rect) => {
                let cells = self.viewport.cells_wide(rect);
                self.draw_sprite(assets::AVATAR, Point::new(rect.x, rect.y), cells, C_AVATAR)
            }
            DrawCmd::Hud(hud) => self.draw_hud(hud),
            DrawCmd::Overlay(overlay) => self.draw_overlay(overlay),
        }
    }
}

impl<W: Write> RenderSink for TerminalDisplay<W> {
    /// Render one complete frame.
    fn present(&mut self, frame: &Frame) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border()?;

        for cmd in &frame.commands {
            self.draw(cmd)?;
        }

        let hint_row = self.viewport.rows.saturating_sub(1);
        self.print_at(1, hint_row, C_HINT, CONTROLS_HINT)?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, hint_row))?;
        self.out.flush()?;
        Ok(())
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Rings the terminal bell for every cue the asset set has a sound for.
pub struct BellAudio<W: Write> {
    out: W,
    assets: Assets,
}

impl<W: Write> BellAudio<W> {
    pub fn new(out: W, assets: Assets) -> Self {
        Self { out, assets }
    }
}

impl<W: Write> AudioSink for BellAudio<W> {
    fn play(&mut self, cue: Cue) {
        if !self.assets.has_sound(cue) {
            return;
        }
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            log::debug!("Could not play {}: {}", cue.name(), e);
        }
    }
}
