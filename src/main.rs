use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use shooting_gallery::assets::Assets;
use shooting_gallery::display::{BellAudio, TerminalDisplay, Viewport};
use shooting_gallery::frame::{AudioSink, RenderSink};
use shooting_gallery::input::{self, Command};
use shooting_gallery::{Engine, GameConfig};

/// Terminal zombie shooting gallery.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file; omitted fields keep their defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Preselected difficulty name (e.g. Easy, Medium, Hard).
    #[arg(short, long)]
    difficulty: Option<String>,
    /// End the game after this many milliseconds of play.
    #[arg(long, value_name = "MS")]
    time_limit: Option<u64>,
    /// Number of waves to clear to win.
    #[arg(long)]
    max_level: Option<u32>,
    /// Seed for target placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON sprite/sound manifest.
    #[arg(long, value_name = "FILE")]
    assets: Option<PathBuf>,
    /// Where to write the log (the terminal is busy drawing the game).
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
    /// Disable the terminal bell.
    #[arg(long)]
    mute: bool,
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join("shooting_gallery.log"));
    let file = File::create(&path)
        .with_context(|| format!("when creating log file at {:?}", path))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn build_engine(cli: &Cli) -> Result<Engine> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(ms) = cli.time_limit {
        config.time_limit_ms = Some(ms);
    }
    if let Some(level) = cli.max_level {
        config.max_level = level;
    }

    let mut engine = Engine::new(config)?;
    if let Some(name) = &cli.difficulty {
        let Some(index) = engine.config().difficulty_index(name) else {
            bail!("unknown difficulty '{}'", name);
        };
        engine.set_difficulty(index);
    }
    Ok(engine)
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Map and apply one terminal event. Returns `false` once the engine has quit.
fn handle_event<W: Write>(
    engine: &mut Engine,
    display: &mut TerminalDisplay<W>,
    ev: &Event,
    rng: &mut StdRng,
    audio: &mut impl AudioSink,
) -> bool {
    if let Event::Resize(cols, rows) = ev {
        display.resize(*cols, *rows);
        return true;
    }
    let command = input::from_terminal(ev, display.viewport())
        .and_then(|input| input::map_event(engine.phase(), input));
    if let Some(command) = command {
        engine.apply(command, rng, audio);
    }
    engine.is_running()
}

/// One tick = drain input, step the simulation, present, then wait out the
/// rest of the frame.  The wait listens on the input channel so a quit
/// request ends the loop without sitting out the frame.
fn run<W: Write>(
    engine: &mut Engine,
    display: &mut TerminalDisplay<W>,
    audio: &mut impl AudioSink,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let frame = Duration::from_millis(engine.config().frame_delay_ms);
    let mut pending: Vec<Event> = Vec::new();

    while engine.is_running() {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        pending.extend(rx.try_iter());
        for ev in pending.drain(..) {
            if !handle_event(engine, display, &ev, rng, audio) {
                return Ok(());
            }
        }

        engine.tick(rng, audio);
        display.present(&engine.frame())?;

        // ── Frame pacing ──────────────────────────────────────────────────────
        loop {
            let elapsed = frame_start.elapsed();
            if elapsed >= frame {
                break;
            }
            match rx.recv_timeout(frame - elapsed) {
                Ok(ev) => {
                    let is_quit = input::from_terminal(&ev, display.viewport())
                        .and_then(|i| input::map_event(engine.phase(), i))
                        == Some(Command::Quit);
                    if is_quit {
                        engine.apply(Command::Quit, rng, audio);
                        return Ok(());
                    }
                    pending.push(ev);
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    log::warn!("Input reader stopped; quitting");
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}

// ── Terminal lifecycle ────────────────────────────────────────────────────────

/// Switch to the alternate screen with mouse capture. Returns whether the
/// terminal accepted keyboard enhancement (key-release reporting).
fn enter_game_screen<W: Write>(out: &mut W) -> std::io::Result<bool> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    Ok(keyboard_enhanced)
}

/// Undo `enter_game_screen`. Best effort: every step runs even if an
/// earlier one fails, and it is safe after a partial setup.
fn leave_game_screen<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    // Configuration errors surface here, before the terminal is touched.
    let mut engine = build_engine(&cli)?;
    let assets = match &cli.assets {
        Some(path) => Assets::load(path),
        None => Assets::builtin(),
    };
    let sounds = if cli.mute { assets.clone().muted() } else { assets.clone() };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (cols, rows) = terminal::size()?;
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    let keyboard_enhanced = match enter_game_screen(&mut out) {
        Ok(enhanced) => enhanced,
        Err(e) => {
            leave_game_screen(&mut out, false);
            let _ = terminal::disable_raw_mode();
            return Err(e).context("terminal setup failed");
        }
    };

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                log::warn!("Terminal event read failed: {}", e);
                break;
            }
        }
    });

    let config = engine.config();
    let viewport = Viewport::new(config.arena_width, config.arena_height, cols, rows);
    let mut display = TerminalDisplay::new(out, assets, viewport);
    let mut audio = BellAudio::new(stdout(), sounds);

    let result = run(&mut engine, &mut display, &mut audio, &rx, &mut rng);

    // Always restore the terminal
    let mut out = display.into_inner();
    leave_game_screen(&mut out, keyboard_enhanced);
    let _ = terminal::disable_raw_mode();

    log::info!("Shutting down");
    result.context("terminal I/O failed")
}
