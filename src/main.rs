use std::io;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    style::ResetColor,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use log::{error, info};

use space_pilot::config::GameConfig;
use space_pilot::constants::{CURSOR_PARK_ROW_OFFSET, MAP_HEIGHT, MAP_WIDTH};
use space_pilot::game::{Game, Phase, GAME_NAME};
use space_pilot::rendering::{OutputTarget, Renderer, ScreenBuffer};
use space_pilot::terminal_io::SimulatedInput;

const POLL_INTERVAL_MS: u64 = 5;
const DEBUG_STEP_MS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "space-pilot")]
#[command(about = "Fly a ship down a scrolling asteroid lane in the terminal")]
struct Cli {
    /// Playfield width including walls.
    #[arg(long, default_value_t = MAP_WIDTH)]
    width: u16,
    /// Playfield height including walls.
    #[arg(long, default_value_t = MAP_HEIGHT)]
    height: u16,
    /// Seed for asteroid generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Run headless against a screen buffer and log the final frame.
    #[arg(long, default_value_t = false)]
    debug: bool,
    /// Scripted input for --debug, e.g. "100:dd 400:_ 900:w" ("_" is fire).
    #[arg(long, default_value = "")]
    script: String,
    /// How long a --debug run lasts, in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    run_ms: u64,
    #[arg(long, default_value = "space-pilot.log")]
    log_file: String,
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    simple_logging::log_to_file(&cli.log_file, level)
        .with_context(|| format!("opening log file {}", cli.log_file))?;
    info!("Starting space-pilot application.");

    let config = GameConfig {
        width: cli.width,
        height: cli.height,
        seed: cli.seed,
        ..GameConfig::default()
    };
    config.validate()?;

    if cli.debug {
        info!("Debug mode enabled.");
        run_debug(config, &cli.script, cli.run_ms)
    } else {
        run_terminal(config)
    }
}

fn run_debug(config: GameConfig, script: &str, run_ms: u64) -> anyhow::Result<()> {
    let screen = ScreenBuffer::new(
        config.width,
        config.hud_row(CURSOR_PARK_ROW_OFFSET) + 1,
    );
    let mut game = Game::new(config, OutputTarget::ScreenBuffer(screen));
    let mut input = SimulatedInput::from_script(script);

    game.command(&["play"], 0)?;
    let mut now = 0;
    while now <= run_ms && game.phase() == Phase::Playing {
        for byte in input.poll(now) {
            game.receive(byte, now)?;
        }
        game.tick(now)?;
        now += DEBUG_STEP_MS;
    }

    if let OutputTarget::ScreenBuffer(sb) = &game.output {
        sb.print_to_log();
    }
    match game.take_report() {
        Some(report) => info!(
            "Debug run ended at {} ms: score {}, shots fired {}",
            now, report.score, report.shots_fired
        ),
        None => info!("Debug run stopped at {} ms with score {}", now, game.score()),
    }
    Ok(())
}

fn run_terminal(config: GameConfig) -> anyhow::Result<()> {
    info!("Attempting to enable raw mode.");
    enable_raw_mode().map_err(|e| {
        error!("Failed to enable raw mode: {}", e);
        e
    })?;
    let result = host_loop(config);
    execute!(io::stdout(), ResetColor, Show).map_err(|e| {
        error!("Failed to restore terminal: {}", e);
        e
    })?;
    disable_raw_mode()?;
    result
}

/// The host menu: reads command lines until a round starts, then feeds keys
/// to the round until it ends.
fn host_loop(config: GameConfig) -> anyhow::Result<()> {
    let mut game = Game::new(config, OutputTarget::Stdout(io::stdout()));
    let clock = Instant::now();
    let mut line = String::new();

    game.output.print("Type 'play' to begin, 'help' for controls, 'quit' to exit.\n")?;
    prompt(&mut game.output)?;

    loop {
        let now = clock.elapsed().as_millis() as u64;
        if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    info!("Interrupted.");
                    break;
                }
                if game.phase() == Phase::Playing {
                    if let KeyCode::Char(c) = key.code {
                        if c.is_ascii() {
                            game.receive(c as u8, now)?;
                        }
                    }
                } else {
                    match key.code {
                        KeyCode::Char(c) => {
                            line.push(c);
                            game.output.print(c.encode_utf8(&mut [0u8; 4]))?;
                        }
                        KeyCode::Backspace => {
                            if line.pop().is_some() {
                                game.output.print("\u{8} \u{8}")?;
                            }
                        }
                        KeyCode::Enter => {
                            game.output.print("\n")?;
                            let words: Vec<&str> = line.split_whitespace().collect();
                            if matches!(words.first(), Some(w) if w.eq_ignore_ascii_case("quit")) {
                                break;
                            }
                            if let Err(e) = game.command(&words, now) {
                                game.output.print(&format!("[{}] {}\n", GAME_NAME, e))?;
                            }
                            line.clear();
                            if game.phase() != Phase::Playing {
                                prompt(&mut game.output)?;
                            }
                        }
                        KeyCode::Esc => break,
                        _ => {}
                    }
                }
                game.output.flush()?;
            }
        }

        game.tick(now)?;
        if game.take_report().is_some() {
            game.output.print("\n")?;
            prompt(&mut game.output)?;
        }
    }
    Ok(())
}

fn prompt(out: &mut OutputTarget) -> io::Result<()> {
    out.print("$ ")?;
    out.flush()
}
