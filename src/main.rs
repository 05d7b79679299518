//! Brickbreak entry point
//!
//! There is no window backend: the game runs on a headless surface with a
//! simple autopilot steering the paddle, and logs what happened.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use brickbreak::platform::{HeadlessSurface, Key, ManualClock};
use brickbreak::sim::groups;
use brickbreak::{Game, GameEvent, Settings, VERSION};

/// Steps simulated when `--steps` is not given
const DEFAULT_STEPS: u64 = 10_000;
/// Simulated frame duration for the headless clock (ms)
const FRAME_MS: u64 = 16;

struct Args {
    version: bool,
    steps: u64,
    settings: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        version: false,
        steps: DEFAULT_STEPS,
        settings: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-V" => args.version = true,
            "--steps" => {
                let value = iter.next().ok_or("--steps needs a value")?;
                args.steps = value
                    .parse()
                    .map_err(|_| format!("invalid step count: {value}"))?;
            }
            "--settings" => {
                let value = iter.next().ok_or("--settings needs a path")?;
                args.settings = Some(PathBuf::from(value));
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

/// Hold Left or Right to keep the paddle under the ball
fn steer(game: &mut Game<HeadlessSurface, ManualClock>) {
    let (Some(ball), Some(paddle)) = (
        game.position_of(groups::BALL),
        game.position_of(groups::PADDLE),
    ) else {
        return;
    };

    let surface = game.surface_mut();
    surface.release(Key::Left);
    surface.release(Key::Right);
    if ball.x < paddle.x - 10.0 {
        surface.press(Key::Left);
    } else if ball.x > paddle.x + 10.0 {
        surface.press(Key::Right);
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("Usage: brickbreak [--version] [--steps <n>] [--settings <path>]");
            return ExitCode::FAILURE;
        }
    };

    if args.version {
        println!("brickbreak {VERSION}");
        return ExitCode::SUCCESS;
    }

    let settings = match &args.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let clock = ManualClock::new(Duration::from_millis(FRAME_MS));
    let mut game = match Game::new(settings, HeadlessSurface::new(), clock) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Failed to build level: {err}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("Brickbreak (headless) running {} steps", args.steps);

    game.set_step_budget(Some(game.steps() + args.steps));
    game.start();
    while game.is_running() {
        steer(&mut game);
        if let Err(err) = game.frame() {
            log::error!("Simulation stopped: {err}");
            return ExitCode::FAILURE;
        }

        for event in game.drain_events() {
            match event {
                GameEvent::LevelCleared => {
                    log::info!("Level cleared at step {}", game.steps());
                    game.stop();
                }
                GameEvent::BrickDestroyed { .. } | GameEvent::PaddleHit { .. } => {}
            }
        }
    }

    println!(
        "{} steps, {} frames, {} bricks left",
        game.steps(),
        game.frames(),
        game.bricks_remaining()
    );
    ExitCode::SUCCESS
}
