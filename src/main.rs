//! Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::WriteLogger;

use config::GameConfig;
use domain::action::Action;
use sim::event::TurnOutcome;
use sim::maze::Maze;
use sim::turn;
use ui::menu::ConsoleActionSource;
use ui::render::Renderer;

#[derive(Parser)]
#[command(name = "mazewalk", about = "Terminal turn-based maze escape game")]
struct Args {
    /// Path to the maze data file.
    maze_file: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = GameConfig::load();
    init_logging(&config);

    let text = match fs::read_to_string(&args.maze_file) {
        Ok(text) => text,
        Err(err) => {
            eprintln!(
                "Unable to open maze data file {}: {err}",
                args.maze_file.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut maze = match Maze::parse(&text, rng) {
        Ok(maze) => maze,
        Err(err) => {
            eprintln!("Error loading the maze: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("Welcome to Mazewalk!");
    print!("Hit enter to start the game...");
    let _ = io::stdout().flush();
    wait_for_enter();

    let renderer = Renderer::new(&config.ui);
    match game_loop(&mut maze, &renderer) {
        Ok(()) => {
            println!("\nThanks for playing Mazewalk!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Game error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs turns until the student satisfies the instructor. The losing
/// outcomes reset part or all of the maze and play continues.
fn game_loop(maze: &mut Maze, renderer: &Renderer) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = ConsoleActionSource;
    let mut out = io::stdout();

    loop {
        renderer.draw(&mut out, maze)?;
        let report = turn::resolve_turn(maze, &mut source)?;
        narrate_action(maze, report.action);

        match report.outcome {
            TurnOutcome::AcquiredSkill => {
                println!(
                    "\nYou have acquired a skill! You now have {} programming skills!",
                    maze.student().skills()
                );
            }
            TurnOutcome::CaughtByTa => {
                println!(
                    "\nYou have been caught by an unappeased TA! They sent you \
                     back to the start of your current level."
                );
                maze.reset_current_level()?;
                pause();
            }
            TurnOutcome::FailedByInstructor => {
                println!(
                    "\nYou have been failed by the instructor! They sent you \
                     all the way back to the beginning."
                );
                maze.reset_all_levels()?;
                pause();
            }
            TurnOutcome::SatisfiedInstructor => {
                println!(
                    "\nCONGRATULATIONS! You have satisfied the instructor and \
                     escaped the maze!"
                );
                return Ok(());
            }
            TurnOutcome::NoEvent => {}
        }
    }
}

fn narrate_action(maze: &Maze, action: Action) {
    match action {
        Action::ClimbUp => {
            println!("\nYou have climbed up to level {}.", maze.current_level() + 1);
        }
        Action::DemonstrateSkill => {
            println!(
                "\nYou demonstrated a skill to the TAs; you now have {} skills remaining.",
                maze.student().skills()
            );
        }
        _ => {}
    }
}

fn pause() {
    print!("\nHit enter to continue the game...");
    let _ = io::stdout().flush();
    wait_for_enter();
}

fn wait_for_enter() {
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

fn init_logging(config: &GameConfig) {
    if config.log.file.is_empty() {
        return;
    }
    let level = match config.log.level.as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    match fs::File::create(&config.log.file) {
        Ok(file) => {
            let _ = WriteLogger::init(level, simplelog::Config::default(), file);
        }
        Err(err) => {
            eprintln!("Warning: could not create log file {}: {err}", config.log.file);
        }
    }
}
