//! NanoKey CLI - line-driven simulator for the AI keyboard.
//!
//! # Event Loop
//!
//! ```text
//! stdin line -> command::parse -> App::handle(Intent) -> frame::render
//!                    ^                                         |
//!                    +-------------- 50ms tick: App::poll -----+
//! ```
//!
//! Suggestion requests and connection tests run in the background; the tick
//! collects their results and reprints the frame when anything changed.
//! `wait` and `health` block on them instead, which keeps piped scripts
//! deterministic.

mod command;
mod frame;

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use command::Command;
use nanokey_engine::{App, AppSettings, Intent, SettingsStore, nanokey_config};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than interleave logs with the frames.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: next to the settings file, ~/.nanokey/logs/nanokey.log
    if let Some(settings_path) = nanokey_config::settings_path()
        && let Some(dir) = settings_path.parent()
    {
        candidates.push(dir.join("logs").join("nanokey.log"));
    }

    // Fallback: ./.nanokey/logs/nanokey.log
    candidates.push(PathBuf::from(".nanokey").join("logs").join("nanokey.log"));

    candidates
}

fn build_app() -> App {
    match SettingsStore::open_default() {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "Using settings file");
            App::load(store)
        }
        Err(err) => {
            tracing::warn!(%err, "No settings location; changes will not persist");
            eprintln!("warning: {err}; settings will not be saved");
            App::new(AppSettings::default())
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

async fn run_command(app: &mut App, command: Command) -> Flow {
    match command {
        Command::Intent(intent) => app.handle(intent),
        Command::Type(text) => {
            for ch in text.chars() {
                app.handle(Intent::Key(ch.to_string()));
            }
        }
        Command::Wait => {
            if app.await_dispatch().await.is_none() {
                println!("nothing pending");
            }
        }
        Command::Health => {
            app.handle(Intent::OpenSettings);
            app.handle(Intent::TestConnection);
            app.await_health().await;
        }
        Command::Show => {}
        Command::Help => println!("{}", command::HELP),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let mut app = build_app();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    println!("nanokey simulator - type 'help' for commands");
    let mut last_frame = frame::render(&app);
    print!("{last_frame}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let flow = match command::parse(&line) {
                    Ok(Some(command)) => run_command(&mut app, command).await,
                    Ok(None) => continue,
                    Err(err) => {
                        println!("error: {err}");
                        continue;
                    }
                };
                if matches!(flow, Flow::Quit) {
                    break;
                }
                app.poll();
                last_frame = frame::render(&app);
                print!("{last_frame}");
            }
            _ = ticker.tick() => {
                app.poll();
                let current = frame::render(&app);
                if current != last_frame {
                    print!("{current}");
                    last_frame = current;
                }
            }
        }
    }

    tracing::info!("Simulator exiting");
    Ok(())
}
