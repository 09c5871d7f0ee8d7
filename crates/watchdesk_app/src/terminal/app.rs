use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use desk_logging::{desk_info, desk_warn};
use watchdesk_core::{update, AppState, Msg, Route};
use watchdesk_engine::EngineHandle;

use super::commands::{self, Command, HELP};
use super::effects::{EffectRunner, Local};
use super::render::{render, render_notification};
use crate::config::AppConfig;

/// How long the loop waits for input before checking the engine again.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let engine = EngineHandle::new(&config.client_settings()).context("starting engine")?;
    let mut app = TerminalApp {
        state: AppState::new(),
        runner: EffectRunner::new(engine),
    };
    let mut out = io::stdout().lock();

    let start = match config.start_route.as_deref() {
        Some(raw) => Route::parse(raw).unwrap_or_else(|| {
            desk_warn!("Ignoring unknown start route {raw:?}");
            Route::Landing
        }),
        None => Route::Landing,
    };
    writeln!(out, "{HELP}")?;
    app.dispatch(Msg::Navigate(start), &mut out)?;

    let lines = spawn_stdin_reader();
    loop {
        while let Some(msg) = app.runner.poll() {
            app.dispatch(msg, &mut out)?;
        }
        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match commands::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Help)) => writeln!(out, "{HELP}")?,
                Ok(Some(Command::Reload)) => {
                    let route = app.state.route().clone();
                    app.dispatch(Msg::Navigate(route), &mut out)?;
                }
                Ok(Some(Command::Dispatch(msg))) => app.dispatch(msg, &mut out)?,
                Ok(None) => {}
                Err(err) => writeln!(out, "{err}")?,
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    desk_info!("Leaving terminal loop");
    Ok(())
}

struct TerminalApp {
    state: AppState,
    runner: EffectRunner,
}

impl TerminalApp {
    fn dispatch(&mut self, msg: Msg, out: &mut impl Write) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        for local in self.runner.run(effects) {
            match local {
                Local::Notify(notification) => {
                    writeln!(out, "{}", render_notification(&notification))?
                }
                Local::OpenExternal(url) => writeln!(out, "Open in your browser: {url}")?,
            }
        }
        if was_dirty {
            write!(out, "{}", render(&self.state.view(Utc::now())))?;
            out.flush()?;
        }
        Ok(())
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
