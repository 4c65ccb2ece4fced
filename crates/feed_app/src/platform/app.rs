use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use feed_core::{update, AppState, Msg};
use feed_logging::{feed_debug, feed_info};

use super::effects::EffectRunner;
use super::ui;
use super::{config, logging};

pub fn run_app() -> anyhow::Result<()> {
    let config = config::load().context("loading configuration")?;
    logging::initialize(config.log_destination);
    feed_info!(
        "Starting feed browser: endpoint={} page_size={} debounce_ms={}",
        config.endpoint_base,
        config.page_size,
        config.debounce_window_ms
    );

    let mut runner = EffectRunner::new(config.engine_config()).context("starting engine")?;
    runner.check_health();

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    spawn_input_reader(msg_tx.clone());

    // Background tick so engine events are picked up without user input.
    let tick_tx = msg_tx.clone();
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while tick_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", ui::constants::PROMPT_HELP)?;

    let mut state = AppState::with_page_size(config.page_size);
    let _ = msg_tx.send(Msg::Mounted);
    drop(msg_tx);

    while let Ok(msg) = msg_rx.recv() {
        let quitting = matches!(msg, Msg::Unmounted);
        let mut inbox = runner.drain_messages();
        inbox.push(msg);
        for msg in inbox {
            state = dispatch_msg(state, msg, &runner);
        }

        if state.consume_dirty() && !quitting {
            for line in ui::render::render(&state.view()) {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
        }
        if quitting {
            break;
        }
    }

    runner.shutdown();
    feed_info!("Feed browser stopped");
    Ok(())
}

fn dispatch_msg(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    if !matches!(msg, Msg::Tick) {
        feed_debug!("Msg {:?}", msg);
    }
    let (state, effects) = update(state, msg);
    runner.run(effects);
    state
}

/// Forwards stdin lines as messages; end of input ends the session.
fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let msg = ui::input::parse_line(&line);
            let quit = matches!(msg, Msg::Unmounted);
            if msg_tx.send(msg).is_err() || quit {
                return;
            }
        }
        let _ = msg_tx.send(Msg::Unmounted);
    });
}
