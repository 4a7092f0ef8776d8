use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use medmax_client::ApiHandle;
use medmax_core::{update, AppState, Msg};
use medmax_logging::{medmax_info, set_dispatch_seq};

use super::config::{AppConfig, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::input::{parse_command, DriverCommand, HELP};
use super::{logging, persistence, render};

/// Something the host threads hand to the dispatch loop.
enum HostEvent {
    Command(DriverCommand),
    Tick,
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load(Path::new(CONFIG_FILENAME))?
        .with_env(|key| std::env::var(key).ok());
    logging::initialize(config.log_destination, config.level_filter()?);
    medmax_info!("Starting against {}", config.api_base_url);

    let api = ApiHandle::new(config.client_settings()).context("starting the API client")?;
    let boot_token = persistence::load_session_token(&config.state_dir);
    let runner = EffectRunner::new(api, &config.start_url, config.state_dir.clone());

    let (event_tx, event_rx) = mpsc::channel::<HostEvent>();
    spawn_stdin_reader(event_tx.clone());
    // One-second clock for pages with countdowns.
    thread::spawn(move || {
        while event_tx.send(HostEvent::Tick).is_ok() {
            thread::sleep(Duration::from_secs(1));
        }
    });

    let (state, effects) = AppState::init(&config.start_url, boot_token, config.pricing.clone());
    let mut host = Host {
        state,
        runner,
        queue: VecDeque::new(),
        seq: 0,
    };
    host.queue.extend(host.runner.run(effects));
    println!("{HELP}");
    host.drain();

    loop {
        host.queue.extend(host.runner.poll_completions());
        match event_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(HostEvent::Command(DriverCommand::Quit)) | Ok(HostEvent::InputClosed) => break,
            Ok(HostEvent::Command(command)) => host.command(command),
            Ok(HostEvent::Tick) => {
                if host.state.wants_ticks() {
                    host.queue.push_back(Msg::Tick);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        host.drain();
    }

    medmax_info!("Shutting down");
    Ok(())
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = parse_command(&line) {
                if event_tx.send(HostEvent::Command(command)).is_err() {
                    return;
                }
            }
        }
        let _ = event_tx.send(HostEvent::InputClosed);
    });
}

struct Host {
    state: AppState,
    runner: EffectRunner,
    queue: VecDeque<Msg>,
    seq: u64,
}

impl Host {
    fn command(&mut self, command: DriverCommand) {
        match command {
            DriverCommand::Open(target) => self.queue.push_back(Msg::LinkClicked(target)),
            DriverCommand::Back => match self.runner.back() {
                Some(msg) => self.queue.push_back(msg),
                None => println!("(no earlier page)"),
            },
            DriverCommand::Logout => self.queue.push_back(Msg::LogoutClicked),
            DriverCommand::Help => println!("{HELP}"),
            DriverCommand::Quit => {}
        }
    }

    /// Dispatches queued messages until none are left, rendering when the state changed.
    fn drain(&mut self) {
        while let Some(msg) = self.queue.pop_front() {
            self.dispatch(msg);
        }
        for url in self.runner.take_external() {
            println!("-> opening {url}");
        }
        if self.state.consume_dirty() {
            print!("{}", render::render(&self.state.view()));
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        self.seq += 1;
        set_dispatch_seq(self.seq);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        let follow_up = self.runner.run(effects);
        self.queue.extend(follow_up);
    }
}
