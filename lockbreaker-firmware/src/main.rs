//! LockBreaker
//!
//! Brute-forces a three-number combination padlock. A stepper turns the
//! dial through each combination, a servo tugs the shackle, and the
//! servo's feedback potentiometer tells whether the lock opened.
//!
//! The operator picks the starting combination on the 16x2 LCD with the
//! rotary encoder (or passes `--seed`). Every attempt is appended to the
//! attempt log before the next one starts.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lockbreaker_core::dial::Combination;
use lockbreaker_core::orchestrator::{Orchestrator, Rig};
use lockbreaker_drivers::display::Lcd1602;
use lockbreaker_drivers::input::{Button, RotaryEncoder};
use lockbreaker_drivers::sensor::Mcp3008;
use lockbreaker_drivers::servo::ShackleServo;
use lockbreaker_drivers::stepper::StepDirStepper;
use lockbreaker_hal_rpi::Board;

mod attempt_log;
mod config;
mod interrupt;
mod panel;
mod screens;
mod seed_input;
mod slip;

use attempt_log::FileAttemptLog;
use panel::{lock_panel, Panel, PanelObserver};
use slip::CommandSlipCheck;

/// Combination lock dialing rig
#[derive(Parser, Debug)]
#[command(name = "lockbreaker", version, about)]
struct Cli {
    /// Machine configuration file (embedded defaults if it does not exist)
    #[arg(long, env = "LOCKBREAKER_CONFIG", default_value = "lockbreaker.toml")]
    config: PathBuf,

    /// Attempt log, truncated at start unless --append-log is given
    #[arg(long, env = "LOCKBREAKER_ATTEMPT_LOG", default_value = "Combinations.txt")]
    attempt_log: PathBuf,

    /// Keep the existing attempt log (relaunch after a slip)
    #[arg(long, env = "LOCKBREAKER_APPEND_LOG")]
    append_log: bool,

    /// Starting combination (DD-DD-DD); skips entry on the panel
    #[arg(long, value_parser = parse_seed)]
    seed: Option<Combination>,

    /// Log filter, e.g. `info` or `lockbreaker=debug` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn parse_seed(text: &str) -> Result<Combination, String> {
    text.parse::<Combination>().map_err(|e| e.to_string())
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(screens::EXIT_FAULT)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "lockbreaker starting");

    let config = config::load(&cli.config)?;
    let machine = config.machine;

    let board = Board::open(&machine.pins, machine.servo.pwm_hz).context("board bring-up")?;
    let log = if cli.append_log {
        FileAttemptLog::append_to(&cli.attempt_log)
    } else {
        FileAttemptLog::create(&cli.attempt_log)
    }
    .with_context(|| format!("creating {}", cli.attempt_log.display()))?;

    let interrupt = Arc::new(AtomicBool::new(false));
    interrupt::install(Arc::clone(&interrupt)).context("installing signal handlers")?;

    let Board {
        step,
        dir,
        enable,
        servo,
        encoder_clk,
        encoder_dt,
        button,
        spi,
        i2c,
    } = board;

    let mut lcd = Lcd1602::new(i2c, lockbreaker_hal_rpi::delay(), machine.pins.lcd_address);
    if let Err(e) = lcd.init() {
        tracing::warn!(?e, "LCD init failed, continuing without display");
    }
    let mut panel = Panel::new(lcd);
    if let Some(seed) = cli.seed {
        panel = panel.with_seed(seed);
    }
    let panel = Arc::new(Mutex::new(panel));

    let stepper = StepDirStepper::new(
        step,
        dir,
        enable,
        lockbreaker_hal_rpi::delay(),
        machine.stepper,
    );
    let feedback = Mcp3008::new(spi)
        .into_channel(machine.probe.adc_channel)
        .map_err(|e| anyhow!("feedback ADC: {e:?}"))?;
    let probe = ShackleServo::new(
        servo,
        feedback,
        lockbreaker_hal_rpi::delay(),
        machine.servo,
        machine.probe.classifier,
    );
    let slip = CommandSlipCheck::new(&config.slip_check);
    if !slip.is_enabled() {
        tracing::warn!("no slip check command configured, dial slips will go unnoticed");
    }

    let rig = Rig {
        stepper,
        probe,
        log,
        slip,
        delay: lockbreaker_hal_rpi::delay(),
    };
    let observer = PanelObserver(Arc::clone(&panel));
    let dial = move |seed: Combination, interrupt: &AtomicBool| {
        let mut orchestrator =
            Orchestrator::new(rig, machine.dial, machine.settle).with_observer(observer);
        let report = orchestrator.run(seed, interrupt);
        let rig = orchestrator.into_rig();
        tracing::info!(
            state = %report.state,
            attempts = report.attempts,
            logged = rig.log.written(),
            anomaly_checks = report.anomaly_checks,
            "run finished"
        );
        report
    };

    let encoder = RotaryEncoder::new(encoder_clk, encoder_dt);
    let mut button = Button::new(
        button,
        machine.input.long_press_ms,
        machine.input.debounce_ms,
    );

    let report = match cli.seed {
        Some(seed) => {
            lock_panel(&panel).announce_seed(seed);
            thread::sleep(Duration::from_millis(machine.input.confirm_ms as u64));
            dial(seed, &*interrupt)
        }
        None => {
            let handoff = seed_input::enter_and_run(
                Arc::clone(&panel),
                encoder,
                button,
                machine.input,
                Arc::clone(&interrupt),
                dial,
            )?;
            button = handoff.button;
            match handoff.result {
                Some(report) => report,
                None => return Ok(screens::EXIT_INTERRUPTED),
            }
        }
    };

    let mut panel = lock_panel(&panel);
    Ok(screens::present(
        &mut panel,
        &mut button,
        &report,
        &machine.ui,
        &machine.input,
        &interrupt,
    ))
}
