mod locator;
mod preferences;
mod presenter;
mod scheduler;
mod sensor_reader;

use anyhow::Context;
use locator::{HWMON_BASE, SensorPaths};
use preferences::PreferenceStore;
use presenter::LogPresenter;
use scheduler::{Action, Scheduler};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let (actions_tx, actions_rx) = mpsc::channel();

    // SIGINT/SIGTERM act like the quit menu item; SIGUSR1 toggles the unit,
    // standing in for the menu action while no tray frontend is attached.
    let mut signals = signal_hook::iterator::Signals::new([
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGUSR1,
    ])?;
    thread::spawn(move || {
        for signal in signals.forever() {
            let action = match signal {
                signal_hook::consts::SIGUSR1 => Action::ToggleUnit,
                _ => Action::Quit,
            };
            if actions_tx.send(action).is_err() {
                break;
            }
        }
    });

    let paths =
        SensorPaths::discover(Path::new(HWMON_BASE)).context("sensor discovery failed")?;
    let store = PreferenceStore::at_default_location()?;
    let preference = store
        .load()
        .context("failed to load temperature unit preference")?;

    let mut scheduler = Scheduler::new(paths, store, preference, LogPresenter);
    scheduler.run(&actions_rx)?;

    info!("exiting");
    Ok(())
}
