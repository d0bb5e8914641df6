use crate::locator::SensorPaths;
use crate::preferences::{ConfigError, Preference, PreferenceStore};
use crate::presenter::{FanZone, Presenter};
use crate::sensor_reader::{ReadError, format_fan_line, format_temperature, read_raw};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Shown in place of a formatted value when the sensor file has vanished.
/// The next tick retries implicitly.
pub const FALLBACK_LABEL: &str = "File not found";

/// User actions forwarded from the presenter (or from signals). Delivered on
/// the same queue the timer runs on, so they never interleave with a poll
/// cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleUnit,
    Quit,
}

/// Label strings currently pushed to the presenter. Written by poll cycles
/// and the unit toggle, never read back for decisions.
#[derive(Debug, Default)]
struct DisplayState {
    status_label: String,
    cpu_fan_line: String,
    gpu_fan_line: String,
}

/// Drives the poll-format-display cycle. Holds all process-wide state:
/// discovered sensor paths, the cached preference, and the presenter handle.
pub struct Scheduler<P: Presenter> {
    paths: SensorPaths,
    store: PreferenceStore,
    preference: Preference,
    presenter: P,
    display: DisplayState,
}

impl<P: Presenter> Scheduler<P> {
    pub fn new(paths: SensorPaths, store: PreferenceStore, preference: Preference, presenter: P) -> Self {
        Self {
            paths,
            store,
            preference,
            presenter,
            display: DisplayState::default(),
        }
    }

    /// Runs until a quit action arrives. One poll cycle fires immediately,
    /// then every [`POLL_INTERVAL`]; actions received between ticks are
    /// handled in between cycles, never during one.
    pub fn run(&mut self, actions: &Receiver<Action>) -> Result<(), ConfigError> {
        info!("starting poll loop");
        self.poll_cycle();

        let mut next_tick = Instant::now() + POLL_INTERVAL;
        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            match actions.recv_timeout(timeout) {
                Ok(Action::ToggleUnit) => self.toggle_unit()?,
                Ok(Action::Quit) | Err(RecvTimeoutError::Disconnected) => {
                    info!("quit requested, stopping poll loop");
                    return Ok(());
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.poll_cycle();
                    next_tick += POLL_INTERVAL;
                }
            }
        }
    }

    /// One tick: temperature first, then the CPU fan, then the GPU fan when
    /// present. A vanished sensor file sets the fallback label and the cycle
    /// continues with the next sensor.
    fn poll_cycle(&mut self) {
        self.update_temperature();
        self.update_fan(FanZone::Cpu);
        if self.paths.gpu_fan.is_some() {
            self.update_fan(FanZone::Gpu);
        }
        debug!("poll cycle complete");
    }

    /// Flips the unit, persists it, then redisplays the temperature out of
    /// band so the label changes before the next tick. The file write
    /// happens before the redisplay; if it fails the preference cannot be
    /// honored and the error propagates.
    pub fn toggle_unit(&mut self) -> Result<(), ConfigError> {
        self.preference.use_celsius = !self.preference.use_celsius;
        self.store.save(&self.preference)?;
        info!(use_celsius = self.preference.use_celsius, "temperature unit toggled");
        self.update_temperature();
        Ok(())
    }

    fn update_temperature(&mut self) {
        match read_raw(&self.paths.cpu_temp) {
            Ok(raw) => {
                self.display.status_label = format_temperature(raw, self.preference.use_celsius);
            }
            Err(ReadError::NotFound(_)) => {
                warn!(path = %self.paths.cpu_temp.display(), "temperature sensor vanished");
                self.display.status_label = FALLBACK_LABEL.to_string();
            }
            Err(err) => {
                warn!(?err, "temperature read failed, keeping previous label");
                return;
            }
        }
        self.presenter.set_status_label(&self.display.status_label);
    }

    fn update_fan(&mut self, zone: FanZone) {
        let fan = match zone {
            FanZone::Cpu => &self.paths.cpu_fan,
            FanZone::Gpu => match &self.paths.gpu_fan {
                Some(fan) => fan,
                None => return,
            },
        };

        let line = match (read_raw(&fan.rpm), read_raw(&fan.pwm)) {
            (Ok(rpm), Ok(pwm)) => format_fan_line(zone, pwm, rpm),
            (Err(ReadError::NotFound(_)), _) | (_, Err(ReadError::NotFound(_))) => {
                warn!(zone = zone.label(), "fan sensor vanished");
                FALLBACK_LABEL.to_string()
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(?err, zone = zone.label(), "fan read failed, keeping previous line");
                return;
            }
        };

        match zone {
            FanZone::Cpu => self.display.cpu_fan_line = line,
            FanZone::Gpu => self.display.gpu_fan_line = line,
        }
        let text = match zone {
            FanZone::Cpu => &self.display.cpu_fan_line,
            FanZone::Gpu => &self.display.gpu_fan_line,
        };
        self.presenter.set_menu_line(zone, text);
    }
}
