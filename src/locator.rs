use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const HWMON_BASE: &str = "/sys/class/hwmon";

// Marker filenames identifying the sensor endpoints we care about. The hwmon
// instance directories themselves (hwmon0, hwmon1, ...) are numbered at boot
// in no stable order, so probing for these entries is the only reliable way
// to find the right instance.
const CPU_TEMP_MARKER: &str = "temp1_input";
const CPU_FAN_RPM_MARKER: &str = "fan1_input";
const CPU_FAN_PWM_MARKER: &str = "pwm1";
const GPU_FAN_RPM_MARKER: &str = "fan2_input";
const GPU_FAN_PWM_MARKER: &str = "pwm2";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot read sensor base directory {dir}")]
    BaseUnreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no subdirectory of {dir} contains a `{marker}` entry")]
    MarkerNotFound { dir: PathBuf, marker: String },
}

/// Scans the immediate subdirectories of `base_dir` (non-recursive) and
/// returns the endpoint path for the first one containing a file named
/// `marker`.
pub fn locate(base_dir: &Path, marker: &str) -> Result<PathBuf, DiscoveryError> {
    let entries = fs::read_dir(base_dir).map_err(|source| DiscoveryError::BaseUnreadable {
        dir: base_dir.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        let candidate = entry.path().join(marker);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "located sensor endpoint");
            return Ok(candidate);
        }
    }

    Err(DiscoveryError::MarkerNotFound {
        dir: base_dir.to_path_buf(),
        marker: marker.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct FanPaths {
    pub rpm: PathBuf,
    pub pwm: PathBuf,
}

/// Sensor endpoint paths, discovered once at startup and immutable for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct SensorPaths {
    pub cpu_temp: PathBuf,
    pub cpu_fan: FanPaths,
    pub gpu_fan: Option<FanPaths>,
}

impl SensorPaths {
    /// Discovers all sensor endpoints under `base_dir`. The CPU temperature
    /// and CPU fan endpoints are mandatory; the GPU fan pair is optional and
    /// only enabled when both its RPM and PWM markers exist.
    pub fn discover(base_dir: &Path) -> Result<Self, DiscoveryError> {
        let cpu_temp = locate(base_dir, CPU_TEMP_MARKER)?;
        let cpu_fan = FanPaths {
            rpm: locate(base_dir, CPU_FAN_RPM_MARKER)?,
            pwm: locate(base_dir, CPU_FAN_PWM_MARKER)?,
        };

        let gpu_fan = match (
            locate(base_dir, GPU_FAN_RPM_MARKER),
            locate(base_dir, GPU_FAN_PWM_MARKER),
        ) {
            (Ok(rpm), Ok(pwm)) => Some(FanPaths { rpm, pwm }),
            _ => {
                info!("secondary fan sensors not found, GPU fan line disabled");
                None
            }
        };

        info!(
            cpu_temp = %cpu_temp.display(),
            cpu_fan_rpm = %cpu_fan.rpm.display(),
            gpu_fan_present = gpu_fan.is_some(),
            "discovered sensor endpoints"
        );

        Ok(Self {
            cpu_temp,
            cpu_fan,
            gpu_fan,
        })
    }
}
