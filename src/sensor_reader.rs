use crate::presenter::FanZone;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum PWM duty value the fan controller accepts. Device-specific and
/// fixed, not auto-detected.
pub const MAX_FAN_PWM: i64 = 255;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("sensor file {0} no longer exists")]
    NotFound(PathBuf),
    #[error("sensor file {path} does not contain a number: {contents:?}")]
    Parse { path: PathBuf, contents: String },
    #[error("failed to read sensor file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads one sensor pseudo-file and parses its contents as a base-10
/// integer. Sensors can disappear across sleep/resume or driver reload, so
/// a vanished path is reported as its own error kind for callers to branch
/// on.
pub fn read_raw(path: &Path) -> Result<i64, ReadError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ReadError::NotFound(path.to_path_buf()),
        _ => ReadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let trimmed = contents.trim();
    trimmed.parse().map_err(|_| ReadError::Parse {
        path: path.to_path_buf(),
        contents: trimmed.to_string(),
    })
}

/// Raw hwmon temperatures are millidegrees Celsius.
pub fn celsius(raw: i64) -> f64 {
    raw as f64 / 1000.0
}

pub fn fahrenheit(raw: i64) -> f64 {
    celsius(raw) * 9.0 / 5.0 + 32.0
}

pub fn fan_percent(raw_pwm: i64, max_pwm: i64) -> i64 {
    (raw_pwm as f64 / max_pwm as f64 * 100.0).round() as i64
}

/// Formats a raw millidegree reading for the status label. Conversion stays
/// float internally; only the display rounds to whole degrees.
pub fn format_temperature(raw: i64, use_celsius: bool) -> String {
    if use_celsius {
        format!(" {:.0}°C", celsius(raw))
    } else {
        format!(" {:.0}°F", fahrenheit(raw))
    }
}

pub fn format_fan_line(zone: FanZone, raw_pwm: i64, rpm: i64) -> String {
    format!(
        "{} FAN: {}% | {} RPM",
        zone.label(),
        fan_percent(raw_pwm, MAX_FAN_PWM),
        rpm
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "fan-indicator-reader-{}-{}",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn millidegree_conversions() {
        assert_eq!(celsius(45000), 45.0);
        assert_eq!(celsius(45500), 45.5);
        assert_eq!(fahrenheit(45000), 113.0);
        assert_eq!(fahrenheit(0), 32.0);
    }

    #[test]
    fn temperature_label_in_celsius() {
        assert_eq!(format_temperature(45000, true), " 45°C");
    }

    #[test]
    fn temperature_label_in_fahrenheit() {
        assert_eq!(format_temperature(45000, false), " 113°F");
    }

    #[test]
    fn temperature_label_rounds_for_display_only() {
        assert_eq!(format_temperature(45499, true), " 45°C");
        assert_eq!(format_temperature(45501, true), " 46°C");
    }

    #[test]
    fn fan_percent_boundaries() {
        assert_eq!(fan_percent(0, MAX_FAN_PWM), 0);
        assert_eq!(fan_percent(MAX_FAN_PWM, MAX_FAN_PWM), 100);
        assert_eq!(fan_percent(128, 255), 50);
    }

    #[test]
    fn fan_line_format() {
        assert_eq!(
            format_fan_line(FanZone::Cpu, 128, 2635),
            "CPU FAN: 50% | 2635 RPM"
        );
        assert_eq!(
            format_fan_line(FanZone::Gpu, 255, 3100),
            "GPU FAN: 100% | 3100 RPM"
        );
    }

    #[test]
    fn fan_line_format_is_idempotent() {
        let first = format_fan_line(FanZone::Cpu, 128, 2635);
        let second = format_fan_line(FanZone::Cpu, 128, 2635);
        assert_eq!(first, second);
    }

    #[test]
    fn read_raw_trims_trailing_newline() {
        let path = scratch_file("newline", "45000\n");
        assert_eq!(read_raw(&path).unwrap(), 45000);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn read_raw_reports_vanished_file() {
        let path = std::env::temp_dir().join("fan-indicator-reader-vanished");
        let _ = fs::remove_file(&path);
        assert!(matches!(read_raw(&path), Err(ReadError::NotFound(_))));
    }

    #[test]
    fn read_raw_reports_non_numeric_contents() {
        let path = scratch_file("garbage", "not a number\n");
        assert!(matches!(read_raw(&path), Err(ReadError::Parse { .. })));
        fs::remove_file(&path).unwrap();
    }
}
