//! Slicer metadata extraction from G-code text.
//!
//! Slicers write their summary as trailing comment lines, e.g.
//!
//! ```text
//! ; filament used [g] = 256.78
//! ; estimated printing time (normal mode) = 9d 1h 22m 4s
//! ```
//!
//! so the scan walks the file from the last line backwards and stops as soon
//! as both markers have been seen.

use std::{fmt, str::FromStr, sync::OnceLock};

use regex::{Captures, Regex};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Metadata pulled from a G-code file. A marker that was not found leaves
/// its field at `0.0` / empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcodeMetadata {
    pub filament_mass_grams: f64,
    /// Normalized as `"<hours>h <minutes>m <seconds>s"`, days folded into hours.
    pub print_time_text: String,
}

impl GcodeMetadata {
    pub fn print_duration(&self) -> Option<PrintDuration> {
        self.print_time_text.parse().ok()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("missing metadata: no filament or print time markers found")]
pub struct MissingMetadataError;

/// Print duration with days folded into hours. Minutes and seconds are kept
/// as the slicer reported them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrintDuration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl PrintDuration {
    fn from_components(caps: &Captures<'_>, first: usize) -> Option<Self> {
        let component = |offset: usize| -> Option<u64> {
            match caps.get(first + offset) {
                Some(digits) => digits.as_str().parse().ok(),
                None => Some(0),
            }
        };

        let days = component(0)?;
        let hours = component(1)?;
        let minutes = component(2)?;
        let seconds = component(3)?;

        Some(Self {
            hours: days.checked_mul(24)?.checked_add(hours)?,
            minutes,
            seconds,
        })
    }
}

impl fmt::Display for PrintDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid print duration `{0}`")]
pub struct ParseDurationError(pub String);

impl FromStr for PrintDuration {
    type Err = ParseDurationError;

    /// Parses `"217h 22m 4s"` as well as the slicer form `"9d 1h 22m 4s"`.
    /// Every component is optional but at least one must be present.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        let invalid = || ParseDurationError(input.to_string());
        if text.is_empty() {
            return Err(invalid());
        }

        let caps = duration_regex().captures(text).ok_or_else(invalid)?;
        PrintDuration::from_components(&caps, 1).ok_or_else(invalid)
    }
}

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+)d\s*)?(?:(\d+)h\s*)?(?:(\d+)m\s*)?(?:(\d+)s)?$")
            .expect("duration pattern compiles")
    })
}

fn filament_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r";\s*filament used\s*\[g\]\s*=\s*([0-9]+(?:\.[0-9]*)?|\.[0-9]+)")
            .expect("filament pattern compiles")
    })
}

fn print_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r";\s*estimated printing time \(normal mode\)\s*=\s*(?:(\d+)d\s*)?(?:(\d+)h\s*)?(?:(\d+)m\s*)?(?:(\d+)s)?",
        )
        .expect("print time pattern compiles")
    })
}

fn match_filament(line: &str) -> Option<f64> {
    let caps = filament_regex().captures(line)?;
    caps.get(1)?.as_str().parse().ok()
}

fn match_print_time(line: &str) -> Option<PrintDuration> {
    let caps = print_time_regex().captures(line)?;
    // A marker with no components carries no time.
    if (1..=4).all(|group| caps.get(group).is_none()) {
        return None;
    }
    PrintDuration::from_components(&caps, 1)
}

/// Scans `content` from the end for the filament and print time markers.
///
/// The marker closest to the end of the file wins for each field. Fails only
/// when neither marker is present.
pub fn extract_metadata(content: &str) -> Result<GcodeMetadata, MissingMetadataError> {
    let mut filament: Option<f64> = None;
    let mut print_time: Option<PrintDuration> = None;
    let mut scanned = 0_usize;

    for line in content.lines().rev() {
        scanned += 1;

        if filament.is_none() {
            filament = match_filament(line);
        }
        if print_time.is_none() {
            print_time = match_print_time(line);
        }

        if filament.is_some() && print_time.is_some() {
            break;
        }
    }

    debug!(
        scanned,
        found_filament = filament.is_some(),
        found_print_time = print_time.is_some(),
        "g-code metadata scan finished"
    );

    if filament.is_none() && print_time.is_none() {
        return Err(MissingMetadataError);
    }

    Ok(GcodeMetadata {
        filament_mass_grams: filament.unwrap_or_default(),
        print_time_text: print_time.map(|d| d.to_string()).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_days_into_hours() {
        let content = "
            ; some random gcode
            G28 X Y
            ; filament used [g] = 256.78
            ; estimated printing time (normal mode) = 9d 1h 22m 4s
            M104 S0";

        let metadata = extract_metadata(content).unwrap();
        assert_eq!(metadata.filament_mass_grams, 256.78);
        assert_eq!(metadata.print_time_text, "217h 22m 4s");
    }

    #[test]
    fn time_without_days() {
        let content = "
            ; filament used [g] = 300
            ; estimated printing time (normal mode) = 4h 51m 56s
            M84";

        let metadata = extract_metadata(content).unwrap();
        assert_eq!(metadata.filament_mass_grams, 300.0);
        assert_eq!(metadata.print_time_text, "4h 51m 56s");
    }

    #[test]
    fn missing_components_are_zero() {
        let content =
            "; estimated printing time (normal mode) = 1d 2m\n; filament used [g] = 125.4\nG0 X0 Y0";
        assert_eq!(extract_metadata(content).unwrap().print_time_text, "24h 2m 0s");

        let content = "; estimated printing time (normal mode) = 30s\n; filament used [g] = 5.6";
        let metadata = extract_metadata(content).unwrap();
        assert_eq!(metadata.print_time_text, "0h 0m 30s");
        assert_eq!(metadata.filament_mass_grams, 5.6);
    }

    #[test]
    fn marker_closest_to_the_end_wins() {
        let content = "\
; filament used [g] = 10.0
; estimated printing time (normal mode) = 1h 0m 0s
G1 X10
; filament used [g] = 42.5
; estimated printing time (normal mode) = 3d 2h 15m
";
        let metadata = extract_metadata(content).unwrap();
        assert_eq!(metadata.filament_mass_grams, 42.5);
        assert_eq!(metadata.print_time_text, "74h 15m 0s");
    }

    #[test]
    fn single_marker_is_enough() {
        let metadata = extract_metadata("G1 X0\n; filament used [g]=12").unwrap();
        assert_eq!(metadata.filament_mass_grams, 12.0);
        assert_eq!(metadata.print_time_text, "");
        assert_eq!(metadata.print_duration(), None);

        let content = "; estimated printing time (normal mode) = 2h 5m 1s\r\nM84\r\n";
        let metadata = extract_metadata(content).unwrap();
        assert_eq!(metadata.filament_mass_grams, 0.0);
        assert_eq!(
            metadata.print_duration(),
            Some(PrintDuration { hours: 2, minutes: 5, seconds: 1 })
        );
    }

    #[test]
    fn zero_filament_still_counts_as_found() {
        let content = "; filament used [g] = 0\n; estimated printing time (normal mode) = 5m";
        let metadata = extract_metadata(content).unwrap();
        assert_eq!(metadata.filament_mass_grams, 0.0);
        assert_eq!(metadata.print_time_text, "0h 5m 0s");
    }

    #[test]
    fn print_time_marker_without_components_is_ignored() {
        let content = "\
; estimated printing time (normal mode) = 1h 30m 0s
; filament used [g] = 20
; estimated printing time (normal mode) =
";
        let metadata = extract_metadata(content).unwrap();
        assert_eq!(metadata.print_time_text, "1h 30m 0s");

        let empty_only = "G28\n; estimated printing time (normal mode) = \n";
        assert_eq!(extract_metadata(empty_only), Err(MissingMetadataError));
    }

    #[test]
    fn no_markers_is_an_error() {
        assert_eq!(extract_metadata("G28\nG1 X10 Y10\n; layer 2"), Err(MissingMetadataError));
        assert_eq!(extract_metadata(""), Err(MissingMetadataError));
    }

    #[test]
    fn multi_extruder_filament_takes_first_value() {
        let metadata = extract_metadata("; filament used [g] = 12.5, 3.25").unwrap();
        assert_eq!(metadata.filament_mass_grams, 12.5);
    }

    #[test]
    fn duration_parses_both_forms() {
        assert_eq!(
            "217h 22m 4s".parse(),
            Ok(PrintDuration { hours: 217, minutes: 22, seconds: 4 })
        );
        assert_eq!(
            "9d 1h 22m 4s".parse(),
            Ok(PrintDuration { hours: 217, minutes: 22, seconds: 4 })
        );
        assert_eq!("45m".parse(), Ok(PrintDuration { hours: 0, minutes: 45, seconds: 0 }));
        assert!("".parse::<PrintDuration>().is_err());
        assert!("soon".parse::<PrintDuration>().is_err());
    }
}
