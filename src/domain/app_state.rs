use super::entities::{CostBreakdown, ParameterConfig};
use super::evaluation::{calculate_costs_with_policy, EmptyJobPolicy};
use super::gcode::GcodeMetadata;
use super::validation::parse_or_zero;

/// Sanitized job inputs: grams of filament and print time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JobInputs {
    pub grams: f64,
    pub hours: f64,
    pub minutes: f64,
}

impl JobInputs {
    /// Builds inputs from raw form text. Empty, negative or non-numeric
    /// fields count as zero.
    pub fn from_fields(grams: &str, hours: &str, minutes: &str) -> Self {
        Self {
            grams: parse_or_zero(grams),
            hours: parse_or_zero(hours),
            minutes: parse_or_zero(minutes),
        }
    }

    /// Replaces mass and time with what the slicer reported. Seconds are
    /// dropped; a missing print time resets hours and minutes to zero.
    pub fn apply_metadata(&mut self, metadata: &GcodeMetadata) {
        self.grams = metadata.filament_mass_grams;
        let duration = metadata.print_duration().unwrap_or_default();
        self.hours = duration.hours as f64;
        self.minutes = duration.minutes as f64;
    }

    pub fn is_empty(&self) -> bool {
        self.grams == 0.0 && self.hours == 0.0 && self.minutes == 0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub config: ParameterConfig,
    pub job: JobInputs,
    /// Name of the last G-code file whose metadata was applied.
    pub file_name: Option<String>,
    pub policy: EmptyJobPolicy,
}

impl AppState {
    pub fn apply_persisted(&mut self, persisted: ParameterConfig) {
        self.config = persisted;
    }

    pub fn to_persisted(&self) -> ParameterConfig {
        self.config
    }

    pub fn apply_metadata(&mut self, file_name: impl Into<String>, metadata: &GcodeMetadata) {
        self.job.apply_metadata(metadata);
        self.file_name = Some(file_name.into());
    }

    pub fn breakdown(&self) -> CostBreakdown {
        calculate_costs_with_policy(
            self.job.grams,
            self.job.hours,
            self.job.minutes,
            &self.config,
            self.policy,
        )
    }
}
