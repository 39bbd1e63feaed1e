//! Pricing logic for print jobs lives here.

pub mod app_state;
pub mod editor;
pub mod entities;
pub mod evaluation;
pub mod gcode;
pub mod validation;

pub use app_state::{AppState, JobInputs};
pub use editor::{EditorError, ParameterEditor};
pub use entities::{
    Adjustment, AdjustmentMode, CostBreakdown, EnabledFlags, Parameter, ParameterConfig,
    ParameterSet, ParseAdjustmentModeError, ParseParameterError,
};
pub use evaluation::{calculate_costs, calculate_costs_with_policy, EmptyJobPolicy};
pub use gcode::{
    extract_metadata, GcodeMetadata, MissingMetadataError, ParseDurationError, PrintDuration,
};
pub use validation::{is_non_negative_number, is_valid_minute, parse_or_zero};
