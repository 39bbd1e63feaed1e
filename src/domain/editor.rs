//! Draft state for editing the parameter configuration. Values are kept as
//! the text the user typed until the draft is saved.

use std::collections::HashMap;

use thiserror::Error;

use super::entities::{AdjustmentMode, EnabledFlags, Parameter, ParameterConfig};
use super::validation::is_non_negative_number;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("{parameter} must be a non-negative number, got `{text}`")]
    InvalidValue { parameter: Parameter, text: String },
}

#[derive(Clone, Debug)]
pub struct ParameterEditor {
    drafts: HashMap<Parameter, String>,
    enabled: EnabledFlags,
    mode: AdjustmentMode,
}

impl ParameterEditor {
    pub fn new(config: &ParameterConfig) -> Self {
        let drafts = Parameter::ALL
            .into_iter()
            .map(|parameter| (parameter, config.value.get(parameter).to_string()))
            .collect();

        Self {
            drafts,
            enabled: config.enabled,
            mode: config.mode,
        }
    }

    pub fn draft(&self, parameter: Parameter) -> &str {
        self.drafts.get(&parameter).map(String::as_str).unwrap_or("")
    }

    pub fn set_value(&mut self, parameter: Parameter, text: impl Into<String>) {
        self.drafts.insert(parameter, text.into());
    }

    pub fn set_enabled(&mut self, parameter: Parameter, enabled: bool) {
        self.enabled.set(parameter, enabled);
    }

    pub fn set_mode(&mut self, mode: AdjustmentMode) {
        self.mode = mode;
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::new(&ParameterConfig::default());
    }

    /// Parameters whose draft would block saving, in display order.
    pub fn invalid_parameters(&self) -> Vec<Parameter> {
        Parameter::ALL
            .into_iter()
            .filter(|parameter| !is_non_negative_number(self.draft(*parameter)))
            .collect()
    }

    /// Builds the config the draft describes. An empty draft stores zero.
    pub fn save(&self) -> Result<ParameterConfig, EditorError> {
        let mut config = ParameterConfig {
            enabled: self.enabled,
            mode: self.mode,
            ..ParameterConfig::default()
        };

        for parameter in Parameter::ALL {
            let text = self.draft(parameter).trim();
            if !is_non_negative_number(text) {
                return Err(EditorError::InvalidValue {
                    parameter,
                    text: text.to_string(),
                });
            }
            let value = if text.is_empty() {
                0.0
            } else {
                text.parse().unwrap_or(0.0)
            };
            config.value.set(parameter, value);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_draft_saves_the_original() {
        let mut original = ParameterConfig::default();
        original.value.energy_price = 0.87;
        original.enabled.flat_fee = false;

        let editor = ParameterEditor::new(&original);
        assert_eq!(editor.save(), Ok(original));
    }

    #[test]
    fn edits_are_applied_on_save() {
        let mut editor = ParameterEditor::new(&ParameterConfig::default());
        editor.set_value(Parameter::PricePerHour, "3.5");
        editor.set_value(Parameter::FlatFee, "");
        editor.set_enabled(Parameter::PowerConsumption, false);
        editor.set_mode(AdjustmentMode::Discount);

        let config = editor.save().unwrap();
        assert_eq!(config.value.price_per_hour, 3.5);
        assert_eq!(config.value.flat_fee, 0.0);
        assert!(!config.enabled.power_consumption);
        assert_eq!(config.mode, AdjustmentMode::Discount);
    }

    #[test]
    fn invalid_draft_blocks_saving() {
        let mut editor = ParameterEditor::new(&ParameterConfig::default());
        editor.set_value(Parameter::MarkupPercent, "-5");
        editor.set_value(Parameter::EnergyPrice, "cheap");

        assert_eq!(
            editor.invalid_parameters(),
            vec![Parameter::EnergyPrice, Parameter::MarkupPercent]
        );
        assert_eq!(
            editor.save(),
            Err(EditorError::InvalidValue {
                parameter: Parameter::EnergyPrice,
                text: "cheap".to_string(),
            })
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut editor = ParameterEditor::new(&ParameterConfig::default());
        editor.set_value(Parameter::PricePerUnitMass, "9000");
        editor.set_mode(AdjustmentMode::Discount);
        editor.reset_to_defaults();

        assert_eq!(editor.save(), Ok(ParameterConfig::default()));
    }
}
