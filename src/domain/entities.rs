use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the six independently toggleable cost factors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    PricePerUnitMass,
    PricePerHour,
    FlatFee,
    PowerConsumption,
    EnergyPrice,
    MarkupPercent,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::PricePerUnitMass,
        Parameter::PricePerHour,
        Parameter::FlatFee,
        Parameter::PowerConsumption,
        Parameter::EnergyPrice,
        Parameter::MarkupPercent,
    ];

    /// Key used in the persisted JSON layout.
    pub fn key(&self) -> &'static str {
        match self {
            Parameter::PricePerUnitMass => "pricePerUnitMass",
            Parameter::PricePerHour => "pricePerHour",
            Parameter::FlatFee => "flatFee",
            Parameter::PowerConsumption => "powerConsumption",
            Parameter::EnergyPrice => "energyPrice",
            Parameter::MarkupPercent => "markupPercent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Parameter::PricePerUnitMass => "Price per kg",
            Parameter::PricePerHour => "Price per hour",
            Parameter::FlatFee => "Flat work fee",
            Parameter::PowerConsumption => "Power consumption",
            Parameter::EnergyPrice => "Energy price",
            Parameter::MarkupPercent => "Markup",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::PricePerUnitMass => "/kg",
            Parameter::PricePerHour => "/h",
            Parameter::FlatFee => "",
            Parameter::PowerConsumption => "W",
            Parameter::EnergyPrice => "/kWh",
            Parameter::MarkupPercent => "%",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown parameter `{0}`")]
pub struct ParseParameterError(pub String);

impl FromStr for Parameter {
    type Err = ParseParameterError;

    /// Accepts the persisted camelCase key, kebab/snake case spellings and the
    /// legacy names of older configuration files (`pricePerKg`, `markup`, ...).
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "priceperunitmass" | "priceperkg" | "material" => Ok(Parameter::PricePerUnitMass),
            "priceperhour" | "hourly" => Ok(Parameter::PricePerHour),
            "flatfee" | "flatworkfee" => Ok(Parameter::FlatFee),
            "powerconsumption" | "electricityconsumption" => Ok(Parameter::PowerConsumption),
            "energyprice" | "electricityprice" => Ok(Parameter::EnergyPrice),
            "markuppercent" | "markup" | "discount" => Ok(Parameter::MarkupPercent),
            _ => Err(ParseParameterError(input.to_string())),
        }
    }
}

/// Numeric values of the six pricing parameters. Price is per kilogram,
/// power consumption is in watts, energy price is per kWh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterSet {
    #[serde(alias = "pricePerKg")]
    pub price_per_unit_mass: f64,
    pub price_per_hour: f64,
    #[serde(alias = "flatWorkFee")]
    pub flat_fee: f64,
    #[serde(alias = "electricityConsumption")]
    pub power_consumption: f64,
    #[serde(alias = "electricityPrice")]
    pub energy_price: f64,
    #[serde(alias = "markup")]
    pub markup_percent: f64,
}

impl ParameterSet {
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::PricePerUnitMass => self.price_per_unit_mass,
            Parameter::PricePerHour => self.price_per_hour,
            Parameter::FlatFee => self.flat_fee,
            Parameter::PowerConsumption => self.power_consumption,
            Parameter::EnergyPrice => self.energy_price,
            Parameter::MarkupPercent => self.markup_percent,
        }
    }

    pub fn set(&mut self, parameter: Parameter, value: f64) {
        let slot = match parameter {
            Parameter::PricePerUnitMass => &mut self.price_per_unit_mass,
            Parameter::PricePerHour => &mut self.price_per_hour,
            Parameter::FlatFee => &mut self.flat_fee,
            Parameter::PowerConsumption => &mut self.power_consumption,
            Parameter::EnergyPrice => &mut self.energy_price,
            Parameter::MarkupPercent => &mut self.markup_percent,
        };
        *slot = value;
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            price_per_unit_mass: 100.0,
            price_per_hour: 2.0,
            flat_fee: 3.0,
            power_consumption: 150.0,
            energy_price: 1.5,
            markup_percent: 20.0,
        }
    }
}

/// Per-parameter gates. A disabled parameter contributes exactly zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnabledFlags {
    #[serde(alias = "pricePerKg")]
    pub price_per_unit_mass: bool,
    pub price_per_hour: bool,
    #[serde(alias = "flatWorkFee")]
    pub flat_fee: bool,
    #[serde(alias = "electricityConsumption")]
    pub power_consumption: bool,
    #[serde(alias = "electricityPrice")]
    pub energy_price: bool,
    #[serde(alias = "markup")]
    pub markup_percent: bool,
}

impl EnabledFlags {
    pub fn all(enabled: bool) -> Self {
        Self {
            price_per_unit_mass: enabled,
            price_per_hour: enabled,
            flat_fee: enabled,
            power_consumption: enabled,
            energy_price: enabled,
            markup_percent: enabled,
        }
    }

    pub fn get(&self, parameter: Parameter) -> bool {
        match parameter {
            Parameter::PricePerUnitMass => self.price_per_unit_mass,
            Parameter::PricePerHour => self.price_per_hour,
            Parameter::FlatFee => self.flat_fee,
            Parameter::PowerConsumption => self.power_consumption,
            Parameter::EnergyPrice => self.energy_price,
            Parameter::MarkupPercent => self.markup_percent,
        }
    }

    pub fn set(&mut self, parameter: Parameter, enabled: bool) {
        let slot = match parameter {
            Parameter::PricePerUnitMass => &mut self.price_per_unit_mass,
            Parameter::PricePerHour => &mut self.price_per_hour,
            Parameter::FlatFee => &mut self.flat_fee,
            Parameter::PowerConsumption => &mut self.power_consumption,
            Parameter::EnergyPrice => &mut self.energy_price,
            Parameter::MarkupPercent => &mut self.markup_percent,
        };
        *slot = enabled;
    }

    /// Electricity needs both of its factors.
    pub fn electricity(&self) -> bool {
        self.power_consumption && self.energy_price
    }
}

impl Default for EnabledFlags {
    fn default() -> Self {
        Self::all(true)
    }
}

/// How the stored markup percentage is applied to the subtotal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdjustmentMode {
    #[default]
    Markup,
    Discount,
}

impl AdjustmentMode {
    pub fn name(&self) -> &'static str {
        match self {
            AdjustmentMode::Markup => "markup",
            AdjustmentMode::Discount => "discount",
        }
    }
}

impl fmt::Display for AdjustmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown adjustment mode `{0}` (expected `markup` or `discount`)")]
pub struct ParseAdjustmentModeError(pub String);

impl FromStr for AdjustmentMode {
    type Err = ParseAdjustmentModeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "markup" => Ok(AdjustmentMode::Markup),
            "discount" => Ok(AdjustmentMode::Discount),
            _ => Err(ParseAdjustmentModeError(input.to_string())),
        }
    }
}

/// The markup term as applied to a subtotal. The percentage itself is always
/// stored non-negative; the variant decides the sign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Adjustment {
    Markup(f64),
    Discount(f64),
}

impl Adjustment {
    pub fn percent(&self) -> f64 {
        match self {
            Adjustment::Markup(percent) | Adjustment::Discount(percent) => *percent,
        }
    }

    pub fn amount(&self, subtotal: f64) -> f64 {
        match self {
            Adjustment::Markup(percent) => subtotal * (percent / 100.0),
            Adjustment::Discount(percent) => -(subtotal * (percent / 100.0)),
        }
    }

    pub fn label(&self) -> String {
        let name = match self {
            Adjustment::Markup(_) => "Markup",
            Adjustment::Discount(_) => "Discount",
        };
        format!("{name} ({}%)", self.percent())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterConfig {
    pub enabled: EnabledFlags,
    pub value: ParameterSet,
    #[serde(rename = "useDiscount", with = "discount_flag")]
    pub mode: AdjustmentMode,
}

impl ParameterConfig {
    /// `None` when the markup parameter is disabled.
    pub fn adjustment(&self) -> Option<Adjustment> {
        if !self.enabled.markup_percent {
            return None;
        }
        let percent = self.value.markup_percent;
        Some(match self.mode {
            AdjustmentMode::Markup => Adjustment::Markup(percent),
            AdjustmentMode::Discount => Adjustment::Discount(percent),
        })
    }

    /// First parameter holding a negative or non-finite value, if any.
    pub fn first_invalid_value(&self) -> Option<Parameter> {
        Parameter::ALL.into_iter().find(|parameter| {
            let value = self.value.get(*parameter);
            !value.is_finite() || value < 0.0
        })
    }
}

/// `useDiscount` is stored as a plain boolean; `null` or absence means markup.
mod discount_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::AdjustmentMode;

    pub fn serialize<S: Serializer>(
        mode: &AdjustmentMode,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(matches!(mode, AdjustmentMode::Discount))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<AdjustmentMode, D::Error> {
        let flag = Option::<bool>::deserialize(deserializer)?.unwrap_or(false);
        Ok(if flag {
            AdjustmentMode::Discount
        } else {
            AdjustmentMode::Markup
        })
    }
}

/// Itemized result of a cost calculation. Recomputed on every change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub material_cost: f64,
    pub print_time_cost: f64,
    pub electricity_cost: f64,
    pub flat_fee: f64,
    pub subtotal: f64,
    pub markup_amount: f64,
    pub total: f64,
}
