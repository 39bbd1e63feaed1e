use super::entities::{CostBreakdown, ParameterConfig};

/// What to do with a job whose mass, hours and minutes are all exactly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyJobPolicy {
    /// Treat it like any other job: the flat fee and markup still apply.
    #[default]
    ChargeFixedFees,
    /// Nothing has been entered yet, so every term is zero.
    ZeroBreakdown,
}

/// Computes the breakdown for a job, treating zero inputs as a regular job.
///
/// Inputs are expected to be sanitized (non-negative, finite); mass is in
/// grams while the configured material price is per kilogram.
pub fn calculate_costs(
    mass_grams: f64,
    hours: f64,
    minutes: f64,
    config: &ParameterConfig,
) -> CostBreakdown {
    let total_hours = hours + minutes / 60.0;
    let enabled = &config.enabled;
    let value = &config.value;

    let material_cost = if enabled.price_per_unit_mass {
        (mass_grams / 1000.0) * value.price_per_unit_mass
    } else {
        0.0
    };

    let print_time_cost = if enabled.price_per_hour {
        total_hours * value.price_per_hour
    } else {
        0.0
    };

    let electricity_cost = if enabled.electricity() {
        (value.power_consumption / 1000.0) * total_hours * value.energy_price
    } else {
        0.0
    };

    let flat_fee = if enabled.flat_fee { value.flat_fee } else { 0.0 };

    let subtotal = material_cost + print_time_cost + electricity_cost + flat_fee;

    let markup_amount = config
        .adjustment()
        .map(|adjustment| adjustment.amount(subtotal))
        .unwrap_or(0.0);

    CostBreakdown {
        material_cost,
        print_time_cost,
        electricity_cost,
        flat_fee,
        subtotal,
        markup_amount,
        total: subtotal + markup_amount,
    }
}

pub fn calculate_costs_with_policy(
    mass_grams: f64,
    hours: f64,
    minutes: f64,
    config: &ParameterConfig,
    policy: EmptyJobPolicy,
) -> CostBreakdown {
    let empty = mass_grams == 0.0 && hours == 0.0 && minutes == 0.0;
    if empty && policy == EmptyJobPolicy::ZeroBreakdown {
        return CostBreakdown::default();
    }

    calculate_costs(mass_grams, hours, minutes, config)
}
