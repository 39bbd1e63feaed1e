//! Plain-text rendering of a cost breakdown.

use std::fmt::Write as _;

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::domain::{CostBreakdown, JobInputs, ParameterConfig};
use crate::util::currency::{format_currency, Locale};
use crate::util::version::{version_label, APP_NAME};

const LABEL_WIDTH: usize = 22;

/// Display settings for amounts.
#[derive(Clone, Debug)]
pub struct CurrencyFormat {
    pub locale: Locale,
    pub currency: String,
}

impl CurrencyFormat {
    pub fn format(&self, amount: f64) -> String {
        format_currency(amount, self.locale, &self.currency)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            locale: Locale::EnUs,
            currency: "USD".to_string(),
        }
    }
}

fn push_line(out: &mut String, label: &str, amount: &str) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{amount:>14}");
}

/// Itemized lines for the parameters that are enabled, then subtotal,
/// markup or discount, and total.
pub fn render_breakdown(
    costs: &CostBreakdown,
    config: &ParameterConfig,
    currency: &CurrencyFormat,
) -> String {
    let enabled = &config.enabled;
    let mut out = String::new();

    if enabled.price_per_unit_mass {
        push_line(&mut out, "Material cost", &currency.format(costs.material_cost));
    }
    if enabled.price_per_hour {
        push_line(&mut out, "Print time cost", &currency.format(costs.print_time_cost));
    }
    if enabled.electricity() {
        push_line(&mut out, "Electricity cost", &currency.format(costs.electricity_cost));
    }
    if enabled.flat_fee {
        push_line(&mut out, "Flat work fee", &currency.format(costs.flat_fee));
    }

    let _ = writeln!(out, "  {}", "-".repeat(LABEL_WIDTH + 14));
    push_line(&mut out, "Subtotal", &currency.format(costs.subtotal));
    if let Some(adjustment) = config.adjustment() {
        push_line(&mut out, &adjustment.label(), &currency.format(costs.markup_amount));
    }
    let _ = writeln!(out, "  {}", "=".repeat(LABEL_WIDTH + 14));
    push_line(&mut out, "Total", &currency.format(costs.total));

    out
}

/// Printable version with a header, the job details and a timestamp.
pub fn render_receipt(
    costs: &CostBreakdown,
    config: &ParameterConfig,
    job: &JobInputs,
    currency: &CurrencyFormat,
    generated_at: OffsetDateTime,
) -> Result<String, time::error::Format> {
    let mut out = String::new();
    let _ = writeln!(out, "{APP_NAME} {} - print cost estimate", version_label());
    let _ = writeln!(out);
    let _ = writeln!(out, "Job details");
    let _ = writeln!(out, "  Filament weight: {} g", job.grams);
    let _ = writeln!(out, "  Print time: {}h {}m", job.hours, job.minutes);
    let _ = writeln!(out);
    let _ = writeln!(out, "Cost details");
    out.push_str(&render_breakdown(costs, config, currency));
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated {}", generated_at.format(&Rfc3339)?);
    Ok(out)
}
