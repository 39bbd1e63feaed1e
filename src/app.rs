//! Command handlers: the shell that owns application state, persistence and
//! output, and calls into the pricing core.

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;
use time::OffsetDateTime;
use tracing::{debug, info};

use slicecost::domain::{
    is_non_negative_number, is_valid_minute, AdjustmentMode, AppState, EditorError,
    EmptyJobPolicy, GcodeMetadata, JobInputs, Parameter, ParameterConfig, ParameterEditor,
};
use slicecost::infra::gcode_file::{has_gcode_extension, read_gcode_metadata, GcodeLoadError};
use slicecost::ui::breakdown::{render_breakdown, render_receipt, CurrencyFormat};
use slicecost::ui::notice::{Notice, NoticeKind};
use slicecost::util::persistence::ConfigStore;

use crate::cli::{CalcArgs, DisplayArgs, ParamsCommands};

/// Input rejected by field validation before any calculation.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvalidInput(String);

/// Maps a failed command to the notice shown to the user.
pub fn failure_notice(err: &anyhow::Error) -> Notice {
    if let Some(load) = err.downcast_ref::<GcodeLoadError>() {
        Notice::from(load)
    } else if let Some(edit) = err.downcast_ref::<EditorError>() {
        Notice::new(NoticeKind::Error, edit.to_string())
    } else if let Some(input) = err.downcast_ref::<InvalidInput>() {
        Notice::new(NoticeKind::Error, input.to_string())
    } else {
        Notice::generic_failure(err)
    }
}

fn currency_format(display: &DisplayArgs) -> CurrencyFormat {
    CurrencyFormat {
        locale: display.locale,
        currency: display.currency.clone(),
    }
}

fn load_state(store: &ConfigStore) -> AppState {
    let mut state = AppState::default();
    state.apply_persisted(store.load_or_default());
    state
}

pub fn persist_user_state(store: &ConfigStore, state: &AppState) -> Result<()> {
    store.save_config(&state.to_persisted())?;
    Notice::parameters_saved().emit();
    Ok(())
}

/// Field validation, in form order. Returns the first problem found.
fn validate_fields(args: &CalcArgs) -> Option<String> {
    let checks = [
        ("grams", args.grams.as_deref(), is_non_negative_number as fn(&str) -> bool),
        ("hours", args.hours.as_deref(), is_non_negative_number),
        ("minutes", args.minutes.as_deref(), is_valid_minute),
    ];

    checks.into_iter().find_map(|(name, text, valid)| match text {
        Some(text) if !valid(text) => Some(match name {
            "minutes" => format!("minutes must be a whole number between 0 and 59, got `{text}`"),
            _ => format!("{name} must be a non-negative number, got `{text}`"),
        }),
        _ => None,
    })
}

pub async fn calc(store: &ConfigStore, args: CalcArgs) -> Result<()> {
    if let Some(problem) = validate_fields(&args) {
        return Err(InvalidInput(problem).into());
    }

    let mut state = load_state(store);
    if args.zero_when_empty {
        state.policy = EmptyJobPolicy::ZeroBreakdown;
    }

    if let Some(path) = &args.gcode {
        load_gcode_into(&mut state, path).await?.emit();
    }

    let typed = JobInputs::from_fields(
        args.grams.as_deref().unwrap_or(""),
        args.hours.as_deref().unwrap_or(""),
        args.minutes.as_deref().unwrap_or(""),
    );
    if args.grams.is_some() {
        state.job.grams = typed.grams;
    }
    if args.hours.is_some() {
        state.job.hours = typed.hours;
    }
    if args.minutes.is_some() {
        state.job.minutes = typed.minutes;
    }

    debug!(job = ?state.job, policy = ?state.policy, "calculating breakdown");
    let costs = state.breakdown();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&costs)?);
        return Ok(());
    }

    let currency = currency_format(&args.display);
    if args.receipt {
        let text = render_receipt(
            &costs,
            &state.config,
            &state.job,
            &currency,
            OffsetDateTime::now_utc(),
        )?;
        print!("{text}");
    } else {
        print!("{}", render_breakdown(&costs, &state.config, &currency));
    }
    Ok(())
}

async fn load_metadata(path: &Path) -> Result<GcodeMetadata, GcodeLoadError> {
    if !has_gcode_extension(path) {
        Notice::unexpected_extension(&display_name(path)).emit();
    }
    read_gcode_metadata(path).await
}

/// Reads `path` into the job and returns the notice confirming it.
async fn load_gcode_into(state: &mut AppState, path: &Path) -> Result<Notice> {
    let metadata = load_metadata(path).await?;
    state.apply_metadata(display_name(path), &metadata);
    let file_name = state.file_name.as_deref().unwrap_or_default();
    Ok(Notice::gcode_loaded(file_name))
}

pub async fn gcode(file: &Path, json: bool) -> Result<()> {
    let metadata = load_metadata(file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("{}", display_name(file).bold());
    println!("  Filament used: {} g", metadata.filament_mass_grams);
    let print_time = if metadata.print_time_text.is_empty() {
        "unknown"
    } else {
        metadata.print_time_text.as_str()
    };
    println!("  Print time:    {print_time}");
    Ok(())
}

pub fn params(store: &ConfigStore, action: ParamsCommands) -> Result<()> {
    let mut state = load_state(store);

    match action {
        ParamsCommands::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&state.config)?);
            } else {
                print_parameters(&state.config);
            }
            return Ok(());
        }
        ParamsCommands::Path => {
            match store.path() {
                Some(path) => println!("{}", path.display()),
                None => bail!("no config directory available on this platform"),
            }
            return Ok(());
        }
        ParamsCommands::Set { parameter, value } => {
            let mut editor = ParameterEditor::new(&state.config);
            editor.set_value(parameter, value);
            state.apply_persisted(editor.save()?);
        }
        ParamsCommands::Enable { parameter } => state.config.enabled.set(parameter, true),
        ParamsCommands::Disable { parameter } => state.config.enabled.set(parameter, false),
        ParamsCommands::Mode { mode } => state.config.mode = mode,
        ParamsCommands::Reset => {
            let mut editor = ParameterEditor::new(&state.config);
            editor.reset_to_defaults();
            state.apply_persisted(editor.save()?);
            Notice::defaults_restored().emit();
        }
    }

    info!(config = ?state.config, "updating parameter config");
    persist_user_state(store, &state)?;
    print_parameters(&state.config);
    Ok(())
}

fn print_parameters(config: &ParameterConfig) {
    for parameter in Parameter::ALL {
        let label = match (parameter, config.mode) {
            (Parameter::MarkupPercent, AdjustmentMode::Discount) => "Discount",
            _ => parameter.label(),
        };
        let value = format!("{} {}", config.value.get(parameter), parameter.unit());
        let line = format!("  {label:<20}{:>14}", value.trim_end());
        if config.enabled.get(parameter) {
            println!("{line}");
        } else {
            println!("{}", format!("{line}  (disabled)").dimmed());
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DisplayArgs;
    use slicecost::util::currency::Locale;

    fn args(grams: Option<&str>, hours: Option<&str>, minutes: Option<&str>) -> CalcArgs {
        CalcArgs {
            grams: grams.map(str::to_string),
            hours: hours.map(str::to_string),
            minutes: minutes.map(str::to_string),
            gcode: None,
            zero_when_empty: false,
            json: false,
            receipt: false,
            display: DisplayArgs {
                locale: Locale::EnUs,
                currency: "USD".to_string(),
            },
        }
    }

    #[test]
    fn valid_fields_pass() {
        assert_eq!(validate_fields(&args(Some("500"), Some("2"), Some("30"))), None);
        assert_eq!(validate_fields(&args(None, None, None)), None);
    }

    #[test]
    fn first_invalid_field_is_reported() {
        let problem = validate_fields(&args(Some("-5"), Some("x"), Some("75"))).unwrap();
        assert!(problem.starts_with("grams"));

        let problem = validate_fields(&args(Some("5"), Some("1"), Some("75"))).unwrap();
        assert!(problem.contains("between 0 and 59"));
    }

    #[test]
    fn params_edits_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("parameters.json"));

        params(
            &store,
            ParamsCommands::Set {
                parameter: Parameter::PricePerHour,
                value: "4.5".to_string(),
            },
        )
        .unwrap();
        params(
            &store,
            ParamsCommands::Disable {
                parameter: Parameter::FlatFee,
            },
        )
        .unwrap();
        params(
            &store,
            ParamsCommands::Mode {
                mode: AdjustmentMode::Discount,
            },
        )
        .unwrap();

        let config = store.load_config().unwrap();
        assert_eq!(config.value.price_per_hour, 4.5);
        assert!(!config.enabled.flat_fee);
        assert_eq!(config.mode, AdjustmentMode::Discount);

        params(&store, ParamsCommands::Reset).unwrap();
        assert_eq!(store.load_config().unwrap(), ParameterConfig::default());
    }

    #[test]
    fn invalid_value_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("parameters.json"));

        let result = params(
            &store,
            ParamsCommands::Set {
                parameter: Parameter::EnergyPrice,
                value: "-1".to_string(),
            },
        );

        let err = result.unwrap_err();
        assert!(store.load_config().is_err());
        assert!(failure_notice(&err)
            .text
            .starts_with("energyPrice must be a non-negative number"));
    }

    #[tokio::test]
    async fn loaded_gcode_is_named_in_the_notice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchy.gcode");
        std::fs::write(&path, "; filament used [g] = 42.5\n").unwrap();

        let mut state = AppState::default();
        let notice = load_gcode_into(&mut state, &path).await.unwrap();

        assert_eq!(state.file_name.as_deref(), Some("benchy.gcode"));
        assert_eq!(state.job.grams, 42.5);
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.text, "G-code metadata loaded from benchy.gcode");
    }

    #[test]
    fn failures_map_to_notices() {
        let missing = anyhow::Error::from(GcodeLoadError::MissingMetadata(
            slicecost::domain::MissingMetadataError,
        ));
        assert!(failure_notice(&missing).text.contains("no usable slicer metadata"));

        let input = anyhow::Error::from(InvalidInput("grams must be positive".to_string()));
        assert_eq!(failure_notice(&input).text, "grams must be positive");

        let other = anyhow::anyhow!("disk on fire");
        assert_eq!(failure_notice(&other).text, "Something went wrong: disk on fire");
    }
}
