use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AlertSettings, Config, GoalDefaults, InsightSettings, LoggingSettings, ReportSettings,
};

/// Prefix of the environment variables that override file values,
/// e.g. `TABLEFLOW__INSIGHTS__MIN_WIN_STREAK=7`.
pub const ENV_PREFIX: &str = "TABLEFLOW";

/// Loads the application configuration.
///
/// Sources are layered as built-in defaults, then the TOML file (`path`, or
/// `config.toml` in the working directory when absent; a missing file is not an
/// error), then `TABLEFLOW__*` environment variables. The result is validated
/// before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config.toml").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Parses configuration from an in-memory TOML document.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Rejects values the report calculations cannot work with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.goal.amount < Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "goal.amount must not be negative, got {}",
            config.goal.amount
        )));
    }
    if config.reports.evolution_days <= 0 {
        return Err(ConfigError::ValidationError(format!(
            "reports.evolution_days must be positive, got {}",
            config.reports.evolution_days
        )));
    }
    if config.reports.daily_results_limit == 0 {
        return Err(ConfigError::ValidationError(
            "reports.daily_results_limit must be positive".to_string(),
        ));
    }

    let insights = &config.insights;
    if insights.win_rate_threshold_pct < Decimal::ZERO
        || insights.win_rate_threshold_pct > Decimal::ONE_HUNDRED
    {
        return Err(ConfigError::ValidationError(format!(
            "insights.win_rate_threshold_pct must be between 0 and 100, got {}",
            insights.win_rate_threshold_pct
        )));
    }
    if insights.consistency_window_days <= 0 {
        return Err(ConfigError::ValidationError(format!(
            "insights.consistency_window_days must be positive, got {}",
            insights.consistency_window_days
        )));
    }

    if config.alerts.near_goal_threshold < Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "alerts.near_goal_threshold must not be negative, got {}",
            config.alerts.near_goal_threshold
        )));
    }
    if config.alerts.recent_withdrawal_days < 0 {
        return Err(ConfigError::ValidationError(format!(
            "alerts.recent_withdrawal_days must not be negative, got {}",
            config.alerts.recent_withdrawal_days
        )));
    }

    Ok(())
}
