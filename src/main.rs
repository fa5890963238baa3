use analytics::{LogFilter, MetricsEngine, Period};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use configuration::Config;
use core_types::{JournalSnapshot, Outcome};
use serde_json::json;
use std::path::PathBuf;

mod render;

/// The main entry point for the Tableflow trading journal.
fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    // Held until exit so that a configured log file is flushed.
    let _log_guard = configuration::init_tracing(&config.logging)?;

    let as_of = cli.as_of.unwrap_or_else(Utc::now);
    let raw = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("Failed to read snapshot `{}`", cli.snapshot.display()))?;
    let snapshot = JournalSnapshot::from_json_str(&raw, &config.goal.to_goal())
        .with_context(|| format!("Failed to parse snapshot `{}`", cli.snapshot.display()))?;
    let engine =
        MetricsEngine::with_settings(as_of, config.insights.clone(), config.alerts.clone())?;

    tracing::info!(
        %as_of,
        snapshot = %cli.snapshot.display(),
        accounts = snapshot.accounts.len(),
        logs = snapshot.logs.len(),
        withdrawals = snapshot.withdrawals.len(),
        "Journal loaded."
    );

    let app = App {
        engine,
        snapshot,
        config,
        json: cli.json,
    };

    // Execute the appropriate command
    match cli.command {
        Commands::Performance => handle_performance(&app),
        Commands::Account(args) => handle_account(&app, args),
        Commands::Goals => handle_goals(&app),
        Commands::Withdrawals(args) => handle_withdrawals(&app, args),
        Commands::Evolution(args) => handle_evolution(&app, args),
        Commands::Dashboard => handle_dashboard(&app),
        Commands::Journal(args) => handle_journal(&app, args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Reports over a trading journal snapshot.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path of the configuration file (defaults to `config.toml` when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference instant for "days ago" calculations (RFC 3339 or YYYY-MM-DD).
    /// Defaults to now.
    #[arg(long, global = true, value_parser = parse_as_of)]
    as_of: Option<DateTime<Utc>>,

    /// The journal snapshot (JSON) to report on.
    #[arg(long, global = true, default_value = "journal.json")]
    snapshot: PathBuf,

    /// Print the report as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Global performance, streaks and insights.
    Performance,
    /// Statistics of a single account.
    Account(AccountArgs),
    /// Global goal progress, forecast and per-account progress.
    Goals,
    /// Withdrawal totals with a monthly breakdown.
    Withdrawals(WithdrawalArgs),
    /// Cumulative result over the most recent days.
    Evolution(EvolutionArgs),
    /// Account counts, balances and alerts.
    Dashboard,
    /// The daily log, filtered and optionally grouped.
    Journal(JournalArgs),
}

#[derive(Parser)]
struct AccountArgs {
    /// The account id.
    #[arg(long)]
    id: String,
}

#[derive(Parser)]
struct WithdrawalArgs {
    /// Only include withdrawals of this account.
    #[arg(long)]
    account: Option<String>,
}

#[derive(Parser)]
struct EvolutionArgs {
    /// Lookback window in days (defaults to the configured window).
    #[arg(long)]
    days: Option<i64>,
}

#[derive(Parser)]
struct JournalArgs {
    /// Only include entries of this account.
    #[arg(long)]
    account: Option<String>,

    /// Only include `positive` or `negative` days.
    #[arg(long)]
    outcome: Option<Outcome>,

    /// Only include dates containing this text (matched against YYYY-MM-DD).
    #[arg(long)]
    date: Option<String>,

    /// Group the filtered entries by `day`, `week` or `month`.
    #[arg(long)]
    group: Option<Period>,
}

fn parse_as_of(raw: &str) -> Result<DateTime<Utc>, String> {
    core_types::parse_timestamp(raw).map_err(|e| e.to_string())
}

// ==============================================================================
// Command Logic
// ==============================================================================

struct App {
    engine: MetricsEngine,
    snapshot: JournalSnapshot,
    config: Config,
    json: bool,
}

impl App {
    fn print_json(&self, value: serde_json::Value) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    }
}

fn handle_performance(app: &App) -> Result<()> {
    let snap = &app.snapshot;
    let performance = app
        .engine
        .performance_metrics(&snap.accounts, &snap.logs, &snap.withdrawals);
    let streaks = app.engine.streaks(&snap.logs);
    let insights = app.engine.insights(&snap.logs);
    let daily = app
        .engine
        .daily_results(&snap.logs, app.config.reports.daily_results_limit);

    if app.json {
        return app.print_json(json!({
            "performance": performance,
            "streaks": streaks,
            "insights": insights,
            "daily_results": daily,
        }));
    }

    println!("{}", render::performance(&performance, &streaks));
    println!("\nRecent days");
    println!("{}", render::daily_results(&daily));
    if !insights.is_empty() {
        println!("\nInsights");
        println!("{}", render::insights(&insights));
    }
    Ok(())
}

fn handle_account(app: &App, args: AccountArgs) -> Result<()> {
    let snap = &app.snapshot;
    let name = render::account_label(&snap.accounts, &args.id);
    if snap.find_account(&args.id).is_none() {
        tracing::warn!(account_id = %args.id, "Account not found; reporting its orphaned records.");
    }

    let metrics = app.engine.account_metrics(&args.id, &snap.logs);
    let balance = app
        .engine
        .available_balance(&args.id, &snap.logs, &snap.withdrawals);
    let goal = app
        .engine
        .account_goal_summary(&args.id, &snap.goal, &snap.accounts, &snap.logs);

    if app.json {
        return app.print_json(json!({
            "account_name": name,
            "metrics": metrics,
            "available_balance": balance,
            "goal": goal,
        }));
    }

    println!("{}", render::account(name, &metrics, balance, &goal));
    Ok(())
}

fn handle_goals(app: &App) -> Result<()> {
    let snap = &app.snapshot;
    let forecast = app
        .engine
        .goal_forecast(&snap.goal, &snap.logs, &snap.withdrawals);
    let progress = app
        .engine
        .account_goal_progress(&snap.goal, &snap.accounts, &snap.logs);

    if app.json {
        return app.print_json(json!({
            "goal": snap.goal,
            "forecast": forecast,
            "accounts": progress,
        }));
    }

    println!("{} ({})", snap.goal.name, render::money(snap.goal.amount));
    println!("{}", render::forecast(&forecast));
    println!(
        "\nAccounts: {} completed, {} in progress",
        progress.completed, progress.in_progress
    );
    println!("{}", render::goal_progress(&progress.accounts));
    Ok(())
}

fn handle_withdrawals(app: &App, args: WithdrawalArgs) -> Result<()> {
    let snap = &app.snapshot;
    let account_id = args.account.as_deref();
    let summary = app
        .engine
        .withdrawal_summary(&snap.goal, &snap.withdrawals, account_id);

    if app.json {
        return app.print_json(json!(summary));
    }

    let selected: Vec<_> = snap
        .withdrawals
        .iter()
        .filter(|w| account_id.is_none_or(|id| w.account_id == id))
        .cloned()
        .collect();

    println!("{}", render::withdrawals(&summary, &selected, &snap.accounts));
    println!("\nGoal progress: {}", render::percent(summary.goal_progress));
    println!("{}", render::monthly_withdrawals(&summary));
    Ok(())
}

fn handle_evolution(app: &App, args: EvolutionArgs) -> Result<()> {
    let days = args.days.unwrap_or(app.config.reports.evolution_days);
    anyhow::ensure!(days > 0, "--days must be positive, got {days}");

    let points: Vec<_> = app.engine.evolution(&app.snapshot.logs, days).collect();

    if app.json {
        return app.print_json(json!(points));
    }

    println!("{}", render::evolution(&points));
    Ok(())
}

fn handle_dashboard(app: &App) -> Result<()> {
    let snap = &app.snapshot;
    let summary = app
        .engine
        .dashboard_summary(&snap.accounts, &snap.logs, &snap.withdrawals);
    let alerts = app
        .engine
        .alerts(&snap.goal, &snap.accounts, &snap.withdrawals);

    if app.json {
        return app.print_json(json!({
            "summary": summary,
            "alerts": alerts,
        }));
    }

    println!("{}", render::dashboard(&summary));
    println!("{}", render::alerts(&alerts));
    Ok(())
}

fn handle_journal(app: &App, args: JournalArgs) -> Result<()> {
    let snap = &app.snapshot;
    let filter = LogFilter {
        account_id: args.account,
        outcome: args.outcome,
        date_contains: args.date,
    };
    let logs = app.engine.filter_logs(&snap.logs, &filter);

    match args.group {
        Some(period) => {
            let buckets = app.engine.group_by_period(&logs, period);
            if app.json {
                return app.print_json(json!(buckets));
            }
            println!("{}", render::buckets(&buckets));
        }
        None => {
            if app.json {
                return app.print_json(json!(logs));
            }
            println!("{}", render::journal(&logs, &snap.accounts));
        }
    }
    Ok(())
}
