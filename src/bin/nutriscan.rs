//! NutriScan Command Line Interface
//!
//! Drives the client core against a real backend. The credential is kept in
//! a JSON file between invocations, so `login` followed by `scan` works the
//! way a browser session would.
//!
//! # Usage
//!
//! ```bash
//! nutriscan login --email admin@admin.com --password adminn
//! nutriscan scan --image label.jpg --food-name Granola --meal-type breakfast --tag healthy
//! nutriscan logs --date 2024-03-01
//! nutriscan route /dashboard
//! nutriscan logout
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tokio::sync::mpsc::UnboundedReceiver;

use nutriscan::notify::drain;
use nutriscan::validation::{self, FieldError};
use nutriscan::{
    ClientConfig, ImageBlob, MealType, Notice, NoticeLevel, NutriScanApp, RecoveryView,
    RouteDecision, SubmitOutcome, Tag,
};

#[derive(Parser)]
#[command(name = "nutriscan")]
#[command(version = "0.1.0")]
#[command(about = "NutriScan client: sign in, scan food labels, read daily logs")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML config file
    #[arg(long, short, global = true, env = "NUTRISCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the credential
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "NUTRISCAN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "NUTRISCAN_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        display_name: String,
    },

    /// Sign out and remove the stored credential
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Email password reset instructions
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Set a new password with a reset token
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long, env = "NUTRISCAN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Upload a food label photo for analysis
    Scan {
        /// PNG or JPEG file
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        food_name: String,
        /// breakfast, lunch, dinner or snack
        #[arg(long, default_value = "snack")]
        meal_type: MealType,
        /// healthy, spicy, sweet, salty or fatty (repeatable)
        #[arg(long = "tag", required = true)]
        tags: Vec<Tag>,
    },

    /// Fetch the nutrition log for a day
    Logs {
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show what the route guard does with a path
    Route { path: String },
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    nutriscan::logging::init_with_default("nutriscan=warn");
    let cli = Cli::parse();
    let format = cli.format;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = ClientConfig::from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => ClientConfig::load()?,
    };
    if config.credential.path.is_none() {
        config.credential.path = Some(default_credential_path());
    }

    let (app, mut notices) = NutriScanApp::from_config(config)?;
    let format = cli.format;

    let result = match cli.command {
        Commands::Login { email, password } => {
            check(validation::validate_login(&email, &password))?;
            let result = app.auth().login(&email, &password).await;
            print_user(&app, format);
            ensure(result.success)
        }
        Commands::Register {
            email,
            password,
            display_name,
        } => {
            check(validation::validate_register(&email, &password, &display_name))?;
            let result = app.auth().register(&email, &password, &display_name).await;
            print_user(&app, format);
            ensure(result.success)
        }
        Commands::Logout => {
            app.auth().logout();
            Ok(())
        }
        Commands::Whoami => {
            app.auth().restore().await;
            print_user(&app, format);
            Ok(())
        }
        Commands::ForgotPassword { email } => {
            check(validation::validate_forgot_password(&email))?;
            let mut recovery = app.password_recovery();
            recovery.submit(&email).await;
            ensure(recovery.view() == RecoveryView::Submitted)
        }
        Commands::ResetPassword { token, password } => {
            check(validation::validate_reset_password(&token, &password))?;
            let result = app.password_recovery().reset_password(&token, &password).await;
            ensure(result.success)
        }
        Commands::Scan {
            image,
            food_name,
            meal_type,
            tags,
        } => cmd_scan(&app, &image, food_name, meal_type, tags, format).await,
        Commands::Logs { date } => cmd_logs(&app, date, format).await,
        Commands::Route { path } => {
            match app.check_route(&path) {
                RouteDecision::Allow => println!("{} {}", "ALLOW".green(), path),
                RouteDecision::Redirect(to) => {
                    println!("{} {} -> {}", "REDIRECT".yellow(), path, to)
                }
            }
            Ok(())
        }
    };

    print_notices(&mut notices, format);
    result
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

async fn cmd_scan(
    app: &NutriScanApp,
    image: &Path,
    food_name: String,
    meal_type: MealType,
    tags: Vec<Tag>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if !app.auth().restore().await {
        bail!("Not signed in, run `nutriscan login` first");
    }

    let bytes = std::fs::read(image).with_context(|| format!("reading {}", image.display()))?;
    let file_name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let scan = app.scan();
    scan.open().await;
    scan.select_image(ImageBlob::new(file_name, "", bytes)).await?;
    scan.set_food_name(food_name).await;
    scan.set_meal_type(meal_type).await;
    for tag in tags {
        if !scan.toggle_tag(tag).await {
            // repeated on the command line; toggle it back on
            scan.toggle_tag(tag).await;
        }
    }

    let mut progress = scan.progress().subscribe();
    let ticker = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            if let Some(message) = progress.borrow_and_update().clone() {
                eprintln!("{} {}", "...".dimmed(), message);
            }
        }
    });

    let outcome = scan.submit().await;
    ticker.abort();

    match outcome? {
        SubmitOutcome::Completed { image_url, data } => {
            print_json_or(format, &serde_json::json!({ "image_url": image_url, "data": data }), || {
                println!("{} {}", "Uploaded".green(), image_url);
                if let Some(data) = &data {
                    println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
                }
            });
            Ok(())
        }
        SubmitOutcome::Skipped | SubmitOutcome::Detached => bail!("Scan was not submitted"),
    }
}

async fn cmd_logs(
    app: &NutriScanApp,
    date: Option<NaiveDate>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let result = app.nutrition().get_daily_logs(date).await;
    if !result.success {
        bail!(result.message.unwrap_or_default());
    }

    let data = result.data.unwrap_or(serde_json::Value::Null);
    print_json_or(format, &data, || {
        println!("{} {}", "Logs for".bold(), date);
        println!("{}", serde_json::to_string_pretty(&data).unwrap_or_default());
    });
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn default_credential_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".nutriscan")
        .join("credential.json")
}

fn check(result: Result<(), Vec<FieldError>>) -> anyhow::Result<()> {
    if let Err(errors) = result {
        for e in &errors {
            eprintln!("  {} {}", e.field.yellow(), e.message);
        }
        bail!("{} invalid field(s)", errors.len());
    }
    Ok(())
}

fn ensure(success: bool) -> anyhow::Result<()> {
    if success {
        Ok(())
    } else {
        bail!("request failed")
    }
}

fn print_user(app: &NutriScanApp, format: OutputFormat) {
    let session = app.session().snapshot();
    match (format, session.user()) {
        (OutputFormat::Json, user) => println!("{}", serde_json::json!({ "user": user })),
        (OutputFormat::Pretty, Some(user)) => {
            println!("{} ({}) {}", user.display_name.bold(), user.email, user.id.dimmed())
        }
        (OutputFormat::Pretty, None) => println!("{}", "Not signed in".dimmed()),
    }
}

fn print_json_or(format: OutputFormat, value: &serde_json::Value, pretty: impl FnOnce()) {
    match format {
        OutputFormat::Json => println!("{}", value),
        OutputFormat::Pretty => pretty(),
    }
}

fn print_notices(rx: &mut UnboundedReceiver<Notice>, format: OutputFormat) {
    if format == OutputFormat::Json {
        return;
    }
    for notice in drain(rx) {
        let marker = match notice.level {
            NoticeLevel::Success => "OK".green(),
            NoticeLevel::Info => "--".blue(),
            NoticeLevel::Error => "!!".red(),
        };
        eprintln!("{} {}", marker, notice.text);
    }
}
