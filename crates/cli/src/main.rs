//! TapOnn CLI - Public profiles, UPI payments and shop orders from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show a public profile and its links
//! taponn profile asha
//!
//! # Print the merchant UPI link for an amount
//! taponn pay-link --amount 1199
//!
//! # Sign in, then order the items in a cart file
//! taponn login -e asha@example.in -p hunter22
//! taponn order --cart cart.yaml --street "12 MG Road" --city Pune \
//!     --state MH --zip 411001 --country India --paid
//! ```
//!
//! # Commands
//!
//! - `profile` - Resolve a public profile and list its links
//! - `pay-link` - Build the `upi://pay` link for an amount
//! - `order` - Check out a YAML cart and submit the order
//! - `login` / `logout` / `whoami` - Manage the stored session
//! - `catalog` - List shop products
//!
//! # Environment Variables
//!
//! Client settings are read as described in `taponn_client::config`.
//! `SENTRY_DSN` and `SENTRY_ENVIRONMENT` enable error reporting.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use taponn_client::{ClientConfig, HistoryNavigator, Services, TracingNotifier};
use taponn_core::{Email, ProductCategory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "taponn")]
#[command(author, version, about = "TapOnn client tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a public profile and list its links
    Profile {
        /// Username from the profile URL
        username: String,

        /// Also record a click on the link of this type (e.g. `email`, `linkedin`)
        #[arg(long)]
        click: Option<String>,
    },
    /// Print the merchant UPI payment link for an amount
    PayLink {
        /// Amount in INR
        #[arg(short, long)]
        amount: Decimal,
    },
    /// Check out a cart file and place the order
    Order(commands::order::OrderArgs),
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: Email,

        #[arg(short, long)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Admin dashboard (uses demo data when VITE_DEMO_MODE is set and the backend is down)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// List shop products
    Catalog {
        /// Only show this category
        #[arg(short, long)]
        category: Option<CategoryArg>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Show dashboard statistics
    Stats,
    /// List database collections
    Tables,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Nfc,
    Review,
    Accessories,
}

impl From<CategoryArg> for ProductCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Nfc => Self::Nfc,
            CategoryArg::Review => Self::Review,
            CategoryArg::Accessories => Self::Accessories,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|d| !d.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "taponn_client=debug,taponn_cli=debug"
    } else {
        "taponn_client=info,taponn_cli=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Configuration is needed first to pick the log level
    let config = ClientConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry();
    init_tracing(config.as_ref().is_ok_and(|c| c.debug));

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let services = Services::open(
        config,
        Arc::new(TracingNotifier),
        Arc::new(HistoryNavigator::default()),
    )?;

    match cli.command {
        Commands::Profile { username, click } => {
            commands::profile::show(&services, &username, click.as_deref()).await?;
        }
        Commands::PayLink { amount } => commands::pay::link(&services.config, amount)?,
        Commands::Order(args) => commands::order::place(&services, &args).await?,
        Commands::Login { email, password } => {
            commands::auth::login(&services, &email, password).await?;
        }
        Commands::Logout => commands::auth::logout(&services).await,
        Commands::Whoami => commands::auth::whoami(&services).await,
        Commands::Admin { command } => match command {
            AdminCommands::Stats => commands::admin::stats(&services).await?,
            AdminCommands::Tables => commands::admin::tables(&services).await?,
        },
        Commands::Catalog { category } => commands::catalog::list(category.map(Into::into)),
    }
    Ok(())
}

