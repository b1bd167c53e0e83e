//! Naked Pineapple checkout CLI - preview the checkout widgets from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the add-on recommended for a cart
//! np-checkout recommend --cart-id gid://shopify/Cart/abc123
//!
//! # Add it, then show what is offered next
//! np-checkout add --cart-id gid://shopify/Cart/abc123 --html
//!
//! # Run the reservation countdown from 90 seconds
//! np-checkout countdown --seconds 90
//!
//! # Show the benefits grid
//! np-checkout benefits
//! ```
//!
//! Configuration is read from the environment (and `.env`); see
//! `naked_pineapple_checkout::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use naked_pineapple_checkout::TelemetryConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "np-checkout")]
#[command(author, version, about = "Naked Pineapple checkout widget preview")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the add-on currently recommended for a cart
    Recommend {
        /// Storefront cart id (`gid://shopify/Cart/...`)
        #[arg(long)]
        cart_id: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Add the recommended add-on to a cart
    Add {
        /// Storefront cart id (`gid://shopify/Cart/...`)
        #[arg(long)]
        cart_id: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run the reservation countdown banner
    Countdown {
        /// Start value in seconds (default: `CHECKOUT_COUNTDOWN_SECONDS` or 900)
        #[arg(long)]
        seconds: Option<u64>,

        /// Render as if the checkout disallowed cart attribute changes
        #[arg(long)]
        attributes_locked: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the benefits grid
    Benefits {
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// How views are printed.
#[derive(Args, Clone, Copy)]
struct OutputArgs {
    /// Print the HTML fragment
    #[arg(long, conflicts_with = "json")]
    html: bool,

    /// Print the view as JSON
    #[arg(long)]
    json: bool,
}

impl OutputArgs {
    const fn format(self) -> commands::OutputFormat {
        if self.html {
            commands::OutputFormat::Html
        } else if self.json {
            commands::OutputFormat::Json
        } else {
            commands::OutputFormat::Text
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &TelemetryConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
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

#[tokio::main]
async fn main() {
    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&TelemetryConfig::from_env());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "naked_pineapple_checkout=info,np_checkout=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Recommend { cart_id, output } => {
            commands::addon::recommend(&cart_id, output.format()).await
        }
        Commands::Add { cart_id, output } => commands::addon::add(&cart_id, output.format()).await,
        Commands::Countdown {
            seconds,
            attributes_locked,
            output,
        } => commands::countdown::run(seconds, !attributes_locked, output.format()).await,
        Commands::Benefits { output } => commands::benefits::show(output.format()).await,
    }
}
