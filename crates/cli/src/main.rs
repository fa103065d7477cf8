//! ShopX CLI - drive the client data layer from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopx products --category cat-electronics --limit 10
//! shopx product prod-aurora-watch
//!
//! # Sign in, then work with the cart
//! shopx login -e demo@shopx.app -p secret
//! shopx cart add prod-aurora-watch -q 2
//! shopx cart set prod-aurora-watch 1
//!
//! # Content pages
//! shopx cms show politica-de-retur
//! ```
//!
//! Output is pretty JSON on stdout. Session, cart, wishlist and UI
//! preferences persist under `SHOPX_STATE_DIR` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopx_client::ShopxConfig;
use shopx_client::store::ThemePreference;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "shopx")]
#[command(author, version, about = "ShopX storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive name filter
        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        offset: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show a product with its reviews
    Product { id: String },
    /// List categories
    Categories,
    /// Manage the cart of the signed-in user
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Manage the wishlist of the signed-in user
    Wishlist {
        #[command(subcommand)]
        action: WishlistCommand,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out and clear local state
    Logout,
    /// Fetch user, cart, wishlist and addresses for the signed-in user
    Context,
    /// List orders of the signed-in user
    Orders,
    /// CMS content pages
    Cms {
        #[command(subcommand)]
        action: CmsCommand,
    },
    /// List saved addresses of the signed-in user
    Addresses,
    /// Set the UI theme preference
    Theme { theme: ThemePreference },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show the server cart
    Show,
    /// Add a product
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line to an exact quantity (0 removes it)
    Set { product_id: String, quantity: u32 },
    /// Remove a product line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistCommand {
    Show,
    Add { product_id: String },
    Remove { product_id: String },
}

#[derive(Subcommand)]
enum CmsCommand {
    /// Show a page by slug
    Show { slug: String },
    /// List all pages
    List,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopxConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Warnings and errors become Sentry events, info and debug breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = ShopxConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopx_client=info,shopx_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CliError::from(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: ShopxConfig) -> Result<(), CliError> {
    let state = commands::open_state(config)?;

    match cli.command {
        Commands::Products {
            category,
            name,
            offset,
            limit,
        } => commands::catalog::products(&state, category, name, offset, limit).await,
        Commands::Product { id } => commands::catalog::product(&state, &id).await,
        Commands::Categories => commands::catalog::categories(&state).await,
        Commands::Cart { action } => match action {
            CartCommand::Show => commands::cart::show(&state).await,
            CartCommand::Add {
                product_id,
                quantity,
            } => commands::cart::add(&state, &product_id, quantity).await,
            CartCommand::Set {
                product_id,
                quantity,
            } => commands::cart::set(&state, &product_id, quantity).await,
            CartCommand::Remove { product_id } => commands::cart::remove(&state, &product_id).await,
            CartCommand::Clear => commands::cart::clear(&state).await,
        },
        Commands::Wishlist { action } => match action {
            WishlistCommand::Show => commands::wishlist::show(&state).await,
            WishlistCommand::Add { product_id } => {
                commands::wishlist::add(&state, &product_id).await
            }
            WishlistCommand::Remove { product_id } => {
                commands::wishlist::remove(&state, &product_id).await
            }
        },
        Commands::Login { email, password } => {
            commands::account::login(&state, &email, &password).await
        }
        Commands::Logout => commands::account::logout(&state).await,
        Commands::Context => commands::account::context(&state).await,
        Commands::Orders => commands::account::orders(&state).await,
        Commands::Addresses => commands::account::addresses(&state).await,
        Commands::Theme { theme } => commands::account::theme(&state, theme),
        Commands::Cms { action } => match action {
            CmsCommand::Show { slug } => commands::cms::show(&state, &slug).await,
            CmsCommand::List => commands::cms::list(&state).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add_defaults_quantity() {
        let cli = Cli::try_parse_from(["shopx", "cart", "add", "p1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartCommand::Add { quantity: 1, .. }
            })
        ));
    }

    #[test]
    fn test_parse_theme() {
        let cli = Cli::try_parse_from(["shopx", "theme", "dark"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Theme {
                theme: ThemePreference::Dark
            })
        ));
        assert!(Cli::try_parse_from(["shopx", "theme", "sepia"]).is_err());
    }
}
