//! MarketHub CLI - Drive the storefront from a terminal.
//!
//! State is kept in `MARKETHUB_STATE_DIR` (default `.markethub`), one JSON
//! file per site and slot, so a cart built in one invocation is still there
//! in the next.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! markethub catalog
//! markethub catalog --category jewelry
//! markethub catalog --search backpack
//!
//! # Cart and wishlist
//! markethub cart add 1
//! markethub cart update 1 -1
//! markethub cart show
//! markethub wishlist toggle 3
//! markethub wishlist clear
//!
//! # Account, newsletter and checkout
//! markethub account signup -n "Ada" -e ada@example.com -p secret1
//! markethub subscribe ada@example.com
//! markethub checkout --name "Ada" --address "12 Analytical Row" --phone 555-0100
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use markethub_storefront::AppError;
use markethub_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "markethub")]
#[command(author, version, about = "MarketHub storefront in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Catalog {
        /// Only show this category (`all` for everything)
        #[arg(short, long)]
        category: Option<String>,

        /// Only show products whose title or category matches
        #[arg(short, long, conflicts_with = "category")]
        search: Option<String>,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Sign in, sign up or sign out
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Subscribe to the newsletter
    Subscribe {
        /// Email address
        email: String,
    },
    /// Place an order for the cart's contents
    Checkout {
        /// Recipient name
        #[arg(long, default_value = "")]
        name: String,

        /// Shipping address
        #[arg(long, default_value = "")]
        address: String,

        /// Contact phone number
        #[arg(long, default_value = "")]
        phone: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add { id: i32 },
    /// Change a line's quantity by DELTA (negative to decrease)
    Update {
        id: i32,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove a line
    Remove { id: i32 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Like or unlike a product
    Toggle { id: i32 },
    /// Unlike everything
    Clear,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Show the signed-in profile
    Show,
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
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

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            // Logs the underlying cause
            let notification = AppError::from(e).notification();
            #[allow(clippy::print_stderr)]
            {
                eprintln!("{notification}");
            }
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so they never mix with command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "markethub_storefront=warn,markethub=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = commands::Session::open(config)?;

    match cli.command {
        Commands::Catalog { category, search } => {
            commands::shop::catalog(&mut session, category.as_deref(), search.as_deref()).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::shop::show_cart(&session),
            CartAction::Add { id } => commands::shop::add_to_cart(&mut session, id).await?,
            CartAction::Update { id, delta } => {
                commands::shop::update_quantity(&mut session, id, delta);
            }
            CartAction::Remove { id } => commands::shop::remove_from_cart(&mut session, id),
            CartAction::Clear => session.storefront.clear_cart(),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::shop::show_wishlist(&session),
            WishlistAction::Toggle { id } => {
                commands::shop::toggle_wishlist(&mut session, id).await?;
            }
            WishlistAction::Clear => session.storefront.clear_wishlist(),
        },
        Commands::Account { action } => match action {
            AccountAction::Show => commands::account::show(&session),
            AccountAction::Login { email, password } => {
                commands::account::login(&mut session, email, password)?;
            }
            AccountAction::Signup {
                name,
                email,
                password,
            } => commands::account::signup(&mut session, name, email, password)?,
            AccountAction::Logout => commands::account::logout(&mut session),
        },
        Commands::Subscribe { email } => {
            session.storefront.subscribe_newsletter(&email)?;
        }
        Commands::Checkout {
            name,
            address,
            phone,
        } => commands::checkout::place_order(&mut session, name, address, phone).await?,
    }
    Ok(())
}
