use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use dotenvy::dotenv;
use staybook_auth::create_access_token;
use staybook_config::JwtConfig;
use staybook_db::{
    PgAuthenticationRepository, PgBookingRepository, PgPool, connect_pool, run_expiry_sweep,
    run_migrations,
};
use staybook_models::Role;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "staybook-cli")]
#[command(about = "Staybook CLI - Administrative tools for the Staybook API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account with the given role
    CreateUser {
        /// Email address (also the token subject)
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Display name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// One of customer, hotel-manager, via-admin
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
    /// Issue an access token for an email address
    IssueToken {
        /// Email address to use as the token subject
        #[arg(short = 'e', long)]
        email: Option<String>,
    },
    /// Expire stale pending-payment bookings and stale checkouts now
    ExpireBookings,
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::CreateUser {
            email,
            username,
            role,
        } => handle_create_user(email, username, role).await,
        Commands::IssueToken { email } => handle_issue_token(email),
        Commands::ExpireBookings => handle_expire_bookings().await,
        Commands::Migrate => handle_migrate().await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn database() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    connect_pool(&database_url)
        .await
        .context("Failed to connect to database")
}

fn prompt_email(email: Option<String>) -> anyhow::Result<String> {
    match email {
        Some(email) => Ok(email),
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email"),
    }
}

fn prompt_role(role: Option<String>) -> anyhow::Result<Role> {
    if let Some(role) = role {
        return Ok(role.parse()?);
    }

    let labels: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
    let selected = Select::new()
        .with_prompt("Role")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read role")?;

    Ok(Role::ALL[selected])
}

async fn handle_create_user(
    email: Option<String>,
    username: Option<String>,
    role: Option<String>,
) -> anyhow::Result<()> {
    let email = prompt_email(email)?;
    let username = match username {
        Some(username) => username,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };
    let role = prompt_role(role)?;

    if !email.contains('@') {
        bail!("'{}' is not an email address", email);
    }

    let pool = database().await?;
    let user = PgAuthenticationRepository::new(pool)
        .create_user(&email, &username, role)
        .await?;

    println!("\n✅ User created successfully!");
    println!("   ID: {}", user.id);
    println!("   Email: {}", user.email);
    println!("   Role: {}", user.role);
    Ok(())
}

fn handle_issue_token(email: Option<String>) -> anyhow::Result<()> {
    let email = prompt_email(email)?;
    let config = JwtConfig::from_env();

    let token = create_access_token(&email, &config)
        .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))?;

    println!("{}", token);
    eprintln!("   Expires in {} seconds", config.access_token_expiry);
    Ok(())
}

async fn handle_expire_bookings() -> anyhow::Result<()> {
    let pool = database().await?;
    let repo = PgBookingRepository::new(pool);

    let report = run_expiry_sweep(&repo).await?;

    println!("\n✅ Booking expiry sweep finished");
    println!(
        "   Pending-payment bookings cancelled: {}",
        report.pending_payments_expired
    );
    println!("   Checkouts expired: {}", report.checkouts_expired);
    Ok(())
}

async fn handle_migrate() -> anyhow::Result<()> {
    let pool = database().await?;
    run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;

    println!("\n✅ Migrations applied");
    Ok(())
}
