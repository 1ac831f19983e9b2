//! Provisioning tool for the team presence dashboard.
//!
//! ```sh
//! # Create the table and the default team (no-op when users exist)
//! presence-admin seed
//!
//! # Add one user
//! presence-admin add-user --username test --password test123 --full-name "Test User"
//! ```

use clap::{Parser, Subcommand};
use tracing::error;

use team_presence::{
    config::DEFAULT_DATABASE_URL,
    db,
    provision::{self, SeedOutcome, DEFAULT_PASSWORD},
    telemetry,
    users::{SqliteUserRepository, Status},
};

#[derive(Parser, Debug)]
#[command(
    name = "presence-admin",
    version,
    about = "Provision users for the team presence dashboard"
)]
struct Cli {
    /// Database connection string.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the default team when the users table is empty.
    Seed,
    /// Create a single user.
    AddUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        /// 0 = Working, 1 = Working Remotely, 2 = On Vacation, 3 = Business Trip.
        #[arg(long, default_value = "0", value_parser = parse_status)]
        status: Status,
    },
}

fn parse_status(raw: &str) -> Result<Status, String> {
    raw.parse::<Status>()
        .map_err(|_| format!("invalid status {raw:?}, expected one of 0, 1, 2, 3"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init("team_presence=info");

    let pool = db::connect(&cli.database_url).await?;
    db::migrate(&pool).await?;
    let repo = SqliteUserRepository::new(pool);

    match cli.command {
        Command::Seed => match provision::seed_default_team(&repo).await? {
            SeedOutcome::Seeded(users) => {
                println!("Database seeded with {} team members:", users.len());
                for user in users {
                    println!(
                        "  {:<12} {:<18} {}",
                        user.username, user.full_name, user.status
                    );
                }
                println!("All seeded users share the password {DEFAULT_PASSWORD:?}.");
            }
            SeedOutcome::AlreadyPopulated(n) => {
                println!("Database already has {n} user(s). Skipping seed.");
            }
        },
        Command::AddUser {
            username,
            password,
            full_name,
            status,
        } => match provision::add_user(&repo, &username, &password, &full_name, status).await {
            Ok(user) => println!("Created user {} (id {}).", user.username, user.id),
            Err(e) => {
                error!(error = %e, "add-user failed");
                return Err(e);
            }
        },
    }
    Ok(())
}
