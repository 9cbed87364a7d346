//! Create an admin account, or reset the password of an existing one.
//!
//! ```text
//! ADMIN_PASSWORD=... create-admin --username ops
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_admin::config::Config;
use fleet_admin::db;
use fleet_admin::repositories::AdminUserRepository;
use fleet_admin::services::password::hash_password;

#[derive(Debug, Parser)]
#[command(name = "create-admin", about = "Provision a Geo5Lux admin user")]
struct Args {
    /// Login name
    #[arg(long, short)]
    username: String,

    /// Password; prefer the environment variable over the command line
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// Apply pending migrations first
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fleet_admin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if args.password.len() < 8 {
        return Err("password must be at least 8 characters".into());
    }

    let config = Config::from_env()?;
    let db = db::connect(&config).await?;
    if args.migrate {
        db::migrate(&db).await?;
    }

    let user = AdminUserRepository::new(&db)
        .upsert(&args.username, hash_password(&args.password)?)
        .await?;
    tracing::info!(id = user.id, username = %user.username, "Admin user saved");

    Ok(())
}
