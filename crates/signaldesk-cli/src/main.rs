use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "signaldesk-cli")]
#[command(about = "signaldesk command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a one-off scan for a user and print the result as JSON.
    Scan {
        /// User to scan for.
        #[arg(long, default_value = signaldesk_db::DEMO_USER_ID)]
        user: String,
    },
    /// Seed the demo user's roster (idempotent).
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan { user } => run_scan(&user).await,
        Commands::Seed => seed().await,
    }
}

async fn run_scan(user: &str) -> anyhow::Result<()> {
    let config = signaldesk_core::load_app_config_from_env()?;
    let pool = signaldesk_db::connect_pool_from_env().await?;
    signaldesk_db::run_migrations(&pool).await?;

    let client = signaldesk_ai::ChatClient::with_base_url(
        &config.ai_api_key,
        &config.ai_model,
        config.ai_timeout_secs,
        &config.ai_base_url,
    )?;
    let scanner = signaldesk_scan::Scanner::new(pool, client, config.ai_temperature);

    let result = scanner.run_scan(user).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn seed() -> anyhow::Result<()> {
    let pool = signaldesk_db::connect_pool_from_env().await?;
    signaldesk_db::run_migrations(&pool).await?;

    let (clients, keywords) = signaldesk_db::seed_demo_data(&pool).await?;
    println!(
        "seeded demo roster for '{}': {clients} clients, {keywords} keywords",
        signaldesk_db::DEMO_USER_ID
    );
    Ok(())
}
