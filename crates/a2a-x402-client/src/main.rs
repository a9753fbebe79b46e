use a2a_x402_client::config::{AgentConfig, ConfigError};
use a2a_x402_client::{AgentError, AgentIdentity, UsdcAmount, X402Agent};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const RULE_WIDTH: usize = 60;

#[derive(Parser, Debug)]
#[command(
    name = "a2a-x402-agent",
    about = "Example agent for the A2A Marketplace x402 pay-per-request API",
    version
)]
struct Cli {
    /// Marketplace API base URL (overrides A2A_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through pricing, balance, free and premium calls.
    Demo {
        /// Also request deposit instructions for this many USDC.
        #[arg(long)]
        deposit: Option<UsdcAmount>,

        /// Also call the premium endpoints (charged against the balance).
        #[arg(long)]
        premium: bool,

        /// Premium task to view when --premium is set.
        #[arg(long, default_value_t = 1)]
        task_id: u64,
    },
    /// Show x402 pricing tiers.
    Pricing,
    /// Show the agent's prepaid and wallet balances.
    Balance,
    /// Get the approve + deposit transactions for funding the balance.
    Deposit { amount: UsdcAmount },
    /// Get the withdraw call for returning prepaid balance.
    Withdraw { amount: UsdcAmount },
    /// List tasks (free).
    Tasks,
    /// View full details of a task (requires purchased access).
    PremiumTask { task_id: u64 },
    /// Get the transaction that purchases access to a task.
    PurchaseAccess { task_id: u64 },
    /// Fetch all tasks at once (charged).
    Bulk,
    /// Fetch this agent's analytics (charged).
    Analytics,
    /// Check that the marketplace is up.
    Health,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the agent's report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = AgentConfig::from_env()?;
    if let Some(ref url) = cli.api_url {
        config = config.with_api_url(url)?;
    }

    tracing::info!("Marketplace API: {}", config.api_url);

    let identity = AgentIdentity::from_private_key(&config.private_key)?;

    let command = cli.command.unwrap_or(Command::Demo {
        deposit: None,
        premium: false,
        task_id: 1,
    });

    if matches!(command, Command::Demo { .. }) {
        print_banner();
    }

    let agent = X402Agent::new(&config.api_url, identity)?;

    match command {
        Command::Demo {
            deposit,
            premium,
            task_id,
        } => run_demo(&agent, deposit, premium, task_id).await?,
        Command::Pricing => {
            agent.get_pricing().await?;
        }
        Command::Balance => {
            agent.check_balance().await?;
        }
        Command::Deposit { amount } => {
            agent.deposit_balance(amount).await?;
        }
        Command::Withdraw { amount } => {
            agent.withdraw_balance(amount).await?;
        }
        Command::Tasks => {
            agent.list_tasks().await?;
        }
        Command::PremiumTask { task_id } => {
            agent.view_premium_task(task_id).await?;
        }
        Command::PurchaseAccess { task_id } => {
            agent.purchase_task_access(task_id).await?;
        }
        Command::Bulk => {
            agent.get_bulk_tasks().await?;
        }
        Command::Analytics => {
            agent.get_analytics().await?;
        }
        Command::Health => {
            agent.health().await?;
        }
    }

    Ok(())
}

fn print_banner() {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("🤖 A2A Marketplace - X402 Agent Example");
    println!("{}", "=".repeat(RULE_WIDTH));
}

async fn run_demo(
    agent: &X402Agent,
    deposit: Option<UsdcAmount>,
    premium: bool,
    task_id: u64,
) -> Result<(), AgentError> {
    println!("\n📍 Step 1: Check X402 Pricing");
    agent.get_pricing().await?;

    println!("\n📍 Step 2: Check Current Balance");
    agent.check_balance().await?;

    println!("\n📍 Step 3: Deposit Balance");
    match deposit {
        Some(amount) => {
            agent.deposit_balance(amount).await?;
        }
        None => println!("   Pass --deposit <USDC> to see deposit instructions"),
    }

    println!("\n📍 Step 4: List Tasks (Free)");
    agent.list_tasks().await?;

    println!("\n📍 Step 5: Try Premium Endpoints");
    println!("   These require x402 balance:");
    if premium {
        agent.get_analytics().await?;
        agent.get_bulk_tasks().await?;
        agent.view_premium_task(task_id).await?;
    } else {
        println!("   Pass --premium to call analytics, bulk tasks and a premium task");
    }

    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("✅ Example Complete!");
    println!("\n💡 Tips:");
    println!("   1. Deposit USDC for x402 payments");
    println!("   2. Premium endpoints auto-charge your balance");
    println!("   3. Receive 402 if insufficient balance");
    println!("   4. Purchase task access for detailed info");
    println!("{}", "=".repeat(RULE_WIDTH));

    Ok(())
}
