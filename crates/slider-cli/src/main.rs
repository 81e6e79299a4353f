use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slider_core::{storage::Database, AppConfig, SliderId};

mod commands;

#[derive(Parser)]
#[command(name = "slider")]
#[command(author, version, about = "Runs and manages the slider simulation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation until interrupted
    Run,
    /// Write the effective configuration to the config file
    Init,
    /// Create a new slider
    Create {
        #[arg(short, long)]
        x: i32,
        #[arg(short, long)]
        y: i32,
        #[arg(long, default_value_t = slider_core::slider::INITIAL_SIZE)]
        size: i32,
        #[arg(long, default_value_t = slider_core::slider::INITIAL_SIZE)]
        max_travel: i32,
    },
    /// List all sliders
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one slider
    Show { id: i64 },
    /// Update fields of an existing slider (out-of-range values are ignored)
    Update {
        id: i64,
        #[command(flatten)]
        fields: UpdateFields,
    },
    /// Remove a slider
    Remove { id: i64 },
    /// Print the number of sliders
    Count,
    /// List sliders at positions FROM..TO
    Range { from: u32, to: u32 },
    /// Advance every slider without starting the scheduler
    Step {
        #[arg(short, long, default_value_t = 1)]
        ticks: u32,
    },
}

#[derive(Args)]
pub struct UpdateFields {
    #[arg(short, long)]
    pub x: Option<i32>,
    #[arg(short, long)]
    pub y: Option<i32>,
    #[arg(long)]
    pub size: Option<i32>,
    #[arg(long)]
    pub max_travel: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    pub current_travel: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    pub mvt_direction: Option<i32>,
    #[arg(long)]
    pub dir_change_count: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Some(Commands::Init) = cli.command {
        return commands::init::run(&config);
    }

    // Initialize database
    let db = Arc::new(Database::new(&config).await?);

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(db, config).await,
        Some(Commands::Init) => Ok(()),
        Some(Commands::Create {
            x,
            y,
            size,
            max_travel,
        }) => commands::create::run(&db, x, y, size, max_travel).await,
        Some(Commands::List { json }) => commands::list::run(&db, json).await,
        Some(Commands::Show { id }) => commands::list::show(&db, SliderId::new(id)).await,
        Some(Commands::Update { id, fields }) => {
            commands::update::run(&db, SliderId::new(id), fields).await
        }
        Some(Commands::Remove { id }) => commands::remove::run(&db, SliderId::new(id)).await,
        Some(Commands::Count) => commands::list::count(&db).await,
        Some(Commands::Range { from, to }) => commands::list::range(&db, from, to).await,
        Some(Commands::Step { ticks }) => commands::step::run(db, config, ticks).await,
    }
}
