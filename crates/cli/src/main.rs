mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::PhasekeeperConfig;
use orchestrator::{PhaseManager, PhaseManagerConfig, SqliteStore};
use server::{create_router, state::AppState};
use sqlx::SqlitePool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PHASEKEEPER_DIR: &str = ".phasekeeper";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DB_NAME: &str = "phasekeeper.db";

#[derive(Parser)]
#[command(name = "phasekeeper")]
#[command(about = "Operational lifecycle tracking for franchise units", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and database, and seed the phase catalog
    Init,
    /// Start the HTTP API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show units per phase and status
    Status,
    /// List the phase catalog
    Phases,
}

struct Workspace {
    dir: PathBuf,
    config: PhasekeeperConfig,
}

impl Workspace {
    async fn open(cwd: &Path) -> Result<Option<Self>> {
        let dir = cwd.join(PHASEKEEPER_DIR);
        if !dir.exists() {
            return Ok(None);
        }
        let config = PhasekeeperConfig::load(&dir.join(CONFIG_FILE)).await?;
        Ok(Some(Self { dir, config }))
    }

    fn db_path(&self) -> PathBuf {
        self.dir.join(DEFAULT_DB_NAME)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => init_workspace().await,
        Some(Commands::Serve { port }) => serve(port).await,
        Some(Commands::Status) => status().await,
        Some(Commands::Phases) => phases().await,
        None => serve(cli.port).await,
    }
}

async fn open_database(db_path: &Path) -> Result<SqlitePool> {
    let database_url = format!("sqlite:{}", db_path.display());
    let pool = db::create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    Ok(pool)
}

async fn init_workspace() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let dir = cwd.join(PHASEKEEPER_DIR);

    if dir.exists() {
        println!("Already initialized at {}", dir.display());
        return Ok(());
    }

    println!("Initializing phasekeeper in {}", cwd.display());

    tokio::fs::create_dir_all(&dir).await?;

    let project_name = cwd
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("phasekeeper")
        .to_string();

    let config = PhasekeeperConfig::named(project_name.clone());
    config.save(&dir.join(CONFIG_FILE)).await?;

    let pool = open_database(&dir.join(DEFAULT_DB_NAME)).await?;
    let seeded = db::seed_phase_catalog(&pool)
        .await
        .context("Failed to seed phase catalog")?;

    println!();
    println!("Initialized phasekeeper for '{}'", project_name);
    println!();
    println!("Created:");
    println!("  {}/", PHASEKEEPER_DIR);
    println!("  ├── {}", CONFIG_FILE);
    println!("  └── {}", DEFAULT_DB_NAME);
    if seeded {
        println!();
        println!("Seeded {} lifecycle phases.", phasekeeper_core::PhaseName::all().len());
    }
    println!();
    println!("Next steps:");
    println!("  1. Run 'phasekeeper' to start the server");
    println!("  2. Open http://localhost:{}/swagger-ui", config.server.port);

    Ok(())
}

async fn serve(port: Option<u16>) -> Result<()> {
    let cwd = std::env::current_dir()?;

    let (config, db_path) = match Workspace::open(&cwd).await? {
        Some(workspace) => {
            let db_path = workspace.db_path();
            (workspace.config, db_path)
        }
        None => {
            println!("No {} directory found.", PHASEKEEPER_DIR);
            println!("Run 'phasekeeper init' first, or using default configuration.");
            println!();
            (PhasekeeperConfig::default(), cwd.join(DEFAULT_DB_NAME))
        }
    };

    init_tracing();

    let port = port.unwrap_or(config.server.port);
    tracing::info!("Database: {}", db_path.display());

    let pool = open_database(&db_path).await?;
    if db::seed_phase_catalog(&pool).await? {
        tracing::info!("Seeded empty database with the phase catalog");
    }

    let manager_config =
        PhaseManagerConfig::new().with_settle_delay_ms(config.lifecycle.settle_delay_ms);
    let state = AppState::new(pool, manager_config);
    state.spawn_event_recorder();
    prepare_manager(&state.manager).await?;

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    println!();
    println!("phasekeeper - {}", config.project.name);
    println!("════════════════════════════════════════");
    println!();
    println!("  API Server:  http://localhost:{}", port);
    println!("  Swagger UI:  http://localhost:{}/swagger-ui", port);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}

/// Checks the stored catalog, loads persisted history and clears transitions
/// a previous run left behind.
async fn prepare_manager(manager: &Arc<PhaseManager>) -> Result<()> {
    manager
        .validate_catalog()
        .await
        .context("Stored phase catalog is invalid")?;

    let loaded = manager
        .hydrate_logs()
        .await
        .context("Failed to load transition history")?;
    tracing::info!(entries = loaded, "Transition history loaded");

    let recovered = manager
        .recover_interrupted_transitions()
        .await
        .context("Failed to recover interrupted transitions")?;
    if !recovered.is_empty() {
        tracing::warn!(units = recovered.len(), "Reset units stuck in transition");
    }
    Ok(())
}

async fn load_workspace_pool() -> Result<Option<(PhasekeeperConfig, SqlitePool)>> {
    let cwd = std::env::current_dir()?;

    let Some(workspace) = Workspace::open(&cwd).await? else {
        println!("Not a phasekeeper workspace.");
        println!("Run 'phasekeeper init' to initialize.");
        return Ok(None);
    };

    let db_path = workspace.db_path();
    if !db_path.exists() {
        println!(
            "Project: {} (database not initialized)",
            workspace.config.project.name
        );
        return Ok(None);
    }

    let pool = open_database(&db_path).await?;
    Ok(Some((workspace.config, pool)))
}

async fn status() -> Result<()> {
    let Some((config, pool)) = load_workspace_pool().await? else {
        return Ok(());
    };

    let manager = PhaseManager::new(
        Arc::new(SqliteStore::new(pool.clone())),
        PhaseManagerConfig::default(),
    );
    let phases = manager.phases().await?;
    let units = manager.units().await?;
    let counts = db::UnitRepository::new(pool).count_by_status().await?;

    println!();
    println!("Project: {}", config.project.name);
    println!();

    if units.is_empty() {
        println!("No units registered yet.");
        println!();
        return Ok(());
    }

    println!("Units ({}):", units.len());
    for (status, count) in &counts {
        println!("  {:<14} {}", status.as_str(), count);
    }
    println!();

    println!("By phase:");
    for phase in &phases {
        let in_phase: Vec<_> = units
            .iter()
            .filter(|u| u.current_phase_id == Some(phase.id))
            .collect();
        if in_phase.is_empty() {
            continue;
        }
        println!("  {} ({})", phase.display_name(), in_phase.len());
        for unit in in_phase {
            let status_icon = match unit.status {
                phasekeeper_core::UnitStatus::Active => "●",
                phasekeeper_core::UnitStatus::Transitioning => "◐",
                phasekeeper_core::UnitStatus::Error => "✗",
                phasekeeper_core::UnitStatus::Inactive => "○",
            };
            println!("    {} [{}] {} - {}", status_icon, unit.code, unit.name, unit.location);
        }
    }

    let unassigned = units.iter().filter(|u| u.current_phase_id.is_none()).count();
    if unassigned > 0 {
        println!("  (no phase) ({})", unassigned);
    }
    println!();

    Ok(())
}

async fn phases() -> Result<()> {
    let Some((_, pool)) = load_workspace_pool().await? else {
        return Ok(());
    };

    let manager = PhaseManager::new(
        Arc::new(SqliteStore::new(pool.clone())),
        PhaseManagerConfig::default(),
    );
    let phases = manager.phases().await?;
    let groups = db::BehaviorGroupRepository::new(pool).find_all().await?;

    println!();
    for phase in &phases {
        let responds = groups
            .iter()
            .find(|g| g.phase_id == phase.id)
            .map(|g| if g.allowed_to_respond { "responds" } else { "silent" })
            .unwrap_or("no behavior group");
        let duration = phase
            .duration()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = if phase.is_terminal() { " (terminal)" } else { "" };

        println!(
            "  {}. {:<30} {:<12} {}{}",
            phase.order,
            phase.display_name(),
            duration,
            responds,
            marker
        );
    }
    println!();

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "phasekeeper=info,orchestrator=info,db=info,server=info,tower_http=info".into()
            }),
        )
        .init();
}
