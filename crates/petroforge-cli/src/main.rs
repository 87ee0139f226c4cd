mod registry;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use petroforge_core::{TableName, redact_connection_string};
use petroforge_generate::output::write_tables_csv;
use petroforge_generate::{
    BatchSizes, DataGenerator, GenerationContext, GenerationError, OutcomeError,
};
use petroforge_pipeline::{PipelineController, PipelineError, PipelineOptions};
use petroforge_store::{PostgresStore, StoreError, TableRegistry};
use petroforge_validate::{ValidationError, render_violations, schema_for, validate_table};
use registry::{RunContext, RunOptions, init_logging, start_run, write_report};
use settings::Settings;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Settings(#[from] settings::SettingsError),
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("generation error: {0}")]
    Generation(#[from] OutcomeError),
    #[error("export error: {0}")]
    Export(#[from] GenerationError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
}

#[derive(Parser, Debug)]
#[command(name = "petroforge", version, about = "Synthetic oil & gas data pipeline")]
struct Cli {
    /// Settings file. Defaults to ./petroforge.toml when present.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Database connection string, overriding DATABASE_URL and the settings file.
    #[arg(long, global = true, value_name = "CONNECTION_STRING")]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the row count of every table.
    Status,
    /// Generate, validate and insert one batch of every table.
    Run(RunArgs),
    /// Generate and validate every table, writing CSV files instead of inserting.
    Generate(GenerateArgs),
    /// Remove every row of every table.
    Truncate(TruncateArgs),
    /// Print the column contracts of every table as JSON.
    Schema,
}

#[derive(Args, Debug, Default)]
struct SizeArgs {
    /// Wells to generate.
    #[arg(long)]
    wells: Option<usize>,
    /// Equipment units to generate.
    #[arg(long)]
    equipment: Option<usize>,
    /// Production records to generate.
    #[arg(long)]
    production: Option<usize>,
    /// Incidents to generate.
    #[arg(long)]
    incidents: Option<usize>,
    /// Seed of the random source.
    #[arg(long)]
    seed: Option<u64>,
}

impl SizeArgs {
    fn batch_sizes(&self, base: BatchSizes) -> BatchSizes {
        let mut sizes = base;
        let flags = [
            (TableName::Wells, self.wells),
            (TableName::Equipment, self.equipment),
            (TableName::Production, self.production),
            (TableName::Incidents, self.incidents),
        ];
        for (table, rows) in flags {
            if let Some(rows) = rows {
                sizes.set(table, rows);
            }
        }
        sizes
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    sizes: SizeArgs,
    /// Insert without running the schema validator.
    #[arg(long, default_value_t = false)]
    skip_validation: bool,
    /// Output directory for runs.
    #[arg(long)]
    run_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    sizes: SizeArgs,
    /// Directory receiving one CSV file per table.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct TruncateArgs {
    /// Required to actually remove rows.
    #[arg(long, default_value_t = false)]
    confirm: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        settings.database_url = Some(url);
    }

    match cli.command {
        Command::Status => {
            init_logging(None)?;
            run_status(&settings).await
        }
        Command::Run(args) => run_pipeline(settings, args).await,
        Command::Generate(args) => {
            init_logging(None)?;
            run_generate(&settings, args)
        }
        Command::Truncate(args) => {
            init_logging(None)?;
            run_truncate(&settings, args).await
        }
        Command::Schema => run_schema(),
    }
}

async fn run_status(settings: &Settings) -> Result<(), CliError> {
    let controller = PipelineController::new(connect(settings).await?, PipelineOptions::default());
    let counts = controller.check_database_status().await?;
    for (table, count) in &counts {
        println!("{table}: {count}");
    }
    println!("total: {}", counts.values().sum::<u64>());
    Ok(())
}

async fn run_pipeline(settings: Settings, args: RunArgs) -> Result<(), CliError> {
    let RunArgs {
        sizes,
        skip_validation,
        run_dir,
    } = args;

    let conn = database_url(&settings)?.to_string();
    let engine = detect_engine(&conn)?;
    let options = RunOptions {
        batch_sizes: sizes.batch_sizes(settings.batch_sizes),
        seed: sizes.seed.or(settings.seed),
        skip_validation: skip_validation || settings.skip_validation,
        generate: settings.generate.clone(),
    };

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        engine: engine.to_string(),
        run_dir: run_dir.unwrap_or_else(|| settings.run_dir.clone()),
        options: options.clone(),
        connection: redact_connection_string(&conn),
    };

    let run_paths = start_run(&run_ctx)?;
    init_logging(Some(&run_paths.logs_path))?;
    tracing::info!(
        run_id = %run_id,
        engine,
        dir = %run_paths.root.display(),
        "run started"
    );

    let store = PostgresStore::connect(&conn, TableRegistry::standard()).await?;
    store.ensure_schema().await?;

    let mut controller = PipelineController::new(
        store,
        PipelineOptions {
            run_id: Some(run_id),
            seed: options.seed,
            today: None,
            generate: options.generate,
        },
    );
    let outcome = controller
        .run_full_pipeline(Some(options.batch_sizes), options.skip_validation)
        .await;

    write_report(&run_paths, controller.execution_log())?;
    tracing::info!(path = %run_paths.report_path.display(), "execution report written");

    let log = outcome?;
    println!("{}", petroforge_pipeline::render_summary(&log));
    Ok(())
}

fn run_generate(settings: &Settings, args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs { sizes, out } = args;
    let batch = sizes.batch_sizes(settings.batch_sizes);
    let timer = Instant::now();

    let ctx = match sizes.seed.or(settings.seed) {
        Some(seed) => GenerationContext::seeded(seed, chrono::Local::now().date_naive()),
        None => GenerationContext::from_os_rng(),
    };
    let mut generator = DataGenerator::new(ctx, settings.generate.clone());
    let tables = generator.generate_all(&batch, &Default::default())?;

    let frames = tables.frames();
    if !settings.skip_validation {
        for (table, frame) in &frames {
            if let Err(err) = validate_table(*table, Some(frame)) {
                if let Some(errors) = err.schema_errors() {
                    tracing::warn!(table = table.as_str(), "{}", render_violations(errors, 10));
                }
                return Err(err.into());
            }
        }
    }

    let artifacts = write_tables_csv(&out, &frames)?;
    tracing::info!(
        dir = %out.display(),
        tables = artifacts.len(),
        duration_ms = timer.elapsed().as_millis() as u64,
        "csv export finished"
    );
    println!("{}", serde_json::to_string_pretty(&artifacts)?);
    Ok(())
}

async fn run_truncate(settings: &Settings, args: TruncateArgs) -> Result<(), CliError> {
    let controller = PipelineController::new(connect(settings).await?, PipelineOptions::default());
    if controller.truncate_all_tables(args.confirm).await? {
        println!("all tables truncated");
    } else {
        println!("nothing removed, pass --confirm to truncate");
    }
    Ok(())
}

fn run_schema() -> Result<(), CliError> {
    let schemas: Vec<_> = TableName::ALL.into_iter().map(schema_for).collect();
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}

async fn connect(settings: &Settings) -> Result<PostgresStore, CliError> {
    let conn = database_url(settings)?;
    let engine = detect_engine(conn)?;
    tracing::info!(
        engine,
        database = %redact_connection_string(conn).redacted,
        "connecting"
    );
    Ok(PostgresStore::connect(conn, TableRegistry::standard()).await?)
}

fn database_url(settings: &Settings) -> Result<&str, CliError> {
    settings.database_url.as_deref().ok_or_else(|| {
        CliError::InvalidConfig(
            "connection string is required: set --database-url, DATABASE_URL or DB_* variables"
                .to_string(),
        )
    })
}

fn detect_engine(conn: &str) -> Result<&'static str, CliError> {
    if conn.starts_with("postgres://") || conn.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(CliError::UnsupportedEngine(
            redact_connection_string(conn).redacted,
        ))
    }
}
