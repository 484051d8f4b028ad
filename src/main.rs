use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use api_client::HttpBackend;
use cartella_core::constants::{
    DEFAULT_API_BASE, DEFAULT_DOSSIER_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use cartella_core::{render_text, ClientConfig, FormError, FormSession, Section};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "cartella")]
#[command(about = "Nursing evaluation form (ROG26/1.4) client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a stored nursing evaluation read-only
    View {
        /// Module entry id
        entry_id: Uuid,
    },
    /// Compile and save a new nursing evaluation
    Compile {
        /// Dossier the evaluation belongs to
        #[arg(long)]
        dossier: Uuid,
        /// JSON object of control id to value
        #[arg(long)]
        input: PathBuf,
        /// Compilation date used for prefilling (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List dossiers available for selection
    Dossiers {
        /// Filter by patient name or fiscal code
        #[arg(long)]
        search: Option<String>,
    },
    /// Validate a stored document offline
    Check {
        /// JSON file holding the `data` of a module entry
        file: PathBuf,
        #[arg(long, default_value = moduli::MODULE_CODE)]
        module_code: String,
        #[arg(long, default_value_t = moduli::SCHEMA_VERSION)]
        schema_version: u32,
    },
    /// List the form controls by section
    Fields,
}

/// Main entry point for the cartella client
///
/// # Environment Variables
/// - `CARTELLA_API_BASE`: records API base URL (default: `DEFAULT_API_BASE`)
/// - `CARTELLA_ACCESS_TOKEN`: bearer token; without it every backend operation asks for login
/// - `CARTELLA_PAGE_SIZE`: dossiers fetched for selection (default and maximum: 100)
/// - `CARTELLA_TIMEOUT_SECS`: per-request timeout (default: 30)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter(tracing_subscriber::EnvFilter::from_default_env())?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.command).await {
        match err.downcast_ref::<FormError>() {
            Some(form_err) => eprintln!("{}", form_err.user_message()),
            None => eprintln!("error: {err:#}"),
        }
        std::process::exit(1);
    }
    Ok(())
}

/// Default `info` level for every workspace crate on top of `RUST_LOG`.
fn log_filter(
    filter: tracing_subscriber::EnvFilter,
) -> anyhow::Result<tracing_subscriber::EnvFilter> {
    Ok(filter
        .add_directive("cartella=info".parse()?)
        .add_directive("api_client=info".parse()?)
        .add_directive("moduli=info".parse()?))
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Fields => {
            for schema in moduli::registry::registered() {
                println!(
                    "{} v{}: {}",
                    schema.module_code, schema.schema_version, schema.title
                );
            }
            for section in Section::ALL {
                println!("{}", section.title());
                for field in section.fields() {
                    let options = field.options();
                    if options.is_empty() {
                        println!("  {:<40} {}", field.id(), field.kind());
                    } else {
                        println!(
                            "  {:<40} {} [{}]",
                            field.id(),
                            field.kind(),
                            options.join(", ")
                        );
                    }
                }
            }
        }
        Commands::Check {
            file,
            module_code,
            schema_version,
        } => {
            let payload = read_json(&file)?;
            moduli::validate_payload(&module_code, schema_version, payload)
                .with_context(|| format!("{} is not a valid document", file.display()))?;
            println!("{}: valid {module_code} v{schema_version}", file.display());
        }
        Commands::Dossiers { search } => {
            let mut session = session(None)?;
            session.load_dossiers().await?;
            let matches = session.search_dossiers(search.as_deref().unwrap_or(""));
            if matches.is_empty() {
                println!("No dossiers found.");
            }
            for snapshot in matches {
                println!(
                    "{}  {}  {}  {}  {}",
                    snapshot.dossier.id,
                    snapshot.patient.full_name(),
                    snapshot.patient.fiscal_code.as_deref().unwrap_or("-"),
                    snapshot.dossier.care_level.as_deref().unwrap_or("-"),
                    snapshot.dossier.status_label(),
                );
            }
        }
        Commands::Compile {
            dossier,
            input,
            date,
        } => {
            let inputs = match read_json(&input)? {
                serde_json::Value::Object(map) => map,
                _ => anyhow::bail!("{} must contain a JSON object", input.display()),
            };
            let mut session = session(date)?;
            session.open_create().await?;
            session.select_dossier(dossier).await?;
            session.apply_inputs(&inputs)?;
            let entry = session.save().await?;
            println!("Valutazione salvata: {}", entry.id);
        }
        Commands::View { entry_id } => {
            let mut session = session(None)?;
            session.open_view(entry_id).await?;
            print!("{}", render_text(&session.view()));
        }
    }
    Ok(())
}

fn session(today: Option<NaiveDate>) -> anyhow::Result<FormSession<HttpBackend>> {
    let config = config_from(|key| std::env::var(key).ok())?;
    tracing::debug!(api_base = config.api_base(), "client configured");
    let backend = HttpBackend::new(&config)?;
    let session = FormSession::new(backend, config);
    Ok(match today {
        Some(day) => session.with_today(day),
        None => session,
    })
}

/// Resolve the client configuration from a variable lookup.
fn config_from(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<ClientConfig> {
    let api_base = lookup("CARTELLA_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let page_size = match lookup("CARTELLA_PAGE_SIZE") {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("CARTELLA_PAGE_SIZE is not a number: '{v}'"))?,
        None => DEFAULT_DOSSIER_PAGE_SIZE,
    };
    let timeout_secs = match lookup("CARTELLA_TIMEOUT_SECS") {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("CARTELLA_TIMEOUT_SECS is not a number: '{v}'"))?,
        None => DEFAULT_REQUEST_TIMEOUT_SECS,
    };

    Ok(ClientConfig::new(
        api_base,
        lookup("CARTELLA_ACCESS_TOKEN"),
        page_size,
        Duration::from_secs(timeout_secs),
    )?)
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}
