mod settings;
#[cfg(feature = "server")]
mod server;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use triage_reference::ReferenceRuntime;
use triage_session::{MemoryStore, SessionStore, TurnService};
use triage_types::{AnswerIn, Canonical, Profile};

use settings::Settings;

#[derive(Parser)]
#[command(name = "triage", about = "Deterministic medical pre-triage turn engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a single turn and print the resulting envelope as JSON.
    Turn {
        /// Existing session to continue; omit to start a new one.
        #[arg(long)]
        session_id: Option<Uuid>,
        message: String,
        #[arg(long, requires = "answer_value")]
        answer_canonical: Option<String>,
        #[arg(long, requires = "answer_canonical")]
        answer_value: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        pregnant: Option<bool>,
    },
    /// Serve `POST /triage/turn` over HTTP.
    #[cfg(feature = "server")]
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let settings = Settings::load();

    let runtime = Arc::new(
        ReferenceRuntime::load(&settings.data_dir, &settings.locale).map_err(|err| {
            tracing::error!(%err, "reference data failed to load, refusing to start");
            err
        })?,
    );

    let store = build_store(&settings).await?;
    let cli = Cli::parse();

    match cli.command {
        Command::Turn {
            session_id,
            message,
            answer_canonical,
            answer_value,
            age,
            pregnant,
        } => {
            let service = TurnService::new(store, runtime);
            let answer = answer_canonical.zip(answer_value).map(|(canonical, value)| AnswerIn {
                canonical: Canonical::new(canonical),
                value,
            });
            let profile = Profile {
                age,
                pregnant,
                lat: None,
                lon: None,
            };
            let envelope = service
                .handle_turn(
                    session_id,
                    &settings.locale,
                    &message,
                    answer,
                    profile,
                    Duration::from_millis(settings.turn_deadline_ms),
                )
                .await;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        #[cfg(feature = "server")]
        Command::Serve => {
            let service = Arc::new(TurnService::new(store, runtime));
            server::serve(service, &settings).await?;
        }
    }

    Ok(())
}

async fn build_store(settings: &Settings) -> anyhow::Result<Arc<dyn SessionStore>> {
    match &settings.database_url {
        #[cfg(feature = "server")]
        Some(url) => {
            tracing::info!("connecting to PostgreSQL session store");
            let pg = triage_session::PostgresSessionStore::connect(url).await?;
            pg.migrate().await?;
            tracing::info!("using PostgresSessionStore (migrations applied)");
            Ok(Arc::new(pg))
        }
        #[cfg(not(feature = "server"))]
        Some(_) => {
            tracing::warn!(
                "DATABASE_URL set but the server feature (which carries postgres support) is not enabled, using MemoryStore"
            );
            Ok(Arc::new(MemoryStore::new()))
        }
        None => {
            tracing::info!("using MemoryStore (no DATABASE_URL configured)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
