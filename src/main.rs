use std::path::PathBuf;
use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatbot_core::{ranker, AppConfig, CoreContext, CoreError, DocumentStore, UpsertOutcome};

#[derive(Parser)]
#[command(name = "chatbot-core")]
#[command(about = "Admin tool for personalization data and credential usage", long_about = None)]
struct Cli {
    /// Directory holding per-user document sets (overrides USER_DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List users that have a document set
    Users,

    /// Show all documents of a user
    Show {
        owner: String,
    },

    /// Create a user's document set with base information
    Create {
        owner: String,
        content: String,
    },

    /// Add or replace a document
    Upsert {
        owner: String,
        doc_id: String,
        content: String,
    },

    /// Delete one document
    Delete {
        owner: String,
        doc_id: String,
    },

    /// Delete a user's whole document set
    DeleteOwner {
        owner: String,
    },

    /// Keyword search within a user's documents
    Search {
        owner: String,
        query: String,

        /// Maximum number of results
        #[arg(short, default_value_t = 3)]
        k: usize,
    },

    /// Document store statistics
    Stats,

    /// Configured credentials and rate limits (usage counters are per process)
    Credentials,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "chatbot_core=info".into())
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.user_data_dir = dir;
    }

    // Opening the store does no I/O; only `credentials` needs the rotator
    let store = DocumentStore::open(&config.user_data_dir);

    match cli.command {
        Commands::Users => {
            let owners = store.list_owners();
            if owners.is_empty() {
                println!("No users found in {:?}", config.user_data_dir);
            } else {
                for owner in owners {
                    println!("  - {}", owner);
                }
            }
        }

        Commands::Show { ref owner } => {
            let docs = store.list(owner);
            println!("{} document(s) for {}:", docs.len(), owner);
            for doc in docs {
                println!("  [{}] {}", doc.doc_id(), doc.content);
            }
        }

        Commands::Create { ref owner, ref content } => match store.create(owner, content) {
            Ok(_) => println!("Created document set for {}", owner),
            Err(CoreError::AlreadyExists { .. }) => {
                println!("User {} already exists; use 'upsert' to add documents", owner);
            }
            Err(e) => return Err(e).context("Create failed"),
        },

        Commands::Upsert { ref owner, ref doc_id, ref content } => {
            let outcome = store.upsert(owner, content, doc_id).context("Upsert failed")?;
            let verb = match outcome {
                UpsertOutcome::Inserted => "Added",
                UpsertOutcome::Replaced => "Updated",
            };
            println!("{} doc {} for {}", verb, doc_id, owner);
        }

        Commands::Delete { ref owner, ref doc_id } => {
            if store.delete(owner, doc_id).context("Delete failed")? {
                println!("Deleted doc {} from {}", doc_id, owner);
            } else {
                println!("Nothing to delete: {} has no doc {}", owner, doc_id);
            }
        }

        Commands::DeleteOwner { ref owner } => match store.delete_owner(owner) {
            Ok(()) => println!("Deleted user {}", owner),
            Err(CoreError::NotFound { .. }) => println!("User {} does not exist", owner),
            Err(e) => return Err(e).context("Delete failed"),
        },

        Commands::Search { ref owner, ref query, k } => {
            let results = ranker::rank(&store, owner, query, k);
            if results.is_empty() {
                println!("No matches for {:?}", query);
            } else {
                println!("Found {} result(s):", results.len());
                for doc in results {
                    println!("  [{}] {}", doc.doc_id(), doc.content);
                }
            }
        }

        Commands::Stats => {
            let stats = store.stats();
            println!("Users:     {}", stats.owners);
            println!("Documents: {}", stats.documents);
        }

        Commands::Credentials => {
            let ctx =
                CoreContext::from_config(&config).context("Failed to initialize core context")?;
            println!(
                "Safe limit: {} of {} per window",
                ctx.rotator.safe_limit(),
                config.rotator.hard_limit
            );
            for s in ctx.rotator.stats() {
                println!("  {} ({})", s.name, s.masked);
            }
        }
    }

    Ok(())
}
