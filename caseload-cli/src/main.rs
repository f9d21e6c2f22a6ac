use anyhow::{Context, Result};
use caseload_core::chat::{ChatService, MessageDraft};
use caseload_core::config::{Config, EmbeddingBackend};
use caseload_core::notification::NotificationCenter;
use caseload_core::{Assistant, ChatTurn, Document, DocumentRef};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "caseload")]
#[command(about = "CLI for the caseload document assistant and team services", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[arg(short, long, help = "Show debug logs")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Configuration commands")]
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    #[command(about = "Rank catalog documents by similarity to a query")]
    Search {
        query: String,

        #[arg(long, help = "JSON file containing an array of documents")]
        catalog: PathBuf,

        #[arg(short = 'k', long, help = "Number of results (defaults to retrieval.top_k)")]
        top_k: Option<usize>,
    },

    #[command(about = "Ask the assistant a question about the catalog")]
    Ask {
        question: String,

        #[arg(long, help = "JSON file containing an array of documents")]
        catalog: PathBuf,
    },

    #[command(about = "Run the chat and notification services with sample data")]
    Demo,
}

#[derive(Subcommand)]
enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show,

    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Show => show_config(&cli.config),
            ConfigCommands::Init { force } => init_config(&cli.config, force),
        },
        Commands::Search {
            query,
            catalog,
            top_k,
        } => search(&cli.config, &catalog, &query, top_k).await,
        Commands::Ask { question, catalog } => ask(&cli.config, &catalog, &question).await,
        Commands::Demo => demo().await,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "caseload_core=debug" } else { "caseload_core=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file, or the defaults if it does not exist.
fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::debug!("No config at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }
    Config::load(config_path).context("Failed to load config")
}

fn load_catalog(catalog_path: &Path) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(catalog_path)
        .with_context(|| format!("Failed to read catalog {}", catalog_path.display()))?;
    serde_json::from_str(&content).context("Failed to parse catalog")
}

/// Builds an assistant and ingests every catalog document.
async fn prepare_assistant(
    config_path: &Path,
    catalog_path: &Path,
) -> Result<(Config, Assistant, Vec<Document>)> {
    let config = load_config(config_path)?;
    let documents = load_catalog(catalog_path)?;
    let assistant = Assistant::from_config(&config);

    assistant
        .ingest_all(&documents)
        .await
        .context("Failed to ingest catalog")?;

    Ok((config, assistant, documents))
}

fn show_config(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    println!("{}", "Current Configuration:".bold().green());
    println!();
    println!("{}", "Embedding:".bold());
    match &config.embedding.backend {
        EmbeddingBackend::Random { seed } => {
            let seed = seed.map_or_else(|| "none".to_string(), |s| s.to_string());
            println!("  Backend:   {} (seed: {})", "random".cyan(), seed);
        }
        EmbeddingBackend::Ollama { base_url, model } => {
            println!("  Backend:   {} @ {}", "ollama".cyan(), base_url);
            println!("  Model:     {}", model.cyan());
        }
    }
    println!("  Dimension: {}", config.embedding.dimension);
    println!();
    println!("{}", "Retrieval:".bold());
    println!("  Top K:     {}", config.retrieval.top_k);
    println!();
    println!("{}", "Assistant:".bold());
    println!("  Reply:     {}", config.assistant.reply);
    println!("  Apology:   {}", config.assistant.apology);

    Ok(())
}

fn init_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    Config::default()
        .save(config_path)
        .context("Failed to write config file")?;

    println!(
        "{} Wrote default config to: {}",
        "✓".green().bold(),
        config_path.display().to_string().cyan()
    );
    Ok(())
}

/// Picks the number of search results, rejecting an explicit zero.
fn result_count(requested: Option<usize>, default: usize) -> Result<usize> {
    match requested {
        Some(0) => anyhow::bail!("-k must be at least 1"),
        Some(k) => Ok(k),
        None => Ok(default),
    }
}

async fn search(
    config_path: &Path,
    catalog_path: &Path,
    query: &str,
    top_k: Option<usize>,
) -> Result<()> {
    let (_, assistant, documents) = prepare_assistant(config_path, catalog_path).await?;
    let k = result_count(top_k, assistant.top_k())?;

    let ranked = assistant
        .rank(query, k)
        .await
        .context("Similarity search failed")?;

    if ranked.is_empty() {
        println!("{}", "No documents in catalog.".yellow());
        return Ok(());
    }

    println!("{} {}", "Results for:".bold().green(), query);
    println!();
    for (i, hit) in ranked.iter().enumerate() {
        let title = documents
            .iter()
            .find(|doc| doc.id == hit.document_id)
            .map(|doc| doc.title.as_str())
            .unwrap_or("<unknown>");
        println!(
            "  {}. {} {} ({:.4})",
            i + 1,
            title.bold(),
            format!("[{}]", hit.document_id).dimmed(),
            hit.score
        );
    }

    Ok(())
}

async fn ask(config_path: &Path, catalog_path: &Path, question: &str) -> Result<()> {
    let (config, assistant, documents) = prepare_assistant(config_path, catalog_path).await?;
    let listed: Vec<DocumentRef> = documents.iter().map(Document::to_ref).collect();

    let reply = assistant.chat(&[ChatTurn::user(question)], &listed).await;
    if let Some(error) = &reply.error {
        tracing::error!("Assistant error: {}", error);
    }

    println!("{} {}", "Assistant:".bold().green(), reply.display_text(&config.assistant.apology));

    if !reply.relevant_docs.is_empty() {
        println!();
        println!("{}", "Related documents:".bold());
        for doc in &reply.relevant_docs {
            println!(
                "  {} {} ({}, {})",
                "•".cyan(),
                doc.title.bold(),
                doc.doc_type,
                doc.uploaded_by
            );
        }
    }

    Ok(())
}

async fn demo() -> Result<()> {
    let chat = ChatService::with_demo_thread();
    let notifications = NotificationCenter::with_demo_notifications();
    let mut thread_updates = chat.subscribe();
    let notification_updates = notifications.subscribe();

    println!("{}", "Chat threads:".bold().green());
    for thread in thread_updates.current() {
        println!("  {} ({} messages)", thread.title.bold(), thread.messages.len());
    }

    chat.send_message(
        "1",
        MessageDraft::new("3", "Jane Doe", "Thank you both, we see it at home too!")
            .with_mention("1", "Sarah Wilson"),
    )
    .await
    .context("Failed to send demo message")?;

    if let Some(threads) = thread_updates.changed().await {
        println!();
        println!("{}", "After new message:".bold());
        for message in threads.iter().flat_map(|thread| &thread.messages) {
            println!("  {}: {}", message.sender_name.cyan(), message.content);
        }
    }

    notifications.mark_as_read("1").await;
    println!();
    println!(
        "{} ({} unread)",
        "Notifications:".bold().green(),
        notifications.unread_count().await
    );
    for notification in notification_updates.current() {
        let marker = if notification.read { " " } else { "●" };
        println!("  {} {} - {}", marker.yellow(), notification.title.bold(), notification.message);
    }

    Ok(())
}
