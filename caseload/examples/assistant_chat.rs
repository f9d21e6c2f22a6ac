//! Example: ingest a few documents and ask the assistant about them.
//!
//! Run with `RUST_LOG=caseload_core=debug` to see scores for each match.

use caseload::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load_or_default();
    let assistant = Assistant::from_config(&config);

    let documents = vec![
        Document::new("1", "IEP 2024", DocumentType::Plan, "Annual reading and social goals", "Sarah Wilson"),
        Document::new("2", "Speech assessment", DocumentType::Assessment, "Articulation progress", "Mike Brown"),
        Document::new("3", "Weekly note", DocumentType::Note, "Reading at home every night", "Jane Doe"),
    ];
    assistant.ingest_all(&documents).await?;
    println!("Indexed {} documents\n", assistant.count().await);

    let listed: Vec<DocumentRef> = documents.iter().map(Document::to_ref).collect();
    let reply = assistant
        .chat(&[ChatTurn::user("How is reading comprehension going?")], &listed)
        .await;

    println!("AI: {}\n", reply.display_text(&config.assistant.apology));
    for doc in &reply.relevant_docs {
        println!("  - {} ({})", doc.title, doc.doc_type);
    }

    Ok(())
}
