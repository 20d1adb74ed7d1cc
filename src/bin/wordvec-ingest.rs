//! wordvec Ingest Binary
//!
//! Populates the embedding key-value service from a binary word2vec file,
//! and verifies a previous load by reading the vocabulary back in batches.

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use wordvec::store::{word2vec, KvClient};

/// wordvec Ingest - load word2vec embeddings into the key-value service
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address of the embedding key-value service
    #[arg(long, default_value = "127.0.0.1:6380")]
    kv_addr: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write every vector from a word2vec binary file into the service
    Load {
        /// Path to the embeddings file
        file: PathBuf,
    },
    /// Read the vocabulary back and check stored payload sizes
    Verify {
        /// Path to the embeddings file
        file: PathBuf,

        /// Keys per MGET batch
        #[arg(long, default_value_t = 500)]
        batch: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wordvec=info".parse()?))
        .init();

    let args = Args::parse();

    let mut client = KvClient::connect(&args.kv_addr)
        .await
        .context("connecting to key-value service")?;

    match args.command {
        Command::Load { file } => load(&mut client, &file).await,
        Command::Verify { file, batch } => verify(&mut client, &file, batch).await,
    }
}

async fn load(client: &mut KvClient, file: &Path) -> anyhow::Result<()> {
    let parsed = word2vec::read_file(file)?;
    info!(
        words = parsed.vectors.len(),
        dimension = parsed.dimension,
        "ingesting embeddings"
    );

    let mut written = 0usize;
    for (word, vector) in &parsed.vectors {
        let mut raw = Vec::with_capacity(vector.len() * 4);
        for x in vector {
            raw.extend_from_slice(&x.to_le_bytes());
        }
        client.set(word, Bytes::from(raw)).await?;

        written += 1;
        if written % 1000 == 0 {
            info!("{} words written", written);
        }
    }

    info!("done, {} words written", written);
    Ok(())
}

async fn verify(client: &mut KvClient, file: &Path, batch: usize) -> anyhow::Result<()> {
    let parsed = word2vec::read_file(file)?;
    let expected_len = parsed.dimension * 4;
    let words: Vec<String> = parsed.vectors.keys().cloned().collect();

    let mut missing = 0usize;
    let mut mismatched = 0usize;
    let mut checked = 0usize;

    for chunk in words.chunks(batch.max(1)) {
        let values = client.mget(chunk).await?;
        for (word, value) in chunk.iter().zip(values) {
            match value {
                None => {
                    warn!(word = %word, "missing from store");
                    missing += 1;
                }
                Some(raw) if raw.len() != expected_len => {
                    warn!(word = %word, len = raw.len(), expected = expected_len, "wrong payload size");
                    mismatched += 1;
                }
                Some(_) => {}
            }
        }
        checked += chunk.len();
        info!("{} of {} words checked", checked, words.len());
    }

    if missing == 0 && mismatched == 0 {
        info!("verified {} words, all present with correct dimensions", checked);
        Ok(())
    } else {
        anyhow::bail!(
            "{} missing, {} wrong-sized of {} words",
            missing,
            mismatched,
            checked
        )
    }
}
