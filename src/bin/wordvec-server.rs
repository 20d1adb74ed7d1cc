//! wordvec Server Binary
//!
//! Serves the word-similarity HTTP API over either an in-memory embedding
//! table or the remote key-value backend.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use wordvec::{Config, HttpServer, QueryService, StoreConfig};

/// wordvec Server - Word-Embedding Similarity API
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(ArgGroup::new("backend").required(true).args(["embeddings", "kv_addr"])))]
struct Args {
    /// Bind address
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Port number
    #[arg(short, long, default_value_t = 5555)]
    port: u16,

    /// Path to a binary word2vec embeddings file (in-memory backend)
    #[arg(long)]
    embeddings: Option<PathBuf>,

    /// Address of the embedding key-value service (remote backend)
    #[arg(long)]
    kv_addr: Option<String>,

    /// Embedding dimension expected from the remote backend
    #[arg(long, default_value_t = 300)]
    dimension: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wordvec=info".parse()?))
        .init();

    let args = Args::parse();

    let store_config = if let Some(path) = args.embeddings {
        StoreConfig::Memory { path }
    } else if let Some(addr) = args.kv_addr {
        StoreConfig::Remote {
            addr,
            dimension: args.dimension,
        }
    } else {
        anyhow::bail!("either --embeddings or --kv-addr is required");
    };

    let store = store_config.build()?;
    let query = Arc::new(QueryService::new(store));

    let config = Config::default().with_bind(&args.bind).with_port(args.port);

    info!("starting wordvec server on {}:{}", args.bind, args.port);
    HttpServer::new(config, query).run().await?;

    Ok(())
}
