use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pacer_core::app::Service;
use pacer_core::control::Reply;
use pacer_core::impls::{InMemoryStore, JsonFileSettings};
use pacer_core::typed::NamedTask;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod demo;

use demo::{Crawl, Hello, SimulatedFetch};

#[derive(Parser, Debug)]
#[command(name = "pacer", version, about = "Paced, pausable task worker driven by JSON commands on stdin")]
struct Cli {
    /// Settings file holding `{"service.request.interval": <ms>}`
    #[arg(long, env = "PACER_SETTINGS")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // (A) Service を組み立てる
    let store = Arc::new(InMemoryStore::new());
    let service = Arc::new(
        Service::builder()
            .register::<Hello>()?
            .register::<Crawl>()?
            .expect_tasks(&[Hello::NAME, Crawl::NAME])
            .fetch(Arc::new(SimulatedFetch::new(Duration::from_millis(50))))
            .store(store.clone())
            .build()?,
    );

    // (B) 永続化された設定があれば反映
    if let Some(path) = cli.settings {
        let settings = service.apply_settings(&JsonFileSettings::new(path)).await?;
        info!(
            request_interval_ms = settings.request_interval_ms,
            "loaded settings"
        );
    }

    // (C) 状態変化をログに流す
    let mut events = service.subscribe();
    let observer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(change) => info!(
                    original = %change.original,
                    current = %change.current,
                    "state changed"
                ),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "state observer lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    // (D) worker を起動（1 本だけ）
    let worker = service.spawn_worker()?;

    // (E) stdin から 1 行 1 コマンドを読み、返信を stdout に書く
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = service.handle_json(line);
        let encoded = serde_json::to_string(&reply)
            .unwrap_or_else(|err| format!("{}", serde_json::json!({ "error": err.to_string() })));
        if let Reply::Rejected { error } = &reply {
            warn!(%error, "rejected command");
        }
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    // (F) stdin が閉じたら終了
    info!(stored = store.snapshot().await.len(), "input closed; shutting down");
    worker.shutdown_and_join().await;
    observer.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn settings_flag_takes_a_path() {
        let cli = Cli::try_parse_from(["pacer", "--settings", "/etc/pacer.json"]).unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("/etc/pacer.json")));

        let cli = Cli::try_parse_from(["pacer", "--settings=local.json"]).unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("local.json")));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["pacer", "--interval", "5"]).is_err());
    }
}
