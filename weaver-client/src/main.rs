//! weaver - terminal front end for Stem Weaver
//!
//! Uploads two stem archives, prints the analysis, applies any `--pick`
//! overrides and writes the mixed archive.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weaver_client::{
    ArchiveFile, HttpBackend, Notification, NotificationLevel, WeaverBackend, WorkflowStore,
};
use weaver_common::api::MIX_FILE_NAME;
use weaver_common::config;
use weaver_common::stems::Version;

/// Command-line arguments for weaver
#[derive(Parser, Debug)]
#[command(name = "weaver")]
#[command(about = "Blend the best stems of two mixes into one archive")]
#[command(version)]
struct Args {
    /// ZIP archive for version A
    #[arg(long = "a", value_name = "ZIP")]
    archive_a: PathBuf,

    /// ZIP archive for version B
    #[arg(long = "b", value_name = "ZIP")]
    archive_b: PathBuf,

    /// Override the recommended pick, e.g. --pick kick=A (repeatable)
    #[arg(long = "pick", value_name = "NAME=A|B", value_parser = parse_pick)]
    picks: Vec<(String, Version)>,

    /// Where to write the mixed archive
    #[arg(short, long, default_value = MIX_FILE_NAME)]
    out: PathBuf,

    /// Server base URL
    #[arg(short, long, env = "WEAVER_SERVER_URL")]
    server: Option<String>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, env = "WEAVER_LOG")]
    log_level: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_pick(s: &str) -> Result<(String, Version), String> {
    let (name, version) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=A|B, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("missing stem name in '{}'", s));
    }
    let version = version.parse::<Version>().map_err(|e| e.to_string())?;
    Ok((name.to_string(), version))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::config_file_path);
    let toml_config = match &config_path {
        Some(path) => config::load_toml_config(path)?,
        None => Default::default(),
    };

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| toml_config.logging.level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Stem Weaver client (weaver) v{}", env!("CARGO_PKG_VERSION"));
    let server_url = config::resolve_server_url(args.server.clone(), &toml_config);
    info!("Using server {}", server_url);

    let mut store = WorkflowStore::new(HttpBackend::new(server_url));
    run(&mut store, &args).await
}

async fn run<B: WeaverBackend>(store: &mut WorkflowStore<B>, args: &Args) -> Result<()> {
    for (version, path) in [(Version::A, &args.archive_a), (Version::B, &args.archive_b)] {
        let file = ArchiveFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let uploaded = store.set_file(version, file).await;
        report(store.drain_notifications());
        if !uploaded {
            bail!("Version {} was not accepted", version);
        }
    }

    println!("Analyzing stems...");
    let analyzed = store.start_analysis().await;
    report(store.drain_notifications());
    if !analyzed {
        bail!("Nothing to mix");
    }

    for (name, version) in &args.picks {
        if store.state().pair(name).is_none() {
            eprintln!("warning: no common stem named '{}', pick ignored", name);
        }
        store.select_stem(name, *version);
    }

    println!();
    println!("{:<24} {:>4} {:>4}  {:<11} {}", "STEM", "A", "B", "RECOMMENDED", "SELECTED");
    for pair in &store.state().stem_pairs {
        println!(
            "{:<24} {:>4} {:>4}  {:<11} {}",
            pair.name,
            pair.scores.a,
            pair.scores.b,
            pair.recommended(),
            pair.selected
        );
    }
    println!();

    let download = store.start_processing().await;
    report(store.drain_notifications());
    let Some(download) = download else {
        bail!("Mix was not created");
    };

    tokio::fs::write(&args.out, &download.bytes)
        .await
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    println!(
        "Wrote {} ({} bytes)",
        args.out.display(),
        download.bytes.len()
    );
    Ok(())
}

fn report(notifications: Vec<Notification>) {
    for note in notifications {
        match note.level {
            NotificationLevel::Success => println!("{}", note.message),
            NotificationLevel::Error => eprintln!("error: {}", note.message),
        }
    }
}
