use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use reposcan::{
    ChannelSink, Config, GitCliFetcher, GitHubClient, PipelineConfig, ProgressEvent,
    ScanPipeline, ScanSummary, Storage,
};

#[derive(Parser, Debug)]
#[command(name = "reposcan")]
#[command(version = "0.1.0")]
#[command(about = "Scan a GitHub account's repositories for env, port, and framework signals")]
struct Args {
    /// GitHub username whose repositories should be scanned
    #[arg(short, long)]
    username: String,

    /// Output format for the run summary (json, text)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Database path for storing results (defaults to DATABASE_PATH or reposcan.db)
    #[arg(long)]
    database: Option<String>,

    /// Scratch directory for repository workspaces (defaults to SCRATCH_DIR or tmp)
    #[arg(long)]
    scratch_dir: Option<String>,

    /// Remove workspaces of failed repositories instead of keeping them
    /// around for inspection
    #[arg(long)]
    clean_failed: bool,

    /// Skip scanning; list stored repositories using the given framework
    #[arg(long, value_name = "NAME")]
    query_framework: Option<String>,

    /// Skip scanning; list stored repositories with port references
    #[arg(long)]
    query_ports: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("reposcan=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let database = args
        .database
        .clone()
        .unwrap_or_else(|| config.database_path.clone());
    let scratch_dir = args
        .scratch_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.scratch_dir.clone());

    let storage = Storage::new(&database)?;

    // Read-only queries against a previous run's results.
    if let Some(ref framework) = args.query_framework {
        for name in storage.repositories_using_framework(framework)? {
            println!("{}", name);
        }
        return Ok(());
    }
    if args.query_ports {
        for name in storage.repositories_with_port_references()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let github = GitHubClient::new(config.github_token.as_deref())?;
    let fetcher = GitCliFetcher::new(scratch_dir);

    let pipeline_config = PipelineConfig {
        keep_failed_workspaces: !args.clean_failed && config.keep_failed_workspaces,
    };

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let renderer = tokio::spawn(render_progress(rx));

    let pipeline = ScanPipeline::new(
        github,
        fetcher,
        storage,
        ChannelSink::new(tx),
        pipeline_config,
    );

    tracing::info!("Starting scan for GitHub user: {}", args.username);
    let summary = pipeline.scan_account(&args.username).await;

    // Dropping the pipeline closes the progress channel and ends the renderer.
    drop(pipeline);
    renderer.await?;

    output_summary(&summary?, &args)?;

    Ok(())
}

async fn render_progress(mut rx: tokio::sync::mpsc::UnboundedReceiver<ProgressEvent>) {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repos")
            .unwrap()
            .progress_chars("#>-"),
    );

    while let Some(event) = rx.recv().await {
        match &event {
            ProgressEvent::RepositoriesListed { count, .. } => pb.set_length(*count as u64),
            ProgressEvent::RepositoryCompleted { .. } | ProgressEvent::RepositoryFailed { .. } => {
                pb.inc(1)
            }
            _ => {}
        }
        pb.println(event.to_string());
    }

    pb.finish_and_clear();
}

fn output_summary(summary: &ScanSummary, args: &Args) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(summary)?,
        _ => format!(
            "Repositories: {} ({} failed)\nFiles scanned: {}",
            summary.repositories, summary.repositories_failed, summary.files_scanned
        ),
    };

    println!("{}", output);
    Ok(())
}
