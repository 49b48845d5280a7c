use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use twinwatch::{
    DataSource, FileSource, JsonLinesSink, MemorySink, Monitor, NotificationSink, Settings,
    WatermarkScope,
};

#[derive(Parser, Debug)]
#[command(name = "twinwatch")]
#[command(about = "Delay and crash detection for wireless device telemetry")]
struct Args {
    /// Path to the JSON Lines message log to follow
    #[arg(short, long, default_value = "messages.jsonl")]
    file: PathBuf,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append notifications to this JSON Lines file instead of stdout
    #[arg(short, long, conflicts_with = "export")]
    output: Option<PathBuf>,

    /// Poll interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Delay threshold in milliseconds
    #[arg(long)]
    delay_threshold: Option<i64>,

    /// Keep a separate delay watermark per device
    #[arg(long)]
    per_device_watermark: bool,

    /// Analyze what is currently in the file once and exit
    #[arg(long)]
    once: bool,

    /// Analyze the file once and write a JSON report to this path
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Apply explicit CLI overrides on top of loaded settings.
    fn merge_into(&self, settings: &mut Settings) {
        if let Some(threshold) = self.delay_threshold {
            settings.delay_threshold_ms = threshold;
        }
        if let Some(refresh) = self.refresh {
            settings.refresh_secs = refresh;
        }
        if self.per_device_watermark {
            settings.watermark_scope = WatermarkScope::PerDevice;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let mut settings = Settings::load(args.config.as_deref())?;
    args.merge_into(&mut settings);
    debug!("Settings: {:?}", settings);

    if let Some(ref export_path) = args.export {
        return export_to_file(&args.file, export_path, &settings);
    }

    let sink: Arc<dyn NotificationSink> = match args.output {
        Some(ref path) => Arc::new(
            JsonLinesSink::create(path)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Arc::new(JsonLinesSink::stdout()),
    };
    let monitor = Monitor::from_settings(&settings, sink);
    let mut source = FileSource::new(&args.file);

    if args.once {
        if let Some(report) = monitor.step(&mut source) {
            info!(
                "Raised {} delay warnings and {} crash errors",
                report.delay_warnings, report.crash_errors
            );
        }
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(follow(
        &monitor,
        &mut source,
        Duration::from_secs(settings.refresh_secs.max(1)),
    ))
}

/// Log to stderr so notification JSON on stdout stays parseable.
/// `RUST_LOG` takes precedence over `-v`.
fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Poll the source every `refresh` until Ctrl-C.
async fn follow(monitor: &Monitor, source: &mut dyn DataSource, refresh: Duration) -> Result<()> {
    info!("Following {} every {:?}", source.description(), refresh);
    let mut interval = tokio::time::interval(refresh);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                monitor.step(source);
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                }
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}

/// Analyze the whole message log once and write a JSON report.
fn export_to_file(messages_path: &Path, export_path: &Path, settings: &Settings) -> Result<()> {
    let mut source = FileSource::new(messages_path);
    let batch = source.poll().unwrap_or_default();
    if let Some(error) = source.error() {
        warn!("{}: {}", source.description(), error);
    }

    let sink = Arc::new(MemorySink::new());
    let monitor = Monitor::from_settings(settings, sink.clone());
    let ingested = monitor.ingest(batch);
    let report = monitor.run_cycle();

    let export = serde_json::json!({
        "summary": {
            "messages": ingested,
            "rejected": source.rejected(),
            "devices": report.devices,
            "live_devices": report.live_devices,
            "ap_nodes": report.ap_nodes,
            "delay_warnings": report.delay_warnings,
            "crash_errors": report.crash_errors,
        },
        "settings": settings,
        "notifications": sink.notifications(),
    });

    let json = serde_json::to_string_pretty(&export)?;
    let mut file = std::fs::File::create(export_path)
        .with_context(|| format!("Failed to create {}", export_path.display()))?;
    file.write_all(json.as_bytes())?;

    println!("Exported analysis report to: {}", export_path.display());
    Ok(())
}
