use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use casebatch::{build_commands, CliArgs, CommandPipeline, LocalAnalysisEngine, ProcessorRegistry};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting casebatch v{}", env!("CARGO_PKG_VERSION"));

    let args = CliArgs::parse();
    let commands = match build_commands(&args) {
        Ok(commands) => commands,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let registry = ProcessorRegistry::new();
    let engine = Arc::new(LocalAnalysisEngine::with_standard_modules());
    let pipeline = CommandPipeline::new(registry, engine, args.settings_dir.clone());

    // The pipeline closes any open case and terminates the process on
    // its own thread; joining only parks the main thread until then.
    let handle = pipeline.start(commands);
    let _ = handle.join();
}
