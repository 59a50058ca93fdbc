//! open-at-location - open a file in the editor that owns its project
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre;

use bridge_core::config::{default_config_path, load_settings};
use bridge_core::log::{self, LogLevel};
use bridge_core::prelude::*;
use bridge_core::{ConsoleLogger, PackageJsonDetector};
use bridge_peer::SocketPeerFactory;
use editor_bridge::FileTarget;

/// Open a file at a line in the editor instance owning its project
#[derive(Parser, Debug)]
#[command(name = "open-at-location")]
#[command(about = "Open a file at a line in the editor that owns its project", long_about = None)]
struct Args {
    /// File to open, optionally followed by `:LINE`
    #[arg(value_name = "PATH[:LINE]")]
    target: String,

    /// Threshold for internal diagnostic messages (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// package.json dependency that marks a project root
    #[arg(long)]
    dependency: Option<String>,

    /// Settings file (defaults to <config-dir>/editor-bridge/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Err(e) = bridge_core::logging::init() {
        if !e.is_recoverable() {
            return Err(eyre::Report::new(e));
        }
        log::log_to_stderr(&format!("Warning: file logging disabled: {}", e), false);
    }

    let mut settings = args
        .config
        .clone()
        .or_else(default_config_path)
        .map(|path| load_settings(&path))
        .unwrap_or_default();
    if let Some(level) = args.log_level {
        settings.log.level = level;
    }
    if let Some(dependency) = args.dependency {
        settings.detection.dependency = dependency;
    }

    log::set_global_logger(Arc::new(ConsoleLogger::new()));
    log::set_global_threshold(settings.log.level);

    let target = FileTarget::parse(&args.target)?;
    info!("Opening {}", target);

    let detector = PackageJsonDetector::new(settings.detection.dependency.clone());
    let factory = SocketPeerFactory::from_settings(&settings.peer);

    match editor_bridge::open_file_at_location(&target, &detector, &factory, log::global()).await
    {
        Ok(project_root) => {
            info!("Opened {} in workspace {}", target, project_root.display());
            Ok(())
        }
        Err(e) => Err(editor_bridge::report_failure(e, log::global())),
    }
}
