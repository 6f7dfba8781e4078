// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use qrscan::app::{AppModel, AppServices};
use qrscan::backends::camera::FacingMode;
use qrscan::config::{self, Config};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "qrscan")]
#[command(about = "Scan QR codes from a camera or an image file")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Capture device to use (e.g. /dev/video2), overrides the configured one
    #[arg(long, global = true)]
    camera: Option<String>,

    /// Prefer the front camera instead of the back one
    #[arg(long, global = true)]
    front: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive scanner in the terminal (default)
    Terminal {
        /// Scan this image on startup
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Scan a single image file and print its content
    Scan {
        /// Image file containing a QR code
        path: PathBuf,

        /// Copy the decoded content to the clipboard
        #[arg(short, long)]
        copy: bool,

        /// Save the content to qrcode_content.txt (in DIR, default: downloads)
        #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
        save: Option<Option<PathBuf>>,
    },

    /// List available cameras
    List,

    /// Show or toggle the theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Terminal { .. }));
    init_logging(interactive);

    let mut config = Config::load();
    if let Some(path) = cli.camera {
        config.camera_path = Some(path);
    }
    if cli.front {
        config.facing_mode = FacingMode::User;
    }

    match cli.command {
        None => run_terminal(config, None),
        Some(Commands::Terminal { image }) => run_terminal(config, image),
        Some(Commands::Scan { path, copy, save }) => cli::scan_image(&config, &path, copy, save),
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Theme { action }) => match action {
            None | Some(ThemeAction::Show) => cli::theme_show(),
            Some(ThemeAction::Toggle) => cli::theme_toggle(),
        },
    }
}

fn run_terminal(config: Config, image: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let services = AppServices::system(&config);
    let mut app = AppModel::new(config, services);
    qrscan::terminal::run(&mut app, image)
}

/// Initialize logging
///
/// Set RUST_LOG environment variable to control log level.
/// Examples: RUST_LOG=debug, RUST_LOG=qrscan=debug, RUST_LOG=info
///
/// The interactive scanner owns the terminal, so its log goes to
/// `$XDG_CACHE_HOME/qrscan/qrscan.log` instead of stderr.
fn init_logging(interactive: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    let log_file = interactive
        .then(config::cache_dir)
        .flatten()
        .and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("qrscan.log"))
                .ok()
        });

    match log_file {
        Some(file) => builder
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init(),
        None if interactive => builder.with_writer(std::io::sink).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
}
