use clap::Parser;
use niii::core::config::{self, CliOverrides};
use niii::core::session::{self, Session};
use niii::{Outcome, tui};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "niii", version, about = "Terminal front-end for file-based chat backends")]
struct Args {
    /// Session directory containing the backend's `in` and `out` files
    /// (default: ~/irc)
    dir: Option<PathBuf>,

    /// Hide the "[network] [channel]" status bar
    #[arg(long)]
    no_status_bar: bool,

    /// Disable colors
    #[arg(long)]
    no_color: bool,

    /// Check the out file on an interval instead of using filesystem notifications
    #[arg(long)]
    poll: bool,

    /// Write the debug log here
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("niii"))
        .unwrap_or_else(std::env::temp_dir)
        .join("niii.log")
}

// The terminal belongs to the UI, so logs only ever go to a file
fn init_logging(path: &Path) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if std::env::var_os("NIII_DEBUG").is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(log_file) = File::create(path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("niii: {e}, using defaults");
        config::NiiiConfig::default()
    });
    let cli = CliOverrides {
        no_color: args.no_color,
        no_status_bar: args.no_status_bar,
        poll: args.poll,
        log_file: args.log_file,
    };
    let resolved = config::resolve(&file_config, &cli);

    init_logging(&resolved.log_file.clone().unwrap_or_else(default_log_path));
    log::info!("niii {} starting", env!("CARGO_PKG_VERSION"));

    let dir = match args.dir {
        Some(dir) => dir,
        None => match dirs::home_dir() {
            Some(home) => home.join("irc"),
            None => {
                eprintln!("niii: could not determine home directory");
                return ExitCode::FAILURE;
            }
        },
    };

    let session = match session::resolve_dir(&dir).and_then(Session::open) {
        Ok(session) => session,
        Err(e) => {
            log::warn!("Startup failed: {}", e);
            eprintln!("niii: {e}");
            return ExitCode::FAILURE;
        }
    };

    match tui::run(session, resolved).await {
        Ok(Outcome::Closed) => ExitCode::SUCCESS,
        Ok(Outcome::BackendLost(notice)) => {
            eprintln!("niii: {notice}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::warn!("Terminal error: {}", e);
            eprintln!("niii: terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}
