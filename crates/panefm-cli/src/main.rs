//! panefm: a single file-manager pane driven from the command line.
//!
//! Reads commands from stdin, prints listings as the navigator settles and
//! relays the embedded shell's output while its terminal is open.

mod input;
mod notifier;
mod pane;
mod terminal_emu;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use panefm_core::{
    Config, CoreError, ListingPreferences, LocalDirectoryReader, Navigator, NavigatorOptions,
};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use crate::input::parse_line;
use crate::notifier::StderrNotifier;
use crate::pane::{Flow, PaneController};
use crate::terminal_emu::TerminalMessage;

struct Args {
    start_dir: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut start_dir = None;
    let mut config = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                println!("usage: panefm [START_DIR] [--config PATH]");
                std::process::exit(0);
            }
            _ if start_dir.is_none() => start_dir = Some(PathBuf::from(arg)),
            _ => anyhow::bail!("unexpected argument: {arg}"),
        }
    }
    let start_dir = match start_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    Ok(Args { start_dir, config })
}

/// Picks `./config/default.toml` when present, else
/// `~/.config/panefm/default.toml`.
fn default_config_path() -> PathBuf {
    let cfg_dir = if Path::new("config").exists() {
        PathBuf::from("config")
    } else {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(".config")
            .join("panefm")
    };
    cfg_dir.join("default.toml")
}

fn load_config(explicit: Option<&Path>) -> Config {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    match Config::load(&path) {
        Ok(config) => {
            tracing::info!("loaded config from {}", path.display());
            config
        }
        Err(CoreError::NotFound(_)) if explicit.is_none() => Config::default(),
        Err(e) => {
            tracing::warn!("ignoring config {}: {e}", path.display());
            eprintln!("warning: ignoring config {}: {e}", path.display());
            Config::default()
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    // Logs go to a file so they don't interleave with the pane output.
    let log_path = std::env::var_os("PANEFM_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("panefm.log"));
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panefm_core=debug,panefm=debug".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = parse_args()?;
    let config = load_config(args.config.as_deref());

    let reader = LocalDirectoryReader::new(ListingPreferences::from_config(&config.general));
    let navigator = Navigator::builder(pane::start_path(&args.start_dir), Arc::new(reader))
        .with_options(NavigatorOptions::from_config(&config))
        .with_status_notifier(Arc::new(StderrNotifier))
        .build(tokio::runtime::Handle::current());

    let (terminal_tx, terminal_rx) = mpsc::unbounded_channel::<TerminalMessage>();
    let mut pane = PaneController::new(navigator, config.terminal.shell.clone(), terminal_tx);

    let result = run(&mut pane, terminal_rx).await;
    if let Err(e) = &result {
        tracing::error!("exiting: {e}");
    }
    result
}

async fn run(
    pane: &mut PaneController,
    mut terminal_rx: mpsc::UnboundedReceiver<TerminalMessage>,
) -> anyhow::Result<()> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(action) => {
                        if pane.handle(action, &mut stdout)? == Flow::Quit {
                            break;
                        }
                    }
                    Err(msg) => writeln!(stdout, "error: {msg}")?,
                }
            }
            Some(snapshot) = pane.next_snapshot() => {
                pane.render(&snapshot, &mut stdout)?;
            }
            Some(msg) = terminal_rx.recv() => match msg {
                TerminalMessage::Output(bytes) => {
                    if pane.terminal_open() {
                        stdout.write_all(&bytes)?;
                    }
                }
                TerminalMessage::Exited => {
                    tracing::info!("shell exited");
                    pane.terminal_exited();
                    writeln!(stdout, "terminal exited")?;
                }
            },
            else => break,
        }
        stdout.flush()?;
    }

    Ok(())
}
