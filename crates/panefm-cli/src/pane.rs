//! One file-manager pane driven from prompt lines.
//!
//! The controller owns the pane's [`Navigator`], renders the snapshots it
//! publishes and keeps the embedded terminal alive. It never decides what the
//! listing is; it only turns [`InputAction`]s into intents.

use std::io::Write;
use std::sync::Arc;

use panefm_core::{
    CoreError, DispatchOutcome, EntryKind, Intent, NavSnapshot, NavState, Navigator, PathValue,
    Subscription,
};
use tokio::sync::mpsc;

use crate::input::{InputAction, HELP};
use crate::terminal_emu::{TerminalEmulator, TerminalMessage};

/// Rows assumed for the whole pane when `LINES` is not set.
const DEFAULT_SCREEN_ROWS: u16 = 24;
/// Columns handed to the PTY.
const TERMINAL_COLS: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct PaneController {
    navigator: Navigator,
    subscription: Subscription,
    terminal: Option<TerminalEmulator>,
    terminal_tx: mpsc::UnboundedSender<TerminalMessage>,
    shell: String,
    screen_rows: u16,
    /// Rows given to the listing while the terminal is open; the terminal
    /// gets the rest.
    directory_list_height: u16,
    /// Generation of the last snapshot printed in a settled state.
    last_rendered: Option<(u64, bool)>,
}

impl PaneController {
    pub fn new(
        navigator: Navigator,
        shell: String,
        terminal_tx: mpsc::UnboundedSender<TerminalMessage>,
    ) -> Self {
        let screen_rows = std::env::var("LINES")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .filter(|rows| *rows > 1)
            .unwrap_or(DEFAULT_SCREEN_ROWS);
        let subscription = navigator.subscribe();
        let mut pane = Self {
            navigator,
            subscription,
            terminal: None,
            terminal_tx,
            shell,
            screen_rows,
            directory_list_height: (f32::from(screen_rows) * 0.7).max(1.0) as u16,
            last_rendered: None,
        };
        // A terminal shown at startup needs its shell right away.
        if pane.terminal_open() {
            if let Err(e) = pane.spawn_terminal() {
                tracing::error!("failed to spawn terminal: {e}");
            }
        }
        pane
    }

    pub fn directory_list_height(&self) -> u16 {
        self.directory_list_height
    }

    pub fn terminal_open(&self) -> bool {
        self.navigator.current_state().terminal_open
    }

    /// Waits for the navigator to publish a new snapshot.
    pub async fn next_snapshot(&mut self) -> Option<NavSnapshot> {
        self.subscription.changed().await
    }

    /// Applies one parsed prompt line.
    pub fn handle(&mut self, action: InputAction, out: &mut impl Write) -> std::io::Result<Flow> {
        let result = match action {
            InputAction::None => Ok(()),
            InputAction::Quit => return Ok(Flow::Quit),
            InputAction::Help => return writeln!(out, "{HELP}").map(|()| Flow::Continue),
            InputAction::PrintPath => {
                return writeln!(out, "{}", self.navigator.current_path()).map(|()| Flow::Continue)
            }
            InputAction::List => {
                let snapshot = self.navigator.current_state();
                return write!(out, "{}", render_snapshot(&snapshot)).map(|()| Flow::Continue);
            }
            InputAction::ChangeDir(raw) => self.change_dir(&raw),
            InputAction::Up => self.navigator.dispatch(Intent::Up).map(drop),
            InputAction::Back => self.navigator.dispatch(Intent::Back).map(drop),
            InputAction::Forward => self.navigator.dispatch(Intent::Forward).map(drop),
            InputAction::Refresh => self.navigator.dispatch(Intent::Refresh).map(drop),
            InputAction::ToggleTerminal => return self.toggle_terminal(out),
            InputAction::Split(rows) => {
                self.set_split(rows);
                return writeln!(
                    out,
                    "listing height {} of {} rows",
                    self.directory_list_height, self.screen_rows
                )
                .map(|()| Flow::Continue);
            }
            InputAction::Shell(line) => return self.send_to_shell(&line, out),
        };

        if let Err(e) = result {
            writeln!(out, "error: {e}")?;
        }
        Ok(Flow::Continue)
    }

    /// Prints a published snapshot once it has settled.
    ///
    /// Loading states and republished terminal toggles are skipped so each
    /// navigation prints once.
    pub fn render(&mut self, snapshot: &NavSnapshot, out: &mut impl Write) -> std::io::Result<()> {
        if snapshot.is_loading() {
            return Ok(());
        }
        let key = (snapshot.generation, snapshot.error().is_some());
        if self.last_rendered == Some(key) {
            return Ok(());
        }
        self.last_rendered = Some(key);
        write!(out, "{}", render_snapshot(snapshot))
    }

    /// The shell exited; forget it so the next `term` starts a new one.
    pub fn terminal_exited(&mut self) {
        if self.terminal.take().is_some() {
            self.navigator.detach_terminal();
            if self.terminal_open() {
                self.navigator.toggle_terminal();
            }
        }
    }

    fn change_dir(&self, raw: &str) -> Result<(), CoreError> {
        let raw = expand_home(raw);
        if raw.starts_with('/') {
            self.navigator.navigate_str(&raw)?;
        } else {
            self.navigator.enter(&raw)?;
        }
        Ok(())
    }

    /// Starts the shell in the current directory and hands it to the
    /// navigator.
    fn spawn_terminal(&mut self) -> anyhow::Result<()> {
        let cwd = self.navigator.current_path();
        let emulator = TerminalEmulator::spawn(
            cwd.as_path(),
            &self.shell,
            TERMINAL_COLS,
            self.terminal_rows(),
            self.terminal_tx.clone(),
        )?;
        let session: Arc<dyn panefm_core::TerminalSession> = emulator.session();
        self.navigator.attach_terminal(session);
        self.terminal = Some(emulator);
        Ok(())
    }

    fn toggle_terminal(&mut self, out: &mut impl Write) -> std::io::Result<Flow> {
        if self.terminal.is_none() {
            if let Err(e) = self.spawn_terminal() {
                tracing::error!("failed to spawn terminal: {e}");
                writeln!(out, "error: failed to spawn terminal: {e}")?;
                return Ok(Flow::Continue);
            }
            // Visible without a shell (the startup spawn failed): the new
            // shell fills the open terminal instead of closing it.
            if self.terminal_open() {
                writeln!(
                    out,
                    "terminal open ({} rows); use '! <line>' to type into it",
                    self.terminal_rows()
                )?;
                return Ok(Flow::Continue);
            }
        }

        match self.navigator.toggle_terminal() {
            DispatchOutcome::TerminalOpened => writeln!(
                out,
                "terminal open ({} rows); use '! <line>' to type into it",
                self.terminal_rows()
            )?,
            DispatchOutcome::TerminalClosed => writeln!(out, "terminal hidden")?,
            DispatchOutcome::Loading { .. } => {}
        }
        Ok(Flow::Continue)
    }

    fn send_to_shell(&self, line: &str, out: &mut impl Write) -> std::io::Result<Flow> {
        let sent = match &self.terminal {
            Some(terminal) if self.terminal_open() => terminal.write_line(line),
            _ => {
                writeln!(out, "error: terminal is not open")?;
                return Ok(Flow::Continue);
            }
        };
        if let Err(e) = sent {
            writeln!(out, "error: {e}")?;
        }
        Ok(Flow::Continue)
    }

    fn set_split(&mut self, rows: u16) {
        self.directory_list_height = rows.clamp(1, self.screen_rows.saturating_sub(1).max(1));
        let terminal_rows = self.terminal_rows();
        if let Some(terminal) = self.terminal.as_mut() {
            terminal.resize(TERMINAL_COLS, terminal_rows);
        }
    }

    fn terminal_rows(&self) -> u16 {
        self.screen_rows
            .saturating_sub(self.directory_list_height)
            .max(1)
    }
}

/// Renders a snapshot as the text a pane shows.
pub fn render_snapshot(snapshot: &NavSnapshot) -> String {
    let mut text = format!("{}\n", snapshot.path);
    match &snapshot.state {
        NavState::Error { error } => {
            text.push_str(&format!("  (cannot read: {error})\n"));
            return text;
        }
        NavState::Loading { .. } if snapshot.listing().is_none() => {
            text.push_str("  (loading)\n");
            return text;
        }
        NavState::Loading { .. } => text.push_str("  (refreshing)\n"),
        NavState::Idle { .. } => {}
    }

    let Some(listing) = snapshot.listing() else {
        return text;
    };
    if listing.is_empty() {
        text.push_str("  (empty)\n");
    }
    for entry in listing.entries() {
        let line = match entry.kind() {
            EntryKind::Directory => format!("  {}/\n", entry.name()),
            EntryKind::Symlink => format!("  {}@\n", entry.name()),
            EntryKind::File | EntryKind::Other => {
                format!("  {:<32} {:>10}\n", entry.name(), format_size(entry.size()))
            }
        };
        text.push_str(&line);
    }
    text
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["K", "M", "G", "T"];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", UNITS[unit])
}

fn expand_home(raw: &str) -> String {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return raw.to_string(),
    };
    match std::env::var("HOME") {
        Ok(home) => format!("{home}{rest}"),
        Err(_) => raw.to_string(),
    }
}

/// Resolves the pane's start directory, falling back to the root.
pub fn start_path(dir: &std::path::Path) -> PathValue {
    let absolute = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    PathValue::from_path(&absolute).unwrap_or_else(|e| {
        tracing::warn!("cannot use {} as start directory: {e}", dir.display());
        PathValue::root()
    })
}
