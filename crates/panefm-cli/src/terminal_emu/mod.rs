pub mod pty;

use std::path::Path;
use std::sync::mpsc as std_mpsc;

use panefm_core::{PathValue, TerminalError, TerminalSession};
use tokio::sync::mpsc;

/// Messages from the PTY reader thread to the main loop.
#[derive(Debug)]
pub enum TerminalMessage {
    /// Raw bytes from PTY stdout.
    Output(Vec<u8>),
    /// Shell process exited.
    Exited,
}

/// A shell running in a PTY.
pub struct TerminalEmulator {
    pty_master: Box<dyn portable_pty::MasterPty + Send>,
    session: std::sync::Arc<PtyTerminal>,
    last_size: (u16, u16),
}

impl TerminalEmulator {
    /// Spawns a shell in `cwd` and starts the PTY reader and writer threads.
    pub fn spawn(
        cwd: &Path,
        shell: &str,
        cols: u16,
        rows: u16,
        tx: mpsc::UnboundedSender<TerminalMessage>,
    ) -> anyhow::Result<Self> {
        let (master, reader) = pty::spawn_shell(cwd, shell, cols, rows)?;
        pty::spawn_pty_reader(reader, tx);
        let writer = master.take_writer().map_err(|e| anyhow::anyhow!("{e}"))?;
        let session = std::sync::Arc::new(PtyTerminal {
            tx: pty::spawn_pty_writer(writer),
        });
        Ok(Self {
            pty_master: master,
            session,
            last_size: (cols, rows),
        })
    }

    /// The handle the navigator uses to move the shell around.
    pub fn session(&self) -> std::sync::Arc<PtyTerminal> {
        std::sync::Arc::clone(&self.session)
    }

    /// Sends a line typed by the user.
    pub fn write_line(&self, line: &str) -> Result<(), TerminalError> {
        self.session.write_bytes(format!("{line}\n").into_bytes())
    }

    /// Resize the PTY.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if (cols, rows) != self.last_size && cols > 0 && rows > 0 {
            if let Err(e) = self.pty_master.resize(portable_pty::PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            }) {
                tracing::warn!("PTY resize failed: {e}");
                return;
            }
            self.last_size = (cols, rows);
        }
    }
}

/// [`TerminalSession`] backed by the PTY writer thread.
///
/// Writes are queued, never awaited; once the shell is gone every request
/// fails with [`TerminalError::Closed`].
#[derive(Debug, Clone)]
pub struct PtyTerminal {
    tx: std_mpsc::Sender<Vec<u8>>,
}

impl PtyTerminal {
    #[cfg(test)]
    pub fn from_sender(tx: std_mpsc::Sender<Vec<u8>>) -> Self {
        Self { tx }
    }

    fn write_bytes(&self, bytes: Vec<u8>) -> Result<(), TerminalError> {
        self.tx.send(bytes).map_err(|_| TerminalError::Closed)
    }
}

impl TerminalSession for PtyTerminal {
    fn set_working_directory(&self, path: &PathValue) -> Result<(), TerminalError> {
        self.write_bytes(pty::cd_command(path.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_working_directory_queues_cd() {
        let (tx, rx) = std_mpsc::channel();
        let terminal = PtyTerminal::from_sender(tx);

        terminal
            .set_working_directory(&PathValue::normalize("/srv/data").unwrap())
            .unwrap();

        assert_eq!(rx.recv().unwrap(), b"cd '/srv/data'\n");
    }

    #[test]
    fn closed_writer_reports_closed() {
        let (tx, rx) = std_mpsc::channel();
        drop(rx);
        let terminal = PtyTerminal::from_sender(tx);

        let err = terminal
            .set_working_directory(&PathValue::root())
            .unwrap_err();
        assert!(matches!(err, TerminalError::Closed));
    }
}
