use std::io::{Read, Write};
use std::path::Path;
use std::sync::mpsc as std_mpsc;

use portable_pty::{native_pty_system, CommandBuilder, MasterPty, PtySize};
use tokio::sync::mpsc;

use super::TerminalMessage;

/// Spawn a shell process in a PTY. Returns (master, reader).
pub fn spawn_shell(
    cwd: &Path,
    shell: &str,
    cols: u16,
    rows: u16,
) -> anyhow::Result<(Box<dyn MasterPty + Send>, Box<dyn Read + Send>)> {
    let pty_system = native_pty_system();
    let pair = pty_system
        .openpty(PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| anyhow::anyhow!("Failed to open PTY: {e}"))?;

    let shell = detect_shell(shell);
    tracing::debug!("spawning {shell} in {}", cwd.display());
    let mut cmd = CommandBuilder::new(&shell);
    cmd.cwd(cwd);
    cmd.env("TERM", "dumb");

    pair.slave
        .spawn_command(cmd)
        .map_err(|e| anyhow::anyhow!("Failed to spawn shell: {e}"))?;

    let reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| anyhow::anyhow!("Failed to clone PTY reader: {e}"))?;

    Ok((pair.master, reader))
}

/// Resolves the configured shell. `"auto"` means $SHELL, falling back to
/// /bin/sh.
pub fn detect_shell(configured: &str) -> String {
    match configured.trim() {
        "" | "auto" => std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string()),
        shell => shell.to_string(),
    }
}

/// Spawns a blocking thread to read from PTY and send output via channel.
pub fn spawn_pty_reader(
    mut reader: Box<dyn Read + Send>,
    tx: mpsc::UnboundedSender<TerminalMessage>,
) {
    std::thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => {
                    let _ = tx.send(TerminalMessage::Exited);
                    break;
                }
                Ok(n) => {
                    if tx.send(TerminalMessage::Output(buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!("PTY read ended: {e}");
                    let _ = tx.send(TerminalMessage::Exited);
                    break;
                }
            }
        }
    });
}

/// Spawns a blocking thread that owns the PTY writer. Callers hand it byte
/// chunks and never wait on the shell.
///
/// The thread exits (and the returned sender starts failing) once the PTY
/// stops accepting writes or every sender is dropped.
pub fn spawn_pty_writer(mut writer: Box<dyn Write + Send>) -> std_mpsc::Sender<Vec<u8>> {
    let (tx, rx) = std_mpsc::channel::<Vec<u8>>();
    std::thread::spawn(move || {
        for chunk in rx {
            if let Err(e) = writer.write_all(&chunk).and_then(|()| writer.flush()) {
                tracing::warn!("PTY write failed: {e}");
                break;
            }
        }
    });
    tx
}

/// The shell line that moves an interactive shell to `path`.
///
/// The path is single-quoted; embedded single quotes are closed, escaped and
/// reopened. On unix the path's bytes go through untouched.
pub fn cd_command(path: &Path) -> Vec<u8> {
    let mut line = b"cd '".to_vec();
    for &byte in path_bytes(path).iter() {
        if byte == b'\'' {
            line.extend_from_slice(br"'\''");
        } else {
            line.push(byte);
        }
    }
    line.extend_from_slice(b"'\n");
    line
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    match path.to_string_lossy() {
        std::borrow::Cow::Borrowed(s) => std::borrow::Cow::Borrowed(s.as_bytes()),
        std::borrow::Cow::Owned(s) => std::borrow::Cow::Owned(s.into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cd_command_quotes_path() {
        assert_eq!(cd_command(Path::new("/home/user")), b"cd '/home/user'\n");
        assert_eq!(cd_command(Path::new("/tmp/my dir")), b"cd '/tmp/my dir'\n");
    }

    #[test]
    fn cd_command_escapes_single_quotes() {
        assert_eq!(
            cd_command(Path::new("/tmp/it's")),
            b"cd '/tmp/it'\\''s'\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn cd_command_keeps_raw_name_bytes() {
        use std::os::unix::ffi::OsStrExt;
        let path = Path::new(std::ffi::OsStr::from_bytes(b"/tmp/\xffcafe\xcc\x81"));
        assert_eq!(cd_command(path), b"cd '/tmp/\xffcafe\xcc\x81'\n");
    }

    #[test]
    fn detect_shell_prefers_configured() {
        assert_eq!(detect_shell("/bin/zsh"), "/bin/zsh");
        assert!(!detect_shell("auto").is_empty());
    }

    #[test]
    fn writer_thread_forwards_chunks() {
        struct Sink(std_mpsc::Sender<Vec<u8>>);
        impl Write for Sink {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                let _ = self.0.send(buf.to_vec());
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let (seen_tx, seen_rx) = std_mpsc::channel();
        let tx = spawn_pty_writer(Box::new(Sink(seen_tx)));
        tx.send(b"cd '/tmp'\n".to_vec()).unwrap();

        let got = seen_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert_eq!(got, b"cd '/tmp'\n");
    }
}
