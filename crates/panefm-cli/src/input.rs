/// Actions that can result from a line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Go to a path; relative paths are resolved against the current one.
    ChangeDir(String),
    /// Go to the parent directory.
    Up,
    /// Step back in history.
    Back,
    /// Step forward in history.
    Forward,
    /// Re-read the current directory.
    Refresh,
    /// Show or hide the terminal.
    ToggleTerminal,
    /// Print the current listing.
    List,
    /// Print the current path.
    PrintPath,
    /// Change how many rows the listing gets when the terminal is open.
    Split(u16),
    /// Send a line to the shell.
    Shell(String),
    Help,
    Quit,
    /// Blank line.
    None,
}

pub const HELP: &str = "\
commands:
  cd <path>     go to <path> (relative to the current directory)
  up            go to the parent directory
  back          step back in history
  forward       step forward in history
  refresh       re-read the current directory
  term          show or hide the terminal
  ls            print the listing
  pwd           print the current directory
  split <rows>  listing height while the terminal is open
  ! <line>      send <line> to the terminal
  help          show this text
  quit          exit";

/// Parses one prompt line.
///
/// Returns a message suitable for the status line when the line is not a
/// known command.
pub fn parse_line(line: &str) -> Result<InputAction, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(InputAction::None);
    }
    if let Some(rest) = line.strip_prefix('!') {
        return Ok(InputAction::Shell(rest.trim_start().to_string()));
    }

    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (line, ""),
    };

    let action = match (word, arg) {
        ("cd", "") => return Err("cd: missing path".to_string()),
        ("cd", path) => InputAction::ChangeDir(path.to_string()),
        ("up" | "..", "") => InputAction::Up,
        ("back" | "b", "") => InputAction::Back,
        ("forward" | "f", "") => InputAction::Forward,
        ("refresh" | "r", "") => InputAction::Refresh,
        ("term" | "t", "") => InputAction::ToggleTerminal,
        ("ls", "") => InputAction::List,
        ("pwd", "") => InputAction::PrintPath,
        ("split", rows) => match rows.parse::<u16>() {
            Ok(rows) if rows > 0 => InputAction::Split(rows),
            _ => return Err(format!("split: expected a positive row count, got '{rows}'")),
        },
        ("help" | "?", "") => InputAction::Help,
        ("quit" | "q" | "exit", "") => InputAction::Quit,
        (word, "") => return Err(format!("unknown command: {word}")),
        (word, _) => return Err(format!("{word}: unexpected argument")),
    };
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_none() {
        assert_eq!(parse_line("   "), Ok(InputAction::None));
    }

    #[test]
    fn cd_keeps_spaces_in_path() {
        assert_eq!(
            parse_line("cd  My Documents/reports "),
            Ok(InputAction::ChangeDir("My Documents/reports".to_string()))
        );
    }

    #[test]
    fn cd_without_path_is_error() {
        assert!(parse_line("cd").is_err());
    }

    #[test]
    fn navigation_words() {
        assert_eq!(parse_line("up"), Ok(InputAction::Up));
        assert_eq!(parse_line(".."), Ok(InputAction::Up));
        assert_eq!(parse_line("back"), Ok(InputAction::Back));
        assert_eq!(parse_line("f"), Ok(InputAction::Forward));
        assert_eq!(parse_line("refresh"), Ok(InputAction::Refresh));
        assert_eq!(parse_line("term"), Ok(InputAction::ToggleTerminal));
        assert_eq!(parse_line("q"), Ok(InputAction::Quit));
    }

    #[test]
    fn shell_line_is_forwarded_verbatim() {
        assert_eq!(
            parse_line("! ls -la | head"),
            Ok(InputAction::Shell("ls -la | head".to_string()))
        );
    }

    #[test]
    fn split_requires_positive_number() {
        assert_eq!(parse_line("split 12"), Ok(InputAction::Split(12)));
        assert!(parse_line("split 0").is_err());
        assert!(parse_line("split tall").is_err());
    }

    #[test]
    fn unknown_and_extra_args_are_rejected() {
        assert_eq!(
            parse_line("frobnicate"),
            Err("unknown command: frobnicate".to_string())
        );
        assert!(parse_line("up now").is_err());
    }
}
