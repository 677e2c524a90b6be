//! Interactive command parsing

/// A parsed user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Signup { username: String, password: String },
    Login { username: String, password: String },
    List,
    Open { path: String },
    Back,
    Forward,
    Up,
    Pwd,
    Read { path: String },
    Write { path: String, content: String },
    Delete { path: String, recursive: bool },
    CreateDir { path: String },
    Rename { from: String, to: String },
    Help,
    Quit,
}

/// Usage summary printed by `help`
pub const HELP_TEXT: &str = "\
Commands:
  signup <user> <password>   create an account
  login <user> <password>    log in
  ls                         list the current directory
  cd <path>                  open a directory
  back                       go back in history
  forward                    go forward in history
  up                         go to the parent directory
  pwd                        print the current directory
  cat <path>                 print a file
  write <path> <text>        create or overwrite a file
  rm [-r] <path>             delete a file or directory
  mkdir <path>               create a directory
  mv <from> <to>             rename or move
  help                       show this help
  quit                       exit";

/// Parse one input line into a command
///
/// Returns a usage message on malformed input; blank lines produce `None`.
pub fn parse(line: &str) -> Option<Result<Command, String>> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let args: Vec<&str> = parts.collect();

    let command = match name {
        "signup" => match args.as_slice() {
            [username, password] => Command::Signup {
                username: (*username).to_string(),
                password: (*password).to_string(),
            },
            _ => return Some(Err("usage: signup <user> <password>".to_string())),
        },
        "login" => match args.as_slice() {
            [username, password] => Command::Login {
                username: (*username).to_string(),
                password: (*password).to_string(),
            },
            _ => return Some(Err("usage: login <user> <password>".to_string())),
        },
        "ls" => Command::List,
        "cd" => match args.as_slice() {
            [path] => Command::Open {
                path: (*path).to_string(),
            },
            _ => return Some(Err("usage: cd <path>".to_string())),
        },
        "back" => Command::Back,
        "forward" => Command::Forward,
        "up" => Command::Up,
        "pwd" => Command::Pwd,
        "cat" => match args.as_slice() {
            [path] => Command::Read {
                path: (*path).to_string(),
            },
            _ => return Some(Err("usage: cat <path>".to_string())),
        },
        "write" => match args.as_slice() {
            [path, rest @ ..] if !rest.is_empty() => Command::Write {
                path: (*path).to_string(),
                content: rest.join(" "),
            },
            _ => return Some(Err("usage: write <path> <text>".to_string())),
        },
        "rm" => match args.as_slice() {
            [path] => Command::Delete {
                path: (*path).to_string(),
                recursive: false,
            },
            ["-r", path] => Command::Delete {
                path: (*path).to_string(),
                recursive: true,
            },
            _ => return Some(Err("usage: rm [-r] <path>".to_string())),
        },
        "mkdir" => match args.as_slice() {
            [path] => Command::CreateDir {
                path: (*path).to_string(),
            },
            _ => return Some(Err("usage: mkdir <path>".to_string())),
        },
        "mv" => match args.as_slice() {
            [from, to] => Command::Rename {
                from: (*from).to_string(),
                to: (*to).to_string(),
            },
            _ => return Some(Err("usage: mv <from> <to>".to_string())),
        },
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Some(Err(format!("unknown command '{}' (try 'help')", other))),
    };

    Some(Ok(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert!(parse("").is_none());
        assert!(parse("   ").is_none());
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("ls").unwrap().unwrap(), Command::List);
        assert_eq!(parse("back").unwrap().unwrap(), Command::Back);
        assert_eq!(parse("forward").unwrap().unwrap(), Command::Forward);
        assert_eq!(parse("up").unwrap().unwrap(), Command::Up);
        assert_eq!(parse("pwd").unwrap().unwrap(), Command::Pwd);
        assert_eq!(parse("help").unwrap().unwrap(), Command::Help);
        assert_eq!(parse("quit").unwrap().unwrap(), Command::Quit);
        assert_eq!(parse("exit").unwrap().unwrap(), Command::Quit);
    }

    #[test]
    fn test_login_and_signup() {
        assert_eq!(
            parse("login alice secret").unwrap().unwrap(),
            Command::Login {
                username: "alice".to_string(),
                password: "secret".to_string(),
            }
        );
        assert!(parse("login alice").unwrap().is_err());
        assert!(parse("signup").unwrap().is_err());
    }

    #[test]
    fn test_write_joins_content() {
        assert_eq!(
            parse("write notes.txt hello world").unwrap().unwrap(),
            Command::Write {
                path: "notes.txt".to_string(),
                content: "hello world".to_string(),
            }
        );
        assert!(parse("write notes.txt").unwrap().is_err());
    }

    #[test]
    fn test_rm_recursive_flag() {
        assert_eq!(
            parse("rm -r docs").unwrap().unwrap(),
            Command::Delete {
                path: "docs".to_string(),
                recursive: true,
            }
        );
        assert_eq!(
            parse("rm notes.txt").unwrap().unwrap(),
            Command::Delete {
                path: "notes.txt".to_string(),
                recursive: false,
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse("frobnicate").unwrap().is_err());
    }
}
