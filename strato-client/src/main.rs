//! strato - interactive client for the Strato personal cloud

mod commands;
mod connection;
mod navigation;
mod session;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use strato_common::protocol::EntryKind;
use strato_common::{DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS};

use commands::{Command, HELP_TEXT, parse};
use connection::ServerConnection;
use session::FileBrowserSession;

#[derive(Parser, Debug)]
#[command(name = "strato", version, about = "Strato personal cloud client")]
struct Args {
    /// Server hostname or IP address
    #[arg(default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Log in as this user before starting the shell
    #[arg(short, long, requires = "password")]
    username: Option<String>,

    /// Password for --username
    #[arg(long, requires = "username")]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let addr = format!("{}:{}", args.host, args.port);
    let timeout = Duration::from_secs(args.timeout);
    let connection = match ServerConnection::connect(&addr, timeout).await {
        Ok(connection) => connection,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    println!("Connected to {}", addr);
    println!("Type 'help' for commands.");

    let mut session = FileBrowserSession::new(connection);
    if let (Some(username), Some(password)) = (&args.username, &args.password) {
        match session.login(username, password).await {
            Ok(_) => println!("Logged in as {}.", username),
            Err(e) => {
                eprintln!("Login failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    match repl(session).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn repl(
    mut session: FileBrowserSession<OwnedReadHalf, OwnedWriteHalf>,
) -> std::io::Result<()> {
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let prompt = if session.is_logged_in() {
            format!("{} > ", session.current_path())
        } else {
            "> ".to_string()
        };
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = stdin.next_line().await? else {
            break;
        };

        let command = match parse(&line) {
            None => continue,
            Some(Err(usage)) => {
                println!("{}", usage);
                continue;
            }
            Some(Ok(command)) => command,
        };

        if command == Command::Quit {
            break;
        }
        if let Err(e) = run_command(&mut session, command).await {
            println!("error: {}", e);
        }
    }

    Ok(())
}

async fn run_command(
    session: &mut FileBrowserSession<OwnedReadHalf, OwnedWriteHalf>,
    command: Command,
) -> Result<(), session::SessionError> {
    match command {
        Command::Signup { username, password } => {
            session.signup(&username, &password).await?;
            println!("Account created. You are logged in.");
        }
        Command::Login { username, password } => {
            let expires_in = session.login(&username, &password).await?;
            match expires_in {
                Some(secs) => println!("Logged in. Token valid for {} seconds.", secs),
                None => println!("Logged in."),
            }
        }
        Command::List => {
            session.refresh().await?;
            print_listing(session);
        }
        Command::Open { path } => {
            session.open(&path).await?;
            print_listing(session);
        }
        Command::Back => {
            if session.can_go_back() {
                session.back().await?;
                print_listing(session);
            } else {
                println!("Already at the start of history.");
            }
        }
        Command::Forward => {
            if session.can_go_forward() {
                session.forward().await?;
                print_listing(session);
            } else {
                println!("Already at the end of history.");
            }
        }
        Command::Up => {
            session.up().await?;
            print_listing(session);
        }
        Command::Pwd => println!("{}", session.current_path()),
        Command::Read { path } => {
            let content = session.read_file(&path).await?;
            println!("{}", content);
        }
        Command::Write { path, content } => {
            session.write_file(&path, &content).await?;
            println!("Wrote {}", session.resolve_input(&path));
        }
        Command::Delete { path, recursive } => {
            session.delete(&path, recursive).await?;
            println!("Deleted {}", session.resolve_input(&path));
        }
        Command::CreateDir { path } => {
            session.create_dir(&path).await?;
            println!("Created {}", session.resolve_input(&path));
        }
        Command::Rename { from, to } => {
            session.rename(&from, &to).await?;
            println!("Renamed to {}", session.resolve_input(&to));
        }
        Command::Help => println!("{}", HELP_TEXT),
        Command::Quit => {}
    }
    Ok(())
}

fn print_listing(session: &FileBrowserSession<OwnedReadHalf, OwnedWriteHalf>) {
    println!("{}:", session.current_path());
    if session.entries().is_empty() {
        println!("  (empty)");
        return;
    }
    for entry in session.entries() {
        match entry.kind {
            EntryKind::Directory => println!("  {}/", entry.name),
            EntryKind::File => {
                println!("  {}  {} bytes", entry.name, entry.size.unwrap_or(0));
            }
        }
    }
}
