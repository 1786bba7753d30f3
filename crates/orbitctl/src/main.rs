use clap::{Parser, Subcommand};
use orbit::nav::Key;
use orbit::sys::SOCKET_PATH;
use orbit::sys::command::Command;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "orbitctl", version, about = "Control a running orbit daemon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Socket of the running daemon
    #[arg(short, long, global = true, default_value = SOCKET_PATH)]
    socket: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open the menu
    Open,
    /// Close the menu
    Close,
    /// Open if closed, close if open
    Toggle,
    /// Select a menu item by id
    Navigate { id: String },
    /// Set (or clear with "none") the hovered item
    Hover { id: String },
    /// Set (or clear with "none") the focused item
    Focus { id: String },
    /// Send a key press, e.g. "right", "esc", "enter"
    Key { name: Key },
    /// Pointer moved to x y, relative to the menu center
    Move {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Mouse click at x y
    Click {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Touch tap at x y
    Tap {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Tear the controller down and stop the daemon
    Destroy,
    /// Send a raw protocol line
    Raw { line: Vec<String> },
}

impl Commands {
    fn to_line(&self) -> String {
        match self {
            Self::Open => "open".to_string(),
            Self::Close => "close".to_string(),
            Self::Toggle => "toggle".to_string(),
            Self::Navigate { id } => format!("navigate {}", shell_words::quote(id)),
            Self::Hover { id } => format!("hover {}", shell_words::quote(id)),
            Self::Focus { id } => format!("focus {}", shell_words::quote(id)),
            Self::Key { name } => format!("key {}", name),
            Self::Move { x, y } => format!("move {} {}", x, y),
            Self::Click { x, y } => format!("click {} {}", x, y),
            Self::Tap { x, y } => format!("tap {} {}", x, y),
            Self::Destroy => "destroy".to_string(),
            Self::Raw { line } => shell_words::join(line),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let line = cli.command.to_line();
    // catch typos here rather than in the daemon log
    line.parse::<Command>()
        .map_err(|e| anyhow::anyhow!("invalid command '{}': {}", line, e))?;

    send_command(&cli.socket, &line)
}

fn send_command(socket: &Path, cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to orbit daemon at {}: {}. Is orbit running?",
            socket.display(),
            e
        )
    })?;

    log::debug!("sending '{}'", cmd);
    writeln!(stream, "{}", cmd)?;
    Ok(())
}
