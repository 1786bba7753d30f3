use anyhow::Context;
use clap::Parser;
use orbit::config::{self, NavigationConfig};
use orbit::nav::NavigationController;
use orbit::sys::{SOCKET_PATH, runtime, server};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orbit", version, about = "Radial navigation daemon", long_about = None)]
struct Args {
    /// Config file to load and watch (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Unix socket to accept commands on
    #[arg(short, long, default_value = SOCKET_PATH)]
    socket: PathBuf,

    /// Write the bundled menu to the config path and exit
    #[arg(long)]
    write_default: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if args.write_default {
        config::write_default_config(&config_path)
            .with_context(|| format!("writing {}", config_path.display()))?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let mut nav = NavigationController::new();
    let initial = NavigationConfig::default().merged(config::load_or_default(&config_path));
    if let Err(e) = nav.configure(initial.into()) {
        log::error!("Starting with an empty menu: {}", e);
    }

    let _events = nav.subscribe(|event| {
        log::info!("{} -> {}", event.kind, event.state.phase);
        match serde_json::to_string(event) {
            Ok(line) => {
                let mut out = std::io::stdout().lock();
                if writeln!(out, "{}", line).and_then(|_| out.flush()).is_err() {
                    log::warn!("stdout closed, dropping {} event", event.kind);
                }
            }
            Err(e) => log::error!("Failed to encode event: {}", e),
        }
    });

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(args.socket.clone(), config_path.clone(), tx);

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(runtime::drive(nav, &config_path, rx));

    server::remove_socket(&args.socket);
    Ok(())
}
