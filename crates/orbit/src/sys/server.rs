use crate::events::AppEvent;
use crate::sys::command::Command;
use async_channel::Sender;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_server(socket_path: PathBuf, tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if socket_path.exists() {
        let _ = fs_err::remove_file(&socket_path);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if let Some(event) = parse_line(&line)
                            && tx.send(event).await.is_err()
                        {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

fn parse_line(line: &str) -> Option<AppEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    match line.parse::<Command>() {
        Ok(cmd) => Some(AppEvent::Command(cmd)),
        Err(e) => {
            log::warn!("Ignoring '{}': {}", line, e);
            None
        }
    }
}

pub fn remove_socket(socket_path: &Path) {
    if let Err(e) = fs_err::remove_file(socket_path) {
        log::debug!("Socket cleanup: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::ItemId;

    #[test]
    fn test_parse_line_skips_noise() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("# comment").is_none());
        assert!(parse_line("fly away").is_none());
    }

    #[test]
    fn test_parse_line_wraps_commands() {
        match parse_line("navigate services\n") {
            Some(AppEvent::Command(Command::Navigate(id))) => {
                assert_eq!(id, ItemId::from("services"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_forwards_commands() {
        use tokio::io::AsyncWriteExt;
        use tokio::net::UnixStream;

        let socket = std::env::temp_dir().join(format!("orbit-test-{}.sock", std::process::id()));
        let (tx, rx) = async_channel::unbounded();
        let server = tokio::spawn(run_server(socket.clone(), tx));

        let mut stream = loop {
            match UnixStream::connect(&socket).await {
                Ok(s) => break s,
                Err(_) => tokio::task::yield_now().await,
            }
        };
        stream.write_all(b"open\nbogus\nkey right\n").await.unwrap();

        assert!(matches!(rx.recv().await.unwrap(), AppEvent::Command(Command::Open)));
        assert!(matches!(
            rx.recv().await.unwrap(),
            AppEvent::Command(Command::Key(crate::nav::Key::ArrowRight))
        ));

        server.abort();
        remove_socket(&socket);
    }
}
