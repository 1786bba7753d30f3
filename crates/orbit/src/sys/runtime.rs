use crate::config::{self, NavigationConfig, NavigationConfigPatch};
use crate::events::AppEvent;
use crate::nav::NavigationController;
use crate::sys::command::Command;
use async_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::thread;
use tokio::runtime::Runtime;

pub fn start_background_services(socket_path: PathBuf, config_path: PathBuf, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create background runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(socket_path, tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    config::run_async_watcher(config_path, tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}

/// Owns the controller until `destroy`, Ctrl-C, or every sender is gone.
pub async fn drive(mut nav: NavigationController, config_path: &Path, rx: Receiver<AppEvent>) {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let deadline = nav.next_deadline();
        let timer = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at.into()).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            event = rx.recv() => match event {
                Ok(AppEvent::Command(Command::Destroy)) => break,
                Ok(AppEvent::Command(cmd)) => {
                    log::debug!("Applying {:?}", cmd);
                    cmd.apply(&mut nav);
                }
                Ok(AppEvent::ConfigReload) => reload(&mut nav, config_path),
                Err(_) => break,
            },
            _ = timer => nav.tick(),
            _ = &mut ctrl_c => {
                log::info!("Interrupted");
                break;
            }
        }
    }

    nav.destroy();
}

/// Re-reads the file from scratch so removed keys fall back to defaults.
/// A deleted file brings back the bundled menu, as at startup.
pub fn reload(nav: &mut NavigationController, config_path: &Path) {
    let patch = if config_path.exists() {
        config::load_patch(config_path)
    } else {
        Ok(config::load_or_default(config_path))
    };

    match patch {
        Ok(patch) => {
            let full = NavigationConfig::default().merged(patch);
            match nav.configure(NavigationConfigPatch::from(full)) {
                Ok(()) => log::info!("Configuration reloaded"),
                Err(e) => log::error!("Keeping previous configuration: {}", e),
            }
        }
        Err(e) => log::error!("Failed to reload config: {}", e),
    }
}
