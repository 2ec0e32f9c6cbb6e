use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the control socket and the config watcher on their own Tokio runtime
/// so the GTK main loop never blocks on them.
pub fn start_background_services(tx: Sender<AppEvent>) {
    let spawned = thread::Builder::new()
        .name("vloader-services".into())
        .spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async {
                tokio::spawn(crate::sys::server::run_server(tx.clone()));
                tokio::spawn(crate::config::run_async_watcher(tx));

                std::future::pending::<()>().await;
            });
        });

    if let Err(e) = spawned {
        log::error!("Failed to start background services: {}", e);
    }
}
