use crate::events::AppEvent;
use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use vloader::command::{Command, SOCKET_PATH};

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(SOCKET_PATH).is_ok() {
        let _ = fs_err::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening for commands on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                tokio::spawn(handle_client(stream, tx.clone()));
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_client(stream: UnixStream, tx: Sender<AppEvent>) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let command = match line.trim().parse::<Command>() {
            Ok(c) => c,
            Err(_) => {
                log::warn!("Ignoring unknown command '{}'", line.trim());
                continue;
            }
        };
        log::debug!("Received '{}'", command);

        if !command.expects_reply() {
            if tx.send(AppEvent::Command(command)).await.is_err() {
                break;
            }
            continue;
        }

        let (reply_tx, reply_rx) = async_channel::bounded(1);
        if tx.send(AppEvent::Status(reply_tx)).await.is_err() {
            break;
        }
        let Ok(phase) = reply_rx.recv().await else {
            break;
        };
        let reply = format!("{}\n", phase);
        if writer.write_all(reply.as_bytes()).await.is_err() {
            break;
        }
    }
}
