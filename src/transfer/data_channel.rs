//! Module `data_channel`
//!
//! Runs the client end of a passive-mode data connection as a background
//! task. The task dials the endpoint advertised by the server, reports the
//! outcome, waits for the session's go/no-go decision and only then moves
//! bytes. The socket is closed on every exit path before the final value
//! is reported.

use log::{debug, info, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use crate::error::DataChannelError;
use crate::protocol::PassiveEndpoint;
use crate::transfer::exchange::PendingTransfer;
use crate::transfer::results::{DataEvent, Signal};

/// Direction of the bytes on the data connection.
#[derive(Debug)]
pub enum Direction {
    /// Read until the server closes the connection.
    Receive,
    /// Write the whole payload, then close.
    Send(Vec<u8>),
}

/// Spawns the data task and returns the session side of its exchange.
pub fn start_transfer(endpoint: PassiveEndpoint, direction: Direction) -> PendingTransfer {
    // Connected plus one final value: sends never wait on the session.
    let (events_tx, events_rx) = mpsc::channel(2);
    let (signal_tx, signal_rx) = oneshot::channel();

    let task = tokio::spawn(run_data_task(
        endpoint.clone(),
        direction,
        events_tx,
        signal_rx,
    ));

    PendingTransfer::new(endpoint, events_rx, signal_tx, task)
}

async fn run_data_task(
    endpoint: PassiveEndpoint,
    direction: Direction,
    events: mpsc::Sender<DataEvent>,
    signal: oneshot::Receiver<Signal>,
) {
    let address = endpoint.to_string();

    let mut stream = match TcpStream::connect((endpoint.host.as_str(), endpoint.port)).await {
        Ok(stream) => stream,
        Err(source) => {
            warn!("Failed to open data connection to {}: {}", address, source);
            let _ = events
                .send(DataEvent::Failed(DataChannelError::Dial {
                    endpoint: address,
                    source,
                }))
                .await;
            return;
        }
    };
    debug!("Data connection established to {}", address);

    if events.send(DataEvent::Connected).await.is_err() {
        debug!("Session gone before data transfer to {}", address);
        let _ = stream.shutdown().await;
        return;
    }

    match signal.await {
        Ok(Signal::Go) => {}
        Ok(Signal::Abort(reason)) => {
            info!("Closing data connection to {} unused: {}", address, reason);
            let _ = stream.shutdown().await;
            drop(stream);
            let _ = events
                .send(DataEvent::Failed(DataChannelError::Aborted(reason)))
                .await;
            return;
        }
        Err(_) => {
            debug!("Session dropped the transfer on {}", address);
            let _ = stream.shutdown().await;
            return;
        }
    }

    let event = match direction {
        Direction::Receive => receive_all(&mut stream, &address).await,
        Direction::Send(payload) => send_all(&mut stream, &payload, &address).await,
    };
    drop(stream);

    let _ = events.send(event).await;
}

async fn receive_all(stream: &mut TcpStream, address: &str) -> DataEvent {
    let mut buffer = Vec::new();
    match stream.read_to_end(&mut buffer).await {
        Ok(n) => {
            debug!("Received {} bytes from {}", n, address);
            DataEvent::Received(buffer)
        }
        Err(e) => {
            warn!("Data read from {} failed: {}", address, e);
            DataEvent::Failed(DataChannelError::Read(e))
        }
    }
}

async fn send_all(stream: &mut TcpStream, payload: &[u8], address: &str) -> DataEvent {
    if let Err(e) = stream.write_all(payload).await {
        warn!("Data write to {} failed: {}", address, e);
        return DataEvent::Failed(DataChannelError::Write(e));
    }
    // The server detects the end of the file by the connection closing.
    if let Err(e) = stream.shutdown().await {
        warn!("Closing data connection to {} failed: {}", address, e);
        return DataEvent::Failed(DataChannelError::Write(e));
    }
    debug!("Sent {} bytes to {}", payload.len(), address);
    DataEvent::Sent(payload.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::TransferOutput;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, PassiveEndpoint) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let endpoint = PassiveEndpoint {
            host: "127.0.0.1".into(),
            port,
        };
        (listener, endpoint)
    }

    #[tokio::test]
    async fn test_receive_reads_until_close() {
        let (listener, endpoint) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"a\nb\nc\n").await.unwrap();
        });

        let connected = start_transfer(endpoint, Direction::Receive)
            .connected()
            .await
            .unwrap();
        let output = connected.go().unwrap().finish().await.unwrap();
        assert_eq!(output, TransferOutput::Received(b"a\nb\nc\n".to_vec()));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_writes_payload_and_closes() {
        let (listener, endpoint) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let payload = vec![0u8, 159, 146, 150, 255];
        let connected = start_transfer(endpoint, Direction::Send(payload.clone()))
            .connected()
            .await
            .unwrap();
        let output = connected.go().unwrap().finish().await.unwrap();
        assert_eq!(output, TransferOutput::Sent(payload.len()));
        assert_eq!(server.await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_dial_failure_reports_real_error() {
        let (listener, endpoint) = listener().await;
        drop(listener);

        let err = start_transfer(endpoint.clone(), Direction::Receive)
            .connected()
            .await
            .err()
            .unwrap();
        match err {
            DataChannelError::Dial { endpoint: reported, .. } => {
                assert_eq!(reported, endpoint.to_string())
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_abort_sends_nothing_and_closes() {
        let (listener, endpoint) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let connected = start_transfer(endpoint, Direction::Send(b"must not arrive".to_vec()))
            .connected()
            .await
            .unwrap();
        let reported = connected.abort("550 rejected").await;

        assert!(matches!(reported, Some(DataChannelError::Aborted(ref r)) if r == "550 rejected"));
        assert!(server.await.unwrap().is_empty());
    }
}
