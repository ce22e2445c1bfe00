//! Module `exchange`
//!
//! Session side of the handshake with a data task. Each stage is its own
//! type so the go/no-go decision can only be made after the dial result
//! has been consumed, and the final result can only be awaited after go.

use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::DataChannelError;
use crate::protocol::PassiveEndpoint;
use crate::transfer::results::{DataEvent, Signal, TransferOutput};

/// Data task started, dial result not yet observed.
pub struct PendingTransfer {
    endpoint: PassiveEndpoint,
    events: mpsc::Receiver<DataEvent>,
    signal: oneshot::Sender<Signal>,
    task: JoinHandle<()>,
}

/// Data connection established, awaiting go/no-go.
pub struct ConnectedTransfer {
    endpoint: PassiveEndpoint,
    events: mpsc::Receiver<DataEvent>,
    signal: oneshot::Sender<Signal>,
    task: JoinHandle<()>,
}

/// Go signal sent, bytes moving.
pub struct RunningTransfer {
    endpoint: PassiveEndpoint,
    events: mpsc::Receiver<DataEvent>,
    task: JoinHandle<()>,
}

impl PendingTransfer {
    pub(crate) fn new(
        endpoint: PassiveEndpoint,
        events: mpsc::Receiver<DataEvent>,
        signal: oneshot::Sender<Signal>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            endpoint,
            events,
            signal,
            task,
        }
    }

    /// Waits for the dial result.
    pub async fn connected(mut self) -> Result<ConnectedTransfer, DataChannelError> {
        match self.events.recv().await {
            Some(DataEvent::Connected) => Ok(ConnectedTransfer {
                endpoint: self.endpoint,
                events: self.events,
                signal: self.signal,
                task: self.task,
            }),
            Some(DataEvent::Failed(e)) => {
                join_task(self.task, &self.endpoint).await;
                Err(e)
            }
            Some(other) => {
                warn!(
                    "Data task for {} reported {} before connecting",
                    self.endpoint,
                    other.kind()
                );
                self.task.abort();
                Err(DataChannelError::Disconnected)
            }
            None => {
                join_task(self.task, &self.endpoint).await;
                Err(DataChannelError::Disconnected)
            }
        }
    }
}

impl ConnectedTransfer {
    pub fn endpoint(&self) -> &PassiveEndpoint {
        &self.endpoint
    }

    /// Lets the data task start moving bytes.
    pub fn go(self) -> Result<RunningTransfer, DataChannelError> {
        if self.signal.send(Signal::Go).is_err() {
            return Err(DataChannelError::Disconnected);
        }
        Ok(RunningTransfer {
            endpoint: self.endpoint,
            events: self.events,
            task: self.task,
        })
    }

    /// Tells the data task to close its connection without transferring.
    ///
    /// Waits until the task has closed the exchange and returns the error
    /// it reported, if any.
    pub async fn abort(mut self, reason: impl Into<String>) -> Option<DataChannelError> {
        let reason = reason.into();
        debug!("Aborting transfer on {}: {}", self.endpoint, reason);
        let _ = self.signal.send(Signal::Abort(reason));

        let mut reported = None;
        while let Some(event) = self.events.recv().await {
            match event {
                DataEvent::Failed(e) => reported = Some(e),
                other => warn!(
                    "Data task for {} reported {} after abort",
                    self.endpoint,
                    other.kind()
                ),
            }
        }
        join_task(self.task, &self.endpoint).await;
        reported
    }
}

impl RunningTransfer {
    /// Waits for the final value and for the exchange to close.
    pub async fn finish(mut self) -> Result<TransferOutput, DataChannelError> {
        let outcome = match self.events.recv().await {
            Some(DataEvent::Received(bytes)) => Ok(TransferOutput::Received(bytes)),
            Some(DataEvent::Sent(count)) => Ok(TransferOutput::Sent(count)),
            Some(DataEvent::Failed(e)) => Err(e),
            Some(DataEvent::Connected) | None => Err(DataChannelError::Disconnected),
        };

        while let Some(event) = self.events.recv().await {
            warn!(
                "Ignoring {} event from finished data task for {}",
                event.kind(),
                self.endpoint
            );
        }
        join_task(self.task, &self.endpoint).await;
        outcome
    }
}

async fn join_task(task: JoinHandle<()>, endpoint: &PassiveEndpoint) {
    if let Err(e) = task.await {
        warn!("Data task for {} did not finish cleanly: {}", endpoint, e);
    }
}
