use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::stream::router::MessageRouter;
use crate::stream::transport::StreamTransport;

/// Owns the lifecycle of the single dashboard stream connection:
/// connect, drain frames into the router, detect closure, reconnect after a
/// fixed delay. Retries forever; an operator dashboard must always come back.
///
/// The whole lifecycle runs on one task, so there is never more than one
/// live connection attempt, and aborting the task cancels both the active
/// socket and any pending reconnect wait.
pub struct ConnectionManager {
    transport: Arc<dyn StreamTransport>,
    router: MessageRouter,
    reconnect_delay: Duration,
    connected_tx: watch::Sender<bool>,
}

impl ConnectionManager {
    pub fn new(
        transport: Arc<dyn StreamTransport>,
        router: MessageRouter,
        reconnect_delay: Duration,
    ) -> Self {
        let (connected_tx, _) = watch::channel(false);
        Self {
            transport,
            router,
            reconnect_delay,
            connected_tx,
        }
    }

    /// Connectivity flag for consumers (the dashboard's online indicator).
    pub fn connected(&self) -> watch::Receiver<bool> {
        self.connected_tx.subscribe()
    }

    pub async fn run(self) {
        loop {
            match self.transport.open().await {
                Ok(mut frames) => {
                    self.connected_tx.send_replace(true);
                    info!("dashboard stream connected");

                    while let Some(frame) = frames.next().await {
                        match frame {
                            Ok(raw) => self.router.route(&raw),
                            Err(err) => {
                                warn!(error = %err, "stream transport error");
                                break;
                            }
                        }
                    }

                    self.connected_tx.send_replace(false);
                    warn!(
                        delay_ms = self.reconnect_delay.as_millis() as u64,
                        "dashboard stream closed; reconnecting"
                    );
                }
                Err(err) => {
                    error!(
                        error = %err,
                        delay_ms = self.reconnect_delay.as_millis() as u64,
                        "failed to open dashboard stream"
                    );
                }
            }

            sleep(self.reconnect_delay).await;
        }
    }
}
