use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::error::AppError;

pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, AppError>> + Send>>;

/// Seam between the connection lifecycle and the wire. Production uses the
/// websocket transport below; tests script closures through a mock.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    async fn open(&self) -> Result<FrameStream, AppError>;
}

pub struct WsTransport {
    url: String,
}

impl WsTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl StreamTransport for WsTransport {
    async fn open(&self) -> Result<FrameStream, AppError> {
        let (ws, _) = connect_async(self.url.as_str()).await?;

        let frames = ws.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(text.to_string())),
                Ok(Message::Close(_)) => Some(Err(AppError::Transport(
                    "closed by server".to_string(),
                ))),
                // Pings are answered by tungstenite; pong/binary carry nothing.
                Ok(_) => None,
                Err(err) => Some(Err(AppError::from(err))),
            }
        });

        Ok(Box::pin(frames))
    }
}
