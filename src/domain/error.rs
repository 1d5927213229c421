use std::{io, net::SocketAddr, str::Utf8Error};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr:   SocketAddr,
        #[source]
        source: io::Error
    },
    #[error("http server error: {0}")]
    Serve(#[source] io::Error),
    #[error("decoder error: {0}")]
    Decoder(String),
    #[error("decoder returned invalid utf-8: {0}")]
    InvalidPayload(#[from] Utf8Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("poller stopped unexpectedly")]
    PollerStopped
}
