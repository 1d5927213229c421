use std::{future::Future, net::SocketAddr, time::Duration};

use tokio::{net::TcpListener, sync::watch, time::timeout};
use tracing::{info, warn};

use super::Poller;
use crate::{
    adapter::responder,
    domain::{BridgeConfig, BridgeError, ReadingStore},
    port::ReadingSource
};

/// Decoder → store → HTTP, wired together.
pub struct Bridge<S: ReadingSource> {
    source: S,
    store:  ReadingStore,
    config: BridgeConfig
}

impl<S: ReadingSource + 'static> Bridge<S> {
    pub fn new(source: S, config: BridgeConfig) -> Self {
        Self { source, store: ReadingStore::new(), config }
    }

    /// Bind the listener. This is the only failure that should end the process.
    pub async fn bind(self) -> Result<BoundBridge<S>, BridgeError> {
        let addr = self.config.bind;
        let listener = TcpListener::bind(addr).await.map_err(|source| BridgeError::Bind { addr, source })?;
        let local_addr = listener.local_addr().map_err(|source| BridgeError::Bind { addr, source })?;

        let poller = Poller::new(self.source, self.store.clone(), self.config.poll_interval)
            .with_stale_after(self.config.stale_after);

        Ok(BoundBridge { listener, local_addr, poller, store: self.store, grace: self.config.poll_interval })
    }

    pub async fn start<F>(self, shutdown: F) -> Result<(), BridgeError>
    where
        F: Future<Output = ()> + Send + 'static
    {
        self.bind().await?.serve(shutdown).await
    }
}

/// A bridge whose listener is bound but not yet accepting.
pub struct BoundBridge<S: ReadingSource> {
    listener:   TcpListener,
    local_addr: SocketAddr,
    poller:     Poller<S>,
    store:      ReadingStore,
    /// How long to wait for the poller after the server stops
    grace:      Duration
}

impl<S: ReadingSource + 'static> BoundBridge<S> {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn store(&self) -> ReadingStore {
        self.store.clone()
    }

    /// Run the poller and the HTTP server until `shutdown` resolves. In-flight
    /// requests are drained; a poller that does not stop within one poll
    /// interval is aborted.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), BridgeError>
    where
        F: Future<Output = ()> + Send + 'static
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut poller = tokio::spawn(self.poller.run(stop_rx));

        info!("serving latest reading on http://{}/", self.local_addr);
        let served = axum::serve(self.listener, responder(self.store))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(BridgeError::Serve);

        let _ = stop_tx.send(true);
        match timeout(self.grace, &mut poller).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!("poller task ended abnormally: {err}");
                served?;
                return Err(BridgeError::PollerStopped);
            }
            Err(_) => {
                warn!("poller did not stop within {:?}, aborting it", self.grace);
                poller.abort();
            }
        }

        info!("bridge stopped");
        served
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::oneshot;

    use super::*;
    use crate::adapter::ScriptedSource;

    fn local_config() -> BridgeConfig {
        BridgeConfig::new(SocketAddr::from(([127, 0, 0, 1], 0))).with_poll_interval(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn bind_reports_actual_port() {
        let bound = Bridge::new(ScriptedSource::default(), local_config()).bind().await.unwrap();
        assert_ne!(bound.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let result = Bridge::new(ScriptedSource::default(), BridgeConfig::new(addr)).bind().await;
        match result {
            Err(BridgeError::Bind { addr: reported, .. }) => assert_eq!(reported, addr),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("bind on a taken port should fail")
        }
    }

    #[tokio::test]
    async fn serve_returns_after_shutdown() {
        let source = ScriptedSource::default();
        let bound = Bridge::new(source.clone(), local_config()).bind().await.unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let task = tokio::spawn(bound.serve(async {
            let _ = rx.await;
        }));
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap().unwrap();
        assert!(source.calls() > 0);
    }
}
