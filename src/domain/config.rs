use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration
};

/// Default cadence of the decoder poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(700);

/// Consecutive cycles without an update before the poller notes a stale streak.
pub const DEFAULT_STALE_AFTER: u32 = 50;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub bind:          SocketAddr,
    pub poll_interval: Duration,
    pub stale_after:   u32
}

impl BridgeConfig {
    pub fn new(bind: SocketAddr) -> Self {
        Self { bind, ..Default::default() }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_stale_after(mut self, cycles: u32) -> Self {
        self.stale_after = cycles;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind:          SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            poll_interval: DEFAULT_POLL_INTERVAL,
            stale_after:   DEFAULT_STALE_AFTER
        }
    }
}
