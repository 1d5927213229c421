mod bridge;
mod poller;

pub use bridge::*;
pub use poller::*;
