use crate::domain::{BridgeError, Reading};

/// Abstraction over whatever decodes the headset stream.
///
/// `current_reading` may block; the poller runs it off the async workers.
/// `Ok(None)` means nothing new arrived since the last call.
pub trait ReadingSource: Send + Sync {
    fn current_reading(&self) -> Result<Option<Reading>, BridgeError>;
}
