use std::ffi::{CStr, c_char};

use crate::{
    domain::{BridgeError, Reading},
    port::ReadingSource
};

#[link(name = "ThnkrEegDecoder")]
unsafe extern "C" {
    /// Pops the oldest queued reading as JSON. Returns a static `""` when the
    /// queue is empty, otherwise a `malloc`ed buffer the caller must free.
    #[link_name = "getThnkrDataJSON"]
    fn thnkr_data_json() -> *mut c_char;
}

/// Reads from `libThnkrEegDecoder`, which opens the headset's serial port
/// and decodes packets on its own thread once loaded.
#[derive(Debug, Default)]
pub struct NativeDecoder {
    _private: ()
}

impl NativeDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadingSource for NativeDecoder {
    fn current_reading(&self) -> Result<Option<Reading>, BridgeError> {
        // SAFETY: takes no arguments; the library initializes itself on load.
        let ptr = unsafe { thnkr_data_json() };
        if ptr.is_null() {
            return Err(BridgeError::Decoder("decoder returned a null pointer".into()));
        }

        // SAFETY: non-null and NUL-terminated per the library contract.
        let raw = unsafe { CStr::from_ptr(ptr) };
        if raw.is_empty() {
            // static literal, not ours to free
            return Ok(None);
        }

        let text = raw.to_str().map(str::to_owned);
        // SAFETY: non-empty payloads are heap buffers handed over to us.
        unsafe { libc::free(ptr.cast()) };

        Ok(Some(Reading::from(text?)))
    }
}
