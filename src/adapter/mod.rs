mod http;
#[cfg(feature = "native-decoder")]
mod native;
mod scripted;
mod simulated;

pub use http::*;
#[cfg(feature = "native-decoder")]
pub use native::*;
pub use scripted::*;
pub use simulated::*;
