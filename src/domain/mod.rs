mod config;
mod error;
mod reading;
mod store;

pub use config::*;
pub use error::*;
pub use reading::*;
pub use store::*;
