mod adapter;
mod domain;
mod port;
mod service;

pub mod prelude {
    pub use super::{adapter::*, domain::*, port::*, service::*};
}
