pub mod config;
pub mod store;

pub use config::*;
pub use store::*;
