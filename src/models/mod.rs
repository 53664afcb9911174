// Core data models for Leadline
// These structs represent the lead pipeline entities

pub mod status;
pub mod stage;
pub mod lead;
pub mod session;

pub use status::*;
pub use stage::*;
pub use lead::*;
pub use session::*;
