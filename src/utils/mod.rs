pub mod date;
pub mod duration;

pub use date::{format_timestamp, parse_timestamp};
pub use duration::parse_duration;
