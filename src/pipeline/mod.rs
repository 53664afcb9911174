// Lead pipeline progress: status tables, canonicalization, resolver and
// transition validation

pub mod normalize;
pub mod tables;
pub mod resolver;
pub mod transition;

pub use normalize::{canonicalize, same_status};
pub use tables::{canonical_index, default_stages, transitions_from, CANONICAL_ORDER, TRANSITIONS};
pub use resolver::*;
pub use transition::{build_status_update, TransitionError};
