//! Multi-step agent: clause splitting, intent routing and step memory

pub mod memory;
pub mod router;

pub use memory::{Memory, Step, StepKind, StepValue};
pub use router::{classify, split_clauses, Intent, Router};
