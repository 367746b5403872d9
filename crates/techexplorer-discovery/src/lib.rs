//! Technology discovery: turns free text into tags and catalog matches.
//!
//! Everything here is pure and backed by static tables, so it can be called
//! from any number of concurrent requests without coordination.

pub mod context;
pub mod fallback;
pub mod recommend;

pub use context::{extract, ExtractedContext, Priority, Sector, UseCase};
pub use fallback::respond;
pub use recommend::{next_step, next_step_for, recommend, Recommendation};
