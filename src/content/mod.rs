//! Content module
//!
//! Static site content served by the API: solutions and enrichment activities.

mod model;
mod store;

pub use model::{Enrichment, Solution};
pub use store::ContentStore;
