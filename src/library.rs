//! Music library scanning and modeling.

mod model;
mod scan;

pub use model::*;
pub use scan::*;
