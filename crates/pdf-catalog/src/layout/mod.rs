//! Page geometry and pagination for product pages
//!
//! - Card slot geometry solved once per run from the page format
//! - The cover/product-page state machine that hands out slots

mod engine;
mod spec;
mod types;

pub use engine::*;
pub use spec::*;
pub use types::*;
