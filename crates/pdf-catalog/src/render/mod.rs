mod canvas;
mod card;
mod cover;
mod page;

pub use canvas::PageCanvas;
pub use card::{Card, CardMetrics, CardRenderer, Density, plan_density};
pub use cover::{BoxTier, CoverRenderer};
pub use page::PageChrome;
