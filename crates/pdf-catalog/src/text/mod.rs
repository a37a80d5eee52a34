//! Text measurement, wrapping, fitting and truncation

pub mod fit;
pub mod metrics;
pub mod truncate;
pub mod wrap;

pub use fit::{FitRequest, FittedText, TextFitter};
pub use metrics::{BuiltinFont, FnMetrics, TextMetrics, encode_win_ansi};
pub use truncate::{ellipsize_to_width, limit_lines, smart_truncate};
pub use wrap::{block_width, wrap_text};
