#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod load_settings;
mod raw_settings;
mod settings;
mod utils;

pub use load_settings::*;
pub use raw_settings::*;
pub use settings::*;
pub use utils::*;
