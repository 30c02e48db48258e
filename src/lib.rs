#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod decoration;
pub mod engine;
pub mod geometry;
pub mod icons;
pub mod ir;
pub mod layout;
pub mod log;
pub mod render;
pub mod shape;
pub mod style;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{load_config, parse_config, DesignConfig};
pub use engine::{Engine, RenderParams};
pub use shape::{Reconciliation, StyleChange};
pub use style::{StyleKey, StyleMap};
