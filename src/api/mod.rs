mod drag_controller;
mod edit_controller;
mod engine;
mod engine_config;
mod frame_builder;
mod observer_registry;
mod pointer_controller;
mod refresh_controller;
mod style_resolver;
mod transition_controller;

pub use engine::SelectionEngine;
pub use engine_config::{RefreshOptions, SelectionEngineConfig};

use std::sync::Arc;

/// Formatter turning a boundary value into its handle label text.
pub type ValueLabelFormatterFn = Arc<dyn Fn(f64) -> String + Send + Sync + 'static>;
