//! histoslider-rs: an interactive histogram widget with a draggable
//! multi-segment range selection.
//!
//! The engine samples bucketed data into one column per horizontal pixel,
//! lays a contiguous multi-segment selection over it, and turns pointer
//! input into drags, hover, toggles, and handle edits. Drawing goes through
//! backend-agnostic primitives; a cairo backend ships behind the
//! `cairo-backend` feature.

pub mod animation;
pub mod api;
pub mod core;
pub mod error;
pub mod events;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{RefreshOptions, SelectionEngine, SelectionEngineConfig, ValueLabelFormatterFn};
pub use error::{HistogramError, HistogramResult};
