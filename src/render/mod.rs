mod frame;
mod null_renderer;
pub(crate) mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, ImagePrimitive, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};

use crate::error::HistogramResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from selection and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> HistogramResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
