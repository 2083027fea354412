pub mod coordinate_mapper;
pub mod label_layout;
pub mod selection;
pub mod types;

pub use coordinate_mapper::CoordinateMapper;
pub use selection::{
    HistogramSelection, IconAlign, IconWidth, PixelRange, SegmentIcon, SegmentSpec, SelectionMode,
    SelectionPoint, SelectionSegment, needs_refresh,
};
pub use types::{Bucket, MinMax, Sample, Viewport};
