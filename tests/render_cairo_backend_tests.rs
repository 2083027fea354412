#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use histoslider_rs::HistogramError;
use histoslider_rs::api::{RefreshOptions, SelectionEngine, SelectionEngineConfig};
use histoslider_rs::core::{Bucket, HistogramSelection, SegmentIcon, SegmentSpec, Viewport};
use histoslider_rs::render::{CairoRenderer, Color};

fn two_buckets() -> Vec<Bucket> {
    vec![Bucket::new(0.0, 10.0, 40.0), Bucket::new(10.0, 20.0, 60.0)]
}

fn full_range_selection() -> HistogramSelection {
    HistogramSelection::range(vec![SegmentSpec::new(0.0, 10.0), SegmentSpec::new(10.0, 20.0)])
        .expect("valid selection")
}

fn cairo_engine() -> SelectionEngine<CairoRenderer> {
    let renderer = CairoRenderer::new(100, 50).expect("renderer");
    let mut engine =
        SelectionEngine::new(renderer, SelectionEngineConfig::new(Viewport::new(100, 50)))
            .expect("engine init");
    engine
        .refresh(&two_buckets(), full_range_selection(), RefreshOptions::default())
        .expect("refresh succeeds");
    engine
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 50).expect_err("invalid width must fail");
    assert!(matches!(err, HistogramError::InvalidData(_)));
}

#[test]
fn cairo_renderer_rejects_invalid_clear_color() {
    let mut renderer = CairoRenderer::new(100, 50).expect("renderer");
    let err = renderer
        .set_clear_color(Color::rgb(2.0, 0.0, 0.0))
        .expect_err("bad channel must fail");
    assert!(matches!(err, HistogramError::InvalidData(_)));
}

#[test]
fn cairo_renderer_draws_bars_handles_and_labels() {
    let mut engine = cairo_engine();
    engine.show_selection_labels();

    engine.render().expect("render");

    let renderer = engine.into_renderer();
    let stats = renderer.last_stats();
    assert_eq!(stats.rects_drawn, 100);
    assert_eq!(stats.lines_drawn, 3);
    assert_eq!(stats.texts_drawn, 3);
    assert_eq!(stats.images_drawn, 0);
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let mut engine = cairo_engine();

    let surface = ImageSurface::create(Format::ARgb32, 100, 50).expect("surface");
    let context = Context::new(&surface).expect("context");
    engine
        .render_on_cairo_context(&context)
        .expect("render on context");

    let renderer = engine.into_renderer();
    assert_eq!(renderer.last_stats().rects_drawn, 100);
}

#[test]
fn cairo_renderer_reports_missing_icon_files() {
    let renderer = CairoRenderer::new(100, 50).expect("renderer");
    let mut engine =
        SelectionEngine::new(renderer, SelectionEngineConfig::new(Viewport::new(100, 50)))
            .expect("engine init");
    let selection = HistogramSelection::range(vec![
        SegmentSpec::new(0.0, 20.0).with_icon(SegmentIcon::stretched("definitely-missing.png", 12.0)),
    ])
    .expect("valid selection");
    engine
        .refresh(&two_buckets(), selection, RefreshOptions::default())
        .expect("refresh succeeds");

    let err = engine.render().expect_err("missing icon must fail");
    assert!(matches!(err, HistogramError::InvalidData(_)));
}
