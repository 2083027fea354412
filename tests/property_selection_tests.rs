use histoslider_rs::animation::{SelectionTransition, TransitionToken};
use histoslider_rs::api::{RefreshOptions, SelectionEngine, SelectionEngineConfig};
use histoslider_rs::core::{Bucket, CoordinateMapper, HistogramSelection, SegmentSpec, Viewport};
use histoslider_rs::render::NullRenderer;
use proptest::prelude::*;

fn contiguous_buckets(count: usize, min: f64, span: f64) -> Vec<Bucket> {
    let width = span / count as f64;
    (0..count)
        .map(|i| {
            let from = min + i as f64 * width;
            Bucket::new(from, from + width, 10.0 + i as f64)
        })
        .collect()
}

fn three_segment_engine(width: u32, handle_edit: bool) -> SelectionEngine<NullRenderer> {
    let config = SelectionEngineConfig::new(Viewport::new(width, 50)).with_handle_edit(handle_edit);
    let mut engine =
        SelectionEngine::new(NullRenderer::default(), config).expect("engine config is valid");
    let buckets = vec![Bucket::new(0.0, 50.0, 30.0), Bucket::new(50.0, 100.0, 70.0)];
    let selection = HistogramSelection::range(vec![
        SegmentSpec::new(0.0, 30.0),
        SegmentSpec::new(30.0, 60.0),
        SegmentSpec::new(60.0, 100.0),
    ])
    .expect("valid selection");
    engine
        .refresh(&buckets, selection, RefreshOptions::default())
        .expect("refresh succeeds");
    engine
}

/// Tokens are engine-issued; mint one with a throwaway animated refresh.
fn mint_token() -> TransitionToken {
    let mut engine = three_segment_engine(100, false);
    let selection = HistogramSelection::range(vec![
        SegmentSpec::new(0.0, 40.0),
        SegmentSpec::new(40.0, 60.0),
        SegmentSpec::new(60.0, 100.0),
    ])
    .expect("valid selection");
    let buckets = vec![Bucket::new(0.0, 50.0, 30.0), Bucket::new(50.0, 100.0, 70.0)];
    engine
        .refresh(&buckets, selection, RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued")
}

proptest! {
    #[test]
    fn position_value_round_trip_property(
        width in 2u32..2000,
        bucket_count in 1usize..12,
        min in -1000.0f64..1000.0,
        span in 1.0f64..500.0,
        position_factor in 0.0f64..1.0
    ) {
        let buckets = contiguous_buckets(bucket_count, min, span);
        let mapper = CoordinateMapper::new(&buckets, width).expect("valid mapper");

        let position = (position_factor * f64::from(width)).round() as u32;
        let value = mapper.position_to_value(position);
        prop_assert_eq!(mapper.value_to_position(value), position);

        let min_max = mapper.min_max();
        prop_assert!(value >= min_max.min - 1e-9);
        prop_assert!(value <= min_max.max + 1e-9);
    }

    #[test]
    fn value_to_position_is_monotonic_property(
        width in 2u32..1000,
        bucket_count in 1usize..8,
        min in -100.0f64..100.0,
        span in 1.0f64..200.0,
        factor_a in -0.2f64..1.2,
        factor_b in -0.2f64..1.2
    ) {
        let buckets = contiguous_buckets(bucket_count, min, span);
        let mapper = CoordinateMapper::new(&buckets, width).expect("valid mapper");

        let value_a = min + factor_a * span;
        let value_b = min + factor_b * span;
        let (low, high) = if value_a <= value_b {
            (value_a, value_b)
        } else {
            (value_b, value_a)
        };

        prop_assert!(mapper.value_to_position(low) <= mapper.value_to_position(high));
    }

    #[test]
    fn drag_sequences_keep_segments_contiguous_property(
        width in 50u32..500,
        moves in prop::collection::vec((0usize..4, 0.0f64..1.0), 1..16)
    ) {
        let mut engine = three_segment_engine(width, false);

        for (handle, factor) in moves {
            let x = f64::from(engine.handles()[handle].x_position());
            engine.pointer_down(x, 10.0);
            engine.pointer_move(factor * f64::from(width), 10.0);
            engine.pointer_up();

            let selection = engine.selection().expect("selection present");
            for segment in selection.segments() {
                prop_assert!(segment.from <= segment.to);
                prop_assert!(segment.position.from <= segment.position.to);
            }
            for pair in selection.segments().windows(2) {
                prop_assert_eq!(pair[0].to, pair[1].from);
                prop_assert_eq!(pair[0].position.to, pair[1].position.from);
            }
            let points = selection.selection_points();
            for pair in points.windows(2) {
                prop_assert!(pair[0].value <= pair[1].value);
            }
        }
    }

    #[test]
    fn edits_preserve_boundary_ordering_property(
        raw in -50.0f64..150.0,
        handle in 0usize..4
    ) {
        let mut engine = three_segment_engine(200, true);
        engine
            .resolve_handle_edit(handle, &format!("{raw}"))
            .expect("finite input resolves");

        let selection = engine.selection().expect("selection present");
        let points = selection.selection_points();
        for pair in points.windows(2) {
            prop_assert!(pair[0].value <= pair[1].value);
        }
        for point in &points {
            prop_assert!((0.0..=100.0).contains(&point.value));
        }
    }

    #[test]
    fn transition_plans_cover_every_moving_track_property(
        width in 2u32..2000,
        tracks in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 1..6)
    ) {
        let pairs: Vec<(u32, u32)> = tracks
            .iter()
            .map(|&(source, target)| {
                (
                    (source * f64::from(width)).round() as u32,
                    (target * f64::from(width)).round() as u32,
                )
            })
            .collect();
        let any_moving = pairs.iter().any(|&(source, target)| source != target);

        let Some(transition) = SelectionTransition::plan(mint_token(), &pairs, width) else {
            prop_assert!(!any_moving);
            return Ok(());
        };
        prop_assert!(any_moving);

        let span = transition.span_ms();
        for step in transition.steps() {
            prop_assert!(step.at_ms > 0.0);
            prop_assert!(step.at_ms <= span + 1e-6);
        }

        for (point_index, &(source, target)) in pairs.iter().enumerate() {
            let track: Vec<_> = transition
                .steps()
                .iter()
                .filter(|step| step.point_index == point_index)
                .collect();
            if source == target {
                prop_assert!(track.is_empty());
                continue;
            }

            prop_assert_eq!(track.len() as u32, source.abs_diff(target) + 1);
            prop_assert_eq!(track[0].pixel, source);
            let last = track.last().expect("track has steps");
            prop_assert_eq!(last.pixel, target);
            prop_assert!(last.final_for_point);
            prop_assert!((last.at_ms - span).abs() <= 1e-6);
            for pair in track.windows(2) {
                prop_assert_eq!(pair[0].pixel.abs_diff(pair[1].pixel), 1);
            }
        }
    }
}
