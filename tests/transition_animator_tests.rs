use histoslider_rs::animation::{
    SelectionTransition, TRANSITION_TICK_MS, TransitionProgress, TransitionToken,
};
use histoslider_rs::api::{RefreshOptions, SelectionEngine, SelectionEngineConfig};
use histoslider_rs::core::{Bucket, HistogramSelection, SegmentSpec, Viewport};
use histoslider_rs::interaction::InteractionPhase;
use histoslider_rs::render::NullRenderer;

fn build_engine(width: u32, height: u32) -> SelectionEngine<NullRenderer> {
    SelectionEngine::new(
        NullRenderer::default(),
        SelectionEngineConfig::new(Viewport::new(width, height)),
    )
    .expect("engine config is valid")
}

fn two_buckets() -> Vec<Bucket> {
    vec![Bucket::new(0.0, 10.0, 40.0), Bucket::new(10.0, 20.0, 60.0)]
}

fn base_selection() -> HistogramSelection {
    HistogramSelection::range(vec![SegmentSpec::new(0.0, 10.0), SegmentSpec::new(10.0, 20.0)])
        .expect("valid selection")
}

fn shifted_selection() -> HistogramSelection {
    HistogramSelection::range(vec![SegmentSpec::new(0.0, 14.0), SegmentSpec::new(14.0, 20.0)])
        .expect("valid selection")
}

/// Engine with one rendered base selection, ready for an animated refresh.
fn animated_engine() -> SelectionEngine<NullRenderer> {
    let mut engine = build_engine(100, 50);
    engine
        .refresh(&two_buckets(), base_selection(), RefreshOptions::default())
        .expect("refresh succeeds");
    engine
}

/// Tokens only come out of the engine, so the planning tests mint one with a
/// throwaway animated refresh.
fn token() -> TransitionToken {
    let mut engine = animated_engine();
    engine
        .refresh(&two_buckets(), shifted_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued")
}

#[test]
fn plan_returns_none_when_nothing_moves() {
    assert!(SelectionTransition::plan(token(), &[(10, 10), (64, 64)], 100).is_none());
}

#[test]
fn plan_schedules_one_step_per_pixel() {
    let transition =
        SelectionTransition::plan(token(), &[(0, 4)], 100).expect("one moving track");

    assert!((transition.span_ms() - TRANSITION_TICK_MS * 100.0).abs() <= 1e-9);

    let steps = transition.steps();
    assert_eq!(steps.len(), 5);
    for (k, step) in steps.iter().enumerate() {
        assert_eq!(step.point_index, 0);
        assert_eq!(step.pixel, k as u32);
        assert!((step.at_ms - (k + 1) as f64 * 10.0).abs() <= 1e-9);
        assert_eq!(step.final_for_point, k == 4);
    }
}

#[test]
fn plan_sweeps_backwards_too() {
    let transition =
        SelectionTransition::plan(token(), &[(4, 0)], 100).expect("one moving track");

    let pixels: Vec<u32> = transition.steps().iter().map(|step| step.pixel).collect();
    assert_eq!(pixels, vec![4, 3, 2, 1, 0]);
}

#[test]
fn all_tracks_finish_at_the_shared_span() {
    let transition =
        SelectionTransition::plan(token(), &[(0, 2), (10, 4)], 100).expect("two moving tracks");

    let steps = transition.steps();
    assert_eq!(steps.len(), 10);
    let span = transition.span_ms();

    for pair in steps.windows(2) {
        assert!(pair[0].at_ms <= pair[1].at_ms + 1e-9);
    }
    for step in steps {
        assert!(step.at_ms <= span + 1e-6);
    }

    for (point_index, target) in [(0_usize, 2_u32), (1_usize, 4_u32)] {
        let track: Vec<_> = steps
            .iter()
            .filter(|step| step.point_index == point_index)
            .collect();
        let last = track.last().expect("track has steps");
        assert_eq!(last.pixel, target);
        assert!(last.final_for_point);
        assert!((last.at_ms - span).abs() <= 1e-6);
        // Pixels walk one column at a time.
        for pair in track.windows(2) {
            assert_eq!(pair[0].pixel.abs_diff(pair[1].pixel), 1);
        }
    }
}

#[test]
fn advance_releases_steps_as_their_deadlines_pass() {
    let mut transition =
        SelectionTransition::plan(token(), &[(0, 4)], 100).expect("one moving track");

    assert_eq!(transition.advance(10.0), 0..1);
    assert_eq!(transition.advance(25.0), 1..3);
    assert_eq!(transition.remaining(), 2);
    assert!(!transition.is_complete());

    // Negative and non-finite deltas hold the clock still.
    assert_eq!(transition.advance(-5.0), 3..3);
    assert_eq!(transition.advance(f64::NAN), 3..3);
    assert!((transition.elapsed_ms() - 35.0).abs() <= 1e-9);

    assert_eq!(transition.advance(15.0), 3..5);
    assert!(transition.is_complete());
    assert_eq!(transition.remaining(), 0);
}

#[test]
fn advancing_by_exactly_the_span_completes() {
    let mut transition =
        SelectionTransition::plan(token(), &[(50, 70)], 100).expect("one moving track");

    // 21 steps whose last deadline is the full span up to float rounding.
    assert_eq!(transition.steps().len(), 21);
    let due = transition.advance(transition.span_ms());
    assert_eq!(due, 0..21);
    assert!(transition.is_complete());
}

#[test]
fn animated_refresh_returns_a_token_and_parks_handles() {
    let mut engine = animated_engine();

    let token = engine
        .refresh(&two_buckets(), shifted_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");

    assert_eq!(engine.phase(), InteractionPhase::Animating);
    let transition = engine.active_transition().expect("transition in flight");
    assert_eq!(transition.token(), token);
    assert_eq!(transition.steps().len(), 21);

    // The moving handle starts at its previous column but already carries
    // the new boundary value.
    assert_eq!(engine.handles()[1].x_position(), 50);
    assert!((engine.handles()[1].value() - 14.0).abs() <= 1e-9);
    assert_eq!(engine.handles()[0].x_position(), 0);
    assert_eq!(engine.handles()[2].x_position(), 100);
}

#[test]
fn advance_animation_walks_the_handle_towards_its_target() {
    let mut engine = animated_engine();
    engine
        .refresh(&two_buckets(), shifted_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");

    // Two deadlines (at span / 21 and 2 * span / 21 ms) fall within 5 ms.
    let progress = engine.advance_animation(0.005);
    assert_eq!(
        progress,
        TransitionProgress::Running {
            applied: 2,
            remaining: 19,
        }
    );
    assert_eq!(engine.phase(), InteractionPhase::Animating);
    assert_eq!(engine.handles()[1].x_position(), 51);

    let progress = engine.advance_animation(0.045);
    assert_eq!(progress, TransitionProgress::Completed);
    assert_eq!(engine.phase(), InteractionPhase::Rendered);
    assert_eq!(engine.handles()[1].x_position(), 70);
    assert!(engine.active_transition().is_none());
}

#[test]
fn advance_animation_without_a_transition_is_idle() {
    let mut engine = animated_engine();
    assert_eq!(engine.advance_animation(0.016), TransitionProgress::Idle);
}

#[test]
fn the_sweep_wipes_new_styling_across_the_bars() {
    let mut engine = build_engine(100, 50);
    let previous = HistogramSelection::range(vec![
        SegmentSpec::new(0.0, 10.0).disabled(),
        SegmentSpec::new(10.0, 20.0),
    ])
    .expect("valid selection");
    engine
        .refresh(&two_buckets(), previous, RefreshOptions::default())
        .expect("refresh succeeds");

    let next = HistogramSelection::range(vec![
        SegmentSpec::new(0.0, 14.0).disabled(),
        SegmentSpec::new(14.0, 20.0),
    ])
    .expect("valid selection");
    engine
        .refresh(&two_buckets(), next, RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");

    let config = engine.config().clone();
    let selection_color = config.selection_color;
    let inactive_red = config.inactive_bar_color.red;

    let rect_color = |engine: &SelectionEngine<NullRenderer>, x: f64| {
        engine
            .frame()
            .rects
            .iter()
            .find(|rect| (rect.x - x).abs() <= 1e-9)
            .expect("bar column present")
            .fill_color
    };

    // Before any step the frame still wears the previous selection's
    // styling: columns 60 and 65 sat in the enabled segment.
    assert!((rect_color(&engine, 60.0).red - selection_color.red).abs() <= 1e-9);
    assert!((rect_color(&engine, 65.0).red - selection_color.red).abs() <= 1e-9);

    // Eleven steps land within 26.2 ms and carry the handle to column 60.
    engine.advance_animation(0.0262);
    assert_eq!(engine.handles()[1].x_position(), 60);
    assert!((rect_color(&engine, 60.0).red - inactive_red).abs() <= 1e-9);
    assert!((rect_color(&engine, 65.0).red - selection_color.red).abs() <= 1e-9);

    engine.advance_animation(1.0);
    assert!((rect_color(&engine, 65.0).red - inactive_red).abs() <= 1e-9);
    assert!((rect_color(&engine, 75.0).red - selection_color.red).abs() <= 1e-9);
}

#[test]
fn cancelling_snaps_handles_to_their_targets() {
    let mut engine = animated_engine();
    let token = engine
        .refresh(&two_buckets(), shifted_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");
    engine.advance_animation(0.005);

    assert!(engine.cancel_transition(token));
    assert_eq!(engine.phase(), InteractionPhase::Rendered);
    assert_eq!(engine.handles()[1].x_position(), 70);
    assert!(engine.active_transition().is_none());

    // A second cancel with the same token is a no-op.
    assert!(!engine.cancel_transition(token));
}

#[test]
fn stale_tokens_cannot_cancel_a_newer_transition() {
    let mut engine = animated_engine();
    let first = engine
        .refresh(&two_buckets(), shifted_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");

    let second = engine
        .refresh(&two_buckets(), base_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");
    assert_ne!(first, second);

    assert!(!engine.cancel_transition(first));
    assert!(engine.active_transition().is_some());
    assert!(engine.cancel_transition(second));
}

#[test]
fn a_plain_refresh_supersedes_the_running_transition() {
    let mut engine = animated_engine();
    let token = engine
        .refresh(&two_buckets(), shifted_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");

    engine
        .refresh(&two_buckets(), base_selection(), RefreshOptions::default())
        .expect("refresh succeeds");

    assert_eq!(engine.phase(), InteractionPhase::Rendered);
    assert!(engine.active_transition().is_none());
    assert!(!engine.cancel_transition(token));
}

#[test]
fn an_interrupted_sweep_continues_from_the_shown_positions() {
    let mut engine = animated_engine();
    engine
        .refresh(&two_buckets(), shifted_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");
    engine.advance_animation(0.005);
    assert_eq!(engine.handles()[1].x_position(), 51);

    // Animating back: the new sweep starts where the handle is shown, one
    // column away from its original position.
    let token = engine
        .refresh(&two_buckets(), base_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");
    assert_eq!(token.generation(), 2);

    let transition = engine.active_transition().expect("transition in flight");
    assert_eq!(transition.steps().len(), 2);
    assert_eq!(engine.handles()[1].x_position(), 51);

    engine.advance_animation(0.051);
    assert_eq!(engine.handles()[1].x_position(), 50);
    assert_eq!(engine.phase(), InteractionPhase::Rendered);
}

#[test]
fn animated_refresh_without_movement_renders_directly() {
    let mut engine = animated_engine();

    let token = engine
        .refresh(&two_buckets(), base_selection(), RefreshOptions::animated())
        .expect("refresh succeeds");

    assert!(token.is_none());
    assert_eq!(engine.phase(), InteractionPhase::Rendered);
    assert!(engine.active_transition().is_none());
}

#[test]
fn segment_count_changes_skip_the_animation() {
    let mut engine = animated_engine();

    let single =
        HistogramSelection::range(vec![SegmentSpec::new(0.0, 20.0)]).expect("valid selection");
    let token = engine
        .refresh(&two_buckets(), single, RefreshOptions::animated())
        .expect("refresh succeeds");

    assert!(token.is_none());
    assert_eq!(engine.phase(), InteractionPhase::Rendered);
    assert_eq!(engine.handle_count(), 2);
}

#[test]
fn the_first_refresh_never_animates() {
    let mut engine = build_engine(100, 50);

    let token = engine
        .refresh(&two_buckets(), base_selection(), RefreshOptions::animated())
        .expect("refresh succeeds");

    assert!(token.is_none());
    assert_eq!(engine.phase(), InteractionPhase::Rendered);
}

#[test]
fn pointer_down_interrupts_the_sweep_and_starts_a_drag() {
    let mut engine = animated_engine();
    engine
        .refresh(&two_buckets(), shifted_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");

    // Handles snap to their targets before the hit test runs.
    engine.pointer_down(70.0, 10.0);

    assert_eq!(engine.phase(), InteractionPhase::Dragging);
    assert!(engine.handles()[1].is_dragging());
    assert_eq!(engine.handles()[1].x_position(), 70);
    assert!(engine.active_transition().is_none());
}

#[test]
fn handle_edits_interrupt_the_sweep() {
    let config = SelectionEngineConfig::new(Viewport::new(100, 50)).with_handle_edit(true);
    let mut engine =
        SelectionEngine::new(NullRenderer::default(), config).expect("engine config is valid");
    engine
        .refresh(&two_buckets(), base_selection(), RefreshOptions::default())
        .expect("refresh succeeds");
    engine
        .refresh(&two_buckets(), shifted_selection(), RefreshOptions::animated())
        .expect("refresh succeeds")
        .expect("token issued");

    let changed = engine.resolve_handle_edit(1, "12").expect("edit resolves");
    assert!(changed);
    assert_eq!(engine.phase(), InteractionPhase::Rendered);
    assert!(engine.active_transition().is_none());
    assert_eq!(
        engine.handles()[1].x_position(),
        engine
            .mapper()
            .expect("mapper present")
            .value_to_position(12.0)
    );
}
