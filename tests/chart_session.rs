//! Integration tests for `ChartSession`.
//!
//! These tests drive a complete hotel chart through the session:
//! 1. Rendering keeps every bar stacked on the bars before it
//! 2. Preference changes are saved, undone and redone
//! 3. Alternatives are reordered by drag and by sort
//! 4. Structure edits are diffed and user preferences repaired
//!
//! Observers and render sinks are the in-memory adapters.

use std::sync::Arc;

use valuecharts::adapters::{InMemoryChartObserver, InMemoryRenderSink};
use valuecharts::application::{ChartSession, GestureEvent, GestureOutcome};
use valuecharts::config::AppConfig;
use valuecharts::domain::foundation::ErrorCode;
use valuecharts::domain::maintenance::{PreferenceRepair, StructureDiff};
use valuecharts::domain::model::{
    AbstractObjective, Alternative, ChangeKind, Chart, ChartType, Domain, Objective,
    PrimitiveObjective, ScoreFunction, ScoreFunctionMap, User, WeightMap,
};
use valuecharts::domain::sorting::{DragPhase, Reordered, SortMode, TrackLayout};

// =============================================================================
// Test Infrastructure
// =============================================================================

const TOLERANCE: f64 = 1e-9;

fn objectives() -> Vec<Objective> {
    vec![
        PrimitiveObjective::new("rate", Domain::continuous(50.0, 200.0)).into(),
        AbstractObjective::new(
            "location",
            vec![PrimitiveObjective::new(
                "area",
                Domain::categorical(["nightlife", "beach", "airport"]),
            )
            .into()],
        )
        .unwrap()
        .into(),
    ]
}

fn user(
    name: &str,
    weights: [f64; 2],
    rate_at_max: f64,
    areas: [f64; 3],
) -> User {
    let mut functions = ScoreFunctionMap::new();
    functions.set(
        "rate",
        ScoreFunction::continuous([(50.0, 1.0), (200.0, rate_at_max)]).unwrap(),
    );
    functions.set(
        "area",
        ScoreFunction::discrete([
            ("nightlife", areas[0]),
            ("beach", areas[1]),
            ("airport", areas[2]),
        ])
        .unwrap(),
    );
    User::new(name)
        .with_weight_map(WeightMap::from_pairs([("rate", weights[0]), ("area", weights[1])]).unwrap())
        .with_score_functions(functions)
}

fn hotel_chart() -> Chart {
    let mut chart = Chart::new("Hotels", "aaron", ChartType::Group);
    chart.set_root_objectives(objectives()).unwrap();
    for (name, rate, area) in [
        ("Sheraton", 50.0, "beach"),
        ("Hyatt", 150.0, "nightlife"),
        ("Fairmont", 200.0, "beach"),
        ("Ramada", 100.0, "airport"),
    ] {
        chart
            .add_alternative(
                Alternative::new(name)
                    .with_consequence("rate", rate)
                    .with_consequence("area", area),
            )
            .unwrap();
    }
    chart
        .add_user(user("aaron", [0.3, 0.7], 0.0, [0.5, 1.0, 0.0]))
        .unwrap();
    chart
        .add_user(user("beth", [0.6, 0.4], 0.2, [1.0, 0.4, 0.0]))
        .unwrap();
    chart
}

fn config(sort_mode: SortMode) -> AppConfig {
    let mut config = AppConfig::default();
    config.interaction.sort_mode = sort_mode;
    config.interaction.adjust_weights = true;
    config.interaction.adjust_score_functions = true;
    config
}

struct Harness {
    session: ChartSession,
    observer: Arc<InMemoryChartObserver>,
    sink: Arc<InMemoryRenderSink>,
}

fn harness(sort_mode: SortMode) -> Harness {
    let mut session = ChartSession::new(hotel_chart(), &config(sort_mode));
    let observer = Arc::new(InMemoryChartObserver::new());
    let sink = Arc::new(InMemoryRenderSink::new());
    session.subscribe(observer.clone());
    session.add_render_sink(sink.clone());
    Harness {
        session,
        observer,
        sink,
    }
}

fn order(session: &ChartSession) -> Vec<String> {
    session
        .chart()
        .alternatives()
        .iter()
        .map(|a| a.name().to_string())
        .collect()
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn rendered_bars_stack_on_the_bars_before_them() {
    let mut h = harness(SortMode::Manual);
    let view = h.session.render().unwrap();

    assert_eq!(view.row_data.len(), 2);
    for row in &view.row_data {
        assert_eq!(row.cells.len(), 4);
        for cell in &row.cells {
            let mut expected = 0.0;
            for bar in &cell.user_scores {
                assert!((bar.offset - expected).abs() < TOLERANCE);
                expected += bar.weight * bar.score;
            }
        }
    }
    assert_eq!(h.sink.render_count(), 1);
}

#[test]
fn row_offsets_use_the_weights_of_displayed_users_only() {
    let mut h = harness(SortMode::Manual);

    let view = h.session.render().unwrap();
    assert!((view.row("area").unwrap().weight_offset - 0.6).abs() < TOLERANCE);

    h.session
        .set_displayed_users(vec!["aaron".to_string()])
        .unwrap();
    let view = h.session.view().unwrap();
    assert_eq!(view.row("rate").unwrap().weight_offset, 0.0);
    assert!((view.row("area").unwrap().weight_offset - 0.3).abs() < TOLERANCE);
}

#[test]
fn displaying_an_unknown_user_is_rejected() {
    let mut h = harness(SortMode::Manual);

    let err = h
        .session
        .set_displayed_users(vec!["ghost".to_string()])
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::UserNotFound);
    assert_eq!(h.session.displayed_users().len(), 2);
}

#[test]
fn score_totals_pick_each_users_favourite() {
    let mut h = harness(SortMode::Manual);

    let totals = h.session.score_totals().unwrap();

    assert_eq!(totals.best_alternative("aaron"), Some("Sheraton"));
    assert_eq!(totals.best_alternative("beth"), Some("Sheraton"));
    assert!((totals.total("Sheraton", "aaron").unwrap() - 1.0).abs() < TOLERANCE);
    assert!((totals.total("Ramada", "beth").unwrap() - 0.44).abs() < 1e-6);
}

// =============================================================================
// Preferences and history
// =============================================================================

#[test]
fn weight_change_is_saved_once_and_can_be_undone() {
    let mut h = harness(SortMode::Manual);
    h.session.render().unwrap();
    let balanced = WeightMap::from_pairs([("rate", 0.5), ("area", 0.5)]).unwrap();

    assert!(h.session.set_weight_map("aaron", balanced.clone()).unwrap());
    assert!(!h.session.set_weight_map("aaron", balanced.clone()).unwrap());
    assert_eq!(h.session.history().undo_depth(), 1);
    assert!(h.observer.has_event("chart.weight_map_changed.v1"));

    assert_eq!(h.session.undo().unwrap(), Some(ChangeKind::WeightMap));
    let aaron = h.session.chart().user("aaron").unwrap();
    assert_eq!(aaron.weight_map().weight("rate"), Some(0.3));
    assert!(h.observer.has_event("chart.undo_redo_applied.v1"));

    assert_eq!(h.session.redo().unwrap(), Some(ChangeKind::WeightMap));
    let aaron = h.session.chart().user("aaron").unwrap();
    assert_eq!(*aaron.weight_map(), balanced);
}

#[test]
fn weight_change_refreshes_the_view() {
    let mut h = harness(SortMode::Manual);
    h.session
        .set_displayed_users(vec!["aaron".to_string()])
        .unwrap();
    let renders = h.sink.render_count();

    h.session
        .set_weight_map(
            "aaron",
            WeightMap::from_pairs([("rate", 0.8), ("area", 0.2)]).unwrap(),
        )
        .unwrap();

    let view = h.session.view().unwrap();
    assert!((view.row("area").unwrap().weight_offset - 0.8).abs() < TOLERANCE);
    assert_eq!(h.sink.render_count(), renders + 1);
}

#[test]
fn undoing_every_change_restores_the_original_chart() {
    let mut h = harness(SortMode::Manual);
    let original = h.session.chart().clone();

    h.session
        .set_weight_map(
            "beth",
            WeightMap::from_pairs([("rate", 0.1), ("area", 0.9)]).unwrap(),
        )
        .unwrap();
    h.session
        .set_score_function(
            "aaron",
            "area",
            ScoreFunction::discrete([("nightlife", 1.0), ("beach", 0.0), ("airport", 0.5)])
                .unwrap(),
        )
        .unwrap();
    assert!(h.session.sort_alphabetically().unwrap());
    let edited = h.session.chart().clone();

    assert_eq!(h.session.undo().unwrap(), Some(ChangeKind::AlternativeOrder));
    assert_eq!(h.session.undo().unwrap(), Some(ChangeKind::ScoreFunction));
    assert_eq!(h.session.undo().unwrap(), Some(ChangeKind::WeightMap));
    assert_eq!(h.session.undo().unwrap(), None);
    assert_eq!(*h.session.chart(), original);

    for _ in 0..3 {
        h.session.redo().unwrap();
    }
    assert_eq!(*h.session.chart(), edited);
}

#[test]
fn a_new_change_discards_the_redo_stack() {
    let mut h = harness(SortMode::Manual);
    h.session.sort_alphabetically().unwrap();
    h.session.undo().unwrap();
    assert!(h.session.history().can_redo());

    h.session
        .set_weight_map(
            "aaron",
            WeightMap::from_pairs([("rate", 0.4), ("area", 0.6)]).unwrap(),
        )
        .unwrap();

    assert!(!h.session.history().can_redo());
    assert_eq!(h.session.redo().unwrap(), None);
}

#[test]
fn score_function_of_the_wrong_kind_is_rejected() {
    let mut h = harness(SortMode::Manual);

    let err = h
        .session
        .set_score_function(
            "aaron",
            "rate",
            ScoreFunction::discrete([("cheap", 1.0)]).unwrap(),
        )
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert!(!h.session.history().can_undo());
}

#[test]
fn score_function_that_leaves_a_cell_unscored_is_not_committed_mid_drag() {
    let mut h = harness(SortMode::Manual);
    h.session
        .start_drag(0, &TrackLayout::uniform(4, 400.0))
        .unwrap();
    let before = h.session.chart().clone();

    // Hyatt is in "nightlife", which this function does not score
    let err = h
        .session
        .set_score_function(
            "aaron",
            "area",
            ScoreFunction::discrete([("beach", 1.0)]).unwrap(),
        )
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ModelIncomplete);
    assert_eq!(*h.session.chart(), before);
    assert_eq!(h.session.history().undo_depth(), 1);
    assert_eq!(h.observer.count(), 0);
    assert!(h.session.view().is_some());

    h.session.drag(260.0).unwrap();
    assert_eq!(
        h.session.end_drag().unwrap(),
        Some(Reordered { from: 0, to: 2 })
    );
    assert_eq!(order(&h.session), vec!["Hyatt", "Fairmont", "Sheraton", "Ramada"]);
    assert_eq!(h.session.undo().unwrap(), Some(ChangeKind::AlternativeOrder));
    assert_eq!(order(&h.session), vec!["Sheraton", "Hyatt", "Fairmont", "Ramada"]);
}

#[test]
fn weights_missing_an_objective_are_not_committed() {
    let mut h = harness(SortMode::Manual);
    h.session.render().unwrap();
    let renders = h.sink.render_count();

    let err = h
        .session
        .set_weight_map("beth", WeightMap::from_pairs([("rate", 1.0)]).unwrap())
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ModelIncomplete);
    let beth = h.session.chart().user("beth").unwrap();
    assert_eq!(beth.weight_map().weight("area"), Some(0.4));
    assert!(!h.session.history().can_undo());
    assert_eq!(h.observer.count(), 0);
    assert!(h.session.view().is_some());
    assert_eq!(h.sink.render_count(), renders);
}

#[test]
fn dragging_the_last_alternative_to_the_start_moves_it_first() {
    let mut h = harness(SortMode::Manual);
    h.session
        .start_drag(3, &TrackLayout::uniform(4, 400.0))
        .unwrap();
    h.session.drag(-300.0).unwrap();

    let moved = h.session.end_drag().unwrap();

    assert_eq!(moved, Some(Reordered { from: 3, to: 0 }));
    assert_eq!(order(&h.session), vec!["Ramada", "Sheraton", "Hyatt", "Fairmont"]);
    assert_eq!(
        h.session.view().unwrap().alternative_order(),
        vec!["Ramada", "Sheraton", "Hyatt", "Fairmont"]
    );
    assert_eq!(h.session.sorter().phase(), DragPhase::Idle);
}

#[test]
fn disabled_interactions_are_refused() {
    let mut session = ChartSession::new(hotel_chart(), &AppConfig::default());

    let err = session
        .start_drag(0, &TrackLayout::uniform(4, 400.0))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InteractionDisabled);

    let err = session
        .set_weight_map("aaron", WeightMap::uniform(["rate", "area"]))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InteractionDisabled);

    let err = session.sort_by_objective("rate").unwrap_err();
    assert_eq!(err.code, ErrorCode::InteractionDisabled);

    assert!(session.sort_alphabetically().unwrap());
}

#[test]
fn reordered_objectives_can_be_undone() {
    let mut h = harness(SortMode::Manual);
    h.session.render().unwrap();
    let mut reversed = objectives();
    reversed.reverse();

    h.session.set_objectives(reversed).unwrap();
    let rows: Vec<&str> = h
        .session
        .view()
        .unwrap()
        .row_data
        .iter()
        .map(|r| r.objective.as_str())
        .collect();
    assert_eq!(rows, vec!["area", "rate"]);
    assert!(h.observer.has_event("chart.objectives_changed.v1"));

    assert_eq!(h.session.undo().unwrap(), Some(ChangeKind::Objectives));
    assert_eq!(h.session.view().unwrap().row_data[0].objective, "rate");
}

#[test]
fn objectives_that_cannot_be_drawn_are_not_committed() {
    let mut h = harness(SortMode::Manual);
    let mut roots = objectives();
    roots.push(PrimitiveObjective::new("pool", Domain::categorical(["yes", "no"])).into());

    let err = h.session.set_objectives(roots).unwrap_err();

    assert_eq!(err.code, ErrorCode::ModelIncomplete);
    assert_eq!(h.session.chart().primitive_objectives().len(), 2);
    assert!(!h.session.history().can_undo());
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn dragging_first_alternative_past_two_boxes_moves_it_to_third() {
    let mut h = harness(SortMode::Manual);
    h.session.render().unwrap();

    h.session
        .start_drag(0, &TrackLayout::uniform(4, 400.0))
        .unwrap();
    assert_eq!(h.session.drag(260.0).unwrap().new_index, 2);
    let moved = h.session.end_drag().unwrap();

    assert_eq!(moved, Some(Reordered { from: 0, to: 2 }));
    assert_eq!(order(&h.session), vec!["Hyatt", "Fairmont", "Sheraton", "Ramada"]);
    assert_eq!(
        h.session.view().unwrap().alternative_order(),
        vec!["Hyatt", "Fairmont", "Sheraton", "Ramada"]
    );
    assert!(h.observer.has_event("chart.alternatives_reordered.v1"));
    let update = h.sink.last_update().unwrap();
    assert_eq!(update.row_data[0].cells[2].alternative, "Sheraton");

    assert_eq!(h.session.undo().unwrap(), Some(ChangeKind::AlternativeOrder));
    assert_eq!(order(&h.session), vec!["Sheraton", "Hyatt", "Fairmont", "Ramada"]);
}

#[test]
fn history_is_locked_while_dragging() {
    let mut h = harness(SortMode::Manual);
    h.session
        .start_drag(1, &TrackLayout::uniform(4, 400.0))
        .unwrap();

    let err = h.session.undo().unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    assert!(h.session.sort_alphabetically().is_err());

    h.session.end_drag().unwrap();
    assert_eq!(order(&h.session), vec!["Sheraton", "Hyatt", "Fairmont", "Ramada"]);
}

#[test]
fn sorting_by_rate_puts_the_cheapest_first() {
    let mut h = harness(SortMode::Objective);

    assert!(h.session.sort_by_objective("rate").unwrap());

    assert_eq!(order(&h.session), vec!["Sheraton", "Ramada", "Hyatt", "Fairmont"]);
    assert_eq!(
        h.session.view().unwrap().alternative_order(),
        vec!["Sheraton", "Ramada", "Hyatt", "Fairmont"]
    );
    assert!(!h.session.sort_by_objective("rate").unwrap());
}

#[test]
fn sorting_by_an_unknown_objective_fails() {
    let mut h = harness(SortMode::Objective);

    let err = h.session.sort_by_objective("parking").unwrap_err();

    assert_eq!(err.code, ErrorCode::ObjectiveNotFound);
}

#[test]
fn reset_returns_to_the_opening_order() {
    let mut h = harness(SortMode::Manual);
    h.session.sort_alphabetically().unwrap();

    assert!(h.session.reset_order().unwrap());
    assert_eq!(order(&h.session), vec!["Sheraton", "Hyatt", "Fairmont", "Ramada"]);
    assert!(!h.session.reset_order().unwrap());
}

#[test]
fn gestures_are_dispatched_in_sequence() {
    let mut h = harness(SortMode::Manual);
    let layout = TrackLayout::uniform(4, 400.0);

    let outcomes: Vec<GestureOutcome> = [
        GestureEvent::DragStart { index: 0, layout },
        GestureEvent::DragMove { delta: 260.0 },
        GestureEvent::DragEnd,
        GestureEvent::Undo,
        GestureEvent::Redo,
        GestureEvent::Alphabetical,
    ]
    .into_iter()
    .map(|event| h.session.dispatch(event).unwrap())
    .collect();

    assert_eq!(outcomes[0], GestureOutcome::DragStarted);
    assert!(matches!(outcomes[1], GestureOutcome::Dragged(update) if update.new_index == 2));
    assert_eq!(
        outcomes[2],
        GestureOutcome::Dropped(Some(Reordered { from: 0, to: 2 }))
    );
    assert_eq!(
        outcomes[3],
        GestureOutcome::Replayed(Some(ChangeKind::AlternativeOrder))
    );
    assert_eq!(
        outcomes[4],
        GestureOutcome::Replayed(Some(ChangeKind::AlternativeOrder))
    );
    assert_eq!(outcomes[5], GestureOutcome::Sorted(true));
    assert_eq!(order(&h.session), vec!["Fairmont", "Hyatt", "Ramada", "Sheraton"]);
}

// =============================================================================
// Structure updates
// =============================================================================

#[test]
fn structure_update_reports_changes_and_repairs_weights() {
    let mut h = harness(SortMode::Manual);
    h.session.sort_alphabetically().unwrap();

    let mut edited = hotel_chart();
    edited.set_name("Vancouver Hotels");
    let mut roots = objectives();
    roots.push(PrimitiveObjective::new("pool", Domain::categorical(["no", "yes"])).into());
    edited.set_root_objectives(roots).unwrap();
    for (name, pool) in [
        ("Sheraton", "yes"),
        ("Hyatt", "no"),
        ("Fairmont", "yes"),
        ("Ramada", "no"),
    ] {
        edited
            .alternative_mut(name)
            .unwrap()
            .set_consequence("pool", pool.into());
    }

    let update = h.session.update_structure(&edited).unwrap();

    assert_eq!(
        update.changes,
        vec![
            format!("{}Vancouver Hotels", StructureDiff::NAME_CHANGED),
            format!("{}pool", StructureDiff::OBJECTIVE_ADDED),
            StructureDiff::ALTERNATIVES_REORDERED.to_string(),
        ]
    );
    let expected = vec![format!("{}pool", PreferenceRepair::NEW_OBJECTIVE_WEIGHTS)];
    assert_eq!(
        update.warnings,
        vec![
            ("aaron".to_string(), expected.clone()),
            ("beth".to_string(), expected),
        ]
    );
    assert_eq!(
        h.session.chart().user("beth").unwrap().weight_map().weight("pool"),
        Some(0.0)
    );
    assert!(!h.session.history().can_undo());
    assert!(h.observer.has_event("chart.structure_changed.v1"));
    assert_eq!(h.session.view().unwrap().row_data.len(), 3);
}

#[test]
fn structure_without_consequences_is_applied_but_not_drawn() {
    let mut h = harness(SortMode::Manual);
    h.session.render().unwrap();

    let mut edited = hotel_chart();
    let mut roots = objectives();
    roots.push(PrimitiveObjective::new("pool", Domain::categorical(["no", "yes"])).into());
    edited.set_root_objectives(roots).unwrap();

    let update = h.session.update_structure(&edited).unwrap();

    assert_eq!(
        update.changes,
        vec![format!("{}pool", StructureDiff::OBJECTIVE_ADDED)]
    );
    assert!(h.session.view().is_none());
    let err = h.session.render().unwrap_err();
    assert_eq!(err.code, ErrorCode::ModelIncomplete);
}
