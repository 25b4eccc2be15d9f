//! ChartSession - owns one chart and routes every change through the engines.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{AppConfig, InteractionConfig, ViewConfig};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::history::{ChartUndoRedo, ScoreFunctionRecord};
use crate::domain::maintenance::{PreferenceRepair, StructureDiff};
use crate::domain::model::{
    AlternativesReordered, ChangeKind, Chart, ChartNotification, ChartStructureChanged,
    HistoryDirection, ModelError, Objective, ObjectivesChanged, ScoreFunction,
    ScoreFunctionChanged, UndoRedoApplied, WeightMap, WeightMapChanged,
};
use crate::domain::rendering::{ReconcileError, ReconciledView, RendererDataUtility, ScoreTotals};
use crate::domain::sorting::{
    DragPhase, DragUpdate, Reordered, SortAlternativesInteraction, TrackLayout,
};
use crate::ports::{ChartObserver, RenderSink};

/// Outcome of applying a new chart structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureUpdate {
    /// One message per structural change.
    pub changes: Vec<String>,
    /// Preference repair warnings by username. Users without warnings are left out.
    pub warnings: Vec<(String, Vec<String>)>,
}

/// The context a chart is edited in.
///
/// Owns the chart, its history, the ordering interaction and the cached
/// view. Observers hear about every committed change; render sinks get a
/// fresh [`RendererUpdate`](crate::domain::rendering::RendererUpdate) after
/// every reconciliation.
///
/// # Example
///
/// ```ignore
/// let mut session = ChartSession::new(chart, &AppConfig::default());
/// session.subscribe(Arc::new(TracingObserver::new()));
/// session.render()?;
/// session.sort_alphabetically()?;
/// session.undo()?;
/// ```
pub struct ChartSession {
    chart: Chart,
    history: ChartUndoRedo,
    sorter: SortAlternativesInteraction,
    view: Option<ReconciledView>,
    displayed_users: Vec<String>,
    view_config: ViewConfig,
    interaction: InteractionConfig,
    observers: Vec<Arc<dyn ChartObserver>>,
    sinks: Vec<Arc<dyn RenderSink>>,
}

impl ChartSession {
    /// Opens a session showing every user of the chart.
    ///
    /// Nothing is reconciled until the first [`ChartSession::render`].
    pub fn new(chart: Chart, config: &AppConfig) -> Self {
        let displayed_users = chart
            .users()
            .iter()
            .map(|u| u.username().to_string())
            .collect();
        Self {
            history: ChartUndoRedo::new(),
            sorter: SortAlternativesInteraction::new(&chart),
            view: None,
            displayed_users,
            view_config: config.view.clone(),
            interaction: config.interaction.clone(),
            observers: Vec::new(),
            sinks: Vec::new(),
            chart,
        }
    }

    /// Registers an observer. Observers are called in registration order.
    pub fn subscribe(&mut self, observer: Arc<dyn ChartObserver>) {
        self.observers.push(observer);
    }

    pub fn add_render_sink(&mut self, sink: Arc<dyn RenderSink>) {
        self.sinks.push(sink);
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn history(&self) -> &ChartUndoRedo {
        &self.history
    }

    /// Mutable history access, for registering history listeners.
    pub fn history_mut(&mut self) -> &mut ChartUndoRedo {
        &mut self.history
    }

    pub fn sorter(&self) -> &SortAlternativesInteraction {
        &self.sorter
    }

    /// The last reconciled view, if it is still current.
    pub fn view(&self) -> Option<&ReconciledView> {
        self.view.as_ref()
    }

    pub fn displayed_users(&self) -> &[String] {
        &self.displayed_users
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view_config
    }

    pub fn interaction_config(&self) -> &InteractionConfig {
        &self.interaction
    }

    pub fn set_interaction_config(&mut self, interaction: InteractionConfig) {
        self.interaction = interaction;
    }

    /// Changes which users are drawn, then re-renders.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if a name is not a user of the chart
    /// - `ModelIncomplete` if the chart cannot be drawn for these users
    pub fn set_displayed_users(&mut self, usernames: Vec<String>) -> Result<(), DomainError> {
        if let Some(missing) = usernames.iter().find(|u| self.chart.user(u).is_none()) {
            return Err(ModelError::UserNotFound(missing.clone()).into());
        }
        self.displayed_users = usernames;
        self.render().map(|_| ())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Rebuilds the view from scratch and hands it to every render sink.
    ///
    /// # Errors
    ///
    /// - `ModelIncomplete` if a consequence, weight or score is missing;
    ///   the cached view is dropped
    pub fn render(&mut self) -> Result<&ReconciledView, DomainError> {
        let view = match RendererDataUtility::reconcile(
            &self.chart,
            self.displayed_users.as_slice(),
            self.view_config.orientation,
            self.view_config.scale_alternatives,
        ) {
            Ok(view) => view,
            Err(err) => {
                self.view = None;
                return Err(err.into());
            }
        };
        publish(&self.sinks, &self.chart, &view, &self.view_config);
        Ok(self.view.insert(view))
    }

    /// Summary scores for the current view.
    pub fn score_totals(&mut self) -> Result<ScoreTotals, DomainError> {
        self.ensure_view()?;
        Ok(self.view.as_ref().map(ScoreTotals::compute).unwrap_or_default())
    }

    /// Refreshes numbers in place, falling back to a full render when the
    /// cached view's layout no longer fits the chart.
    fn refresh(&mut self) -> Result<(), DomainError> {
        if let Some(view) = self.view.as_mut() {
            match RendererDataUtility::recompute_offsets(&self.chart, view) {
                Ok(()) => {
                    publish(&self.sinks, &self.chart, view, &self.view_config);
                    return Ok(());
                }
                Err(ReconcileError::StaleView(reason)) => {
                    debug!(%reason, "Rebuilding stale view");
                }
                Err(err) => {
                    self.view = None;
                    return Err(err.into());
                }
            }
        }
        self.render().map(|_| ())
    }

    /// Fails with the reconciliation error if `candidate` cannot be drawn
    /// for the displayed users.
    fn check_drawable(&self, candidate: &Chart) -> Result<(), DomainError> {
        RendererDataUtility::reconcile(
            candidate,
            self.displayed_users.as_slice(),
            self.view_config.orientation,
            self.view_config.scale_alternatives,
        )?;
        Ok(())
    }

    fn ensure_view(&mut self) -> Result<(), DomainError> {
        if self.view.is_none() {
            self.render()?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preferences
    // ─────────────────────────────────────────────────────────────────────────

    /// Replaces a user's weights. Returns false if nothing changed.
    ///
    /// The weights are only committed if the chart can still be drawn.
    ///
    /// # Errors
    ///
    /// - `InteractionDisabled` unless weight adjustment is enabled
    /// - `UserNotFound` if the chart has no such user
    /// - `ModelIncomplete` if the new weights leave an objective without a
    ///   weight; nothing is changed
    pub fn set_weight_map(
        &mut self,
        username: &str,
        weight_map: WeightMap,
    ) -> Result<bool, DomainError> {
        require_enabled(self.interaction.adjust_weights, "Weight adjustment")?;
        let user = self
            .chart
            .user(username)
            .ok_or_else(|| ModelError::UserNotFound(username.to_string()))?;
        if *user.weight_map() == weight_map {
            return Ok(false);
        }
        let previous = user.weight_map().clone();

        let mut candidate = self.chart.clone();
        candidate
            .require_user_mut(username)?
            .set_weight_map(weight_map.clone());
        self.check_drawable(&candidate)?;

        self.history.save_weight_map_record(username, &previous);
        self.chart = candidate;
        info!(username, "Changed weight map");

        self.notify(WeightMapChanged::new(self.chart.id(), username, weight_map).into());
        self.refresh()?;
        Ok(true)
    }

    /// Replaces a user's score function for a primitive objective.
    ///
    /// Returns false if the function is unchanged.
    ///
    /// # Errors
    ///
    /// - `InteractionDisabled` unless score function adjustment is enabled
    /// - `ObjectiveNotFound` if there is no such primitive objective
    /// - `ValidationFailed` if the function does not fit the objective's
    ///   domain or the objective's default is immutable
    /// - `UserNotFound` if the chart has no such user
    /// - `ModelIncomplete` if the function leaves a consequence unscored;
    ///   nothing is changed
    pub fn set_score_function(
        &mut self,
        username: &str,
        objective: &str,
        score_function: ScoreFunction,
    ) -> Result<bool, DomainError> {
        require_enabled(
            self.interaction.adjust_score_functions,
            "Score function adjustment",
        )?;
        let primitive = self
            .chart
            .primitive_objective(objective)
            .ok_or_else(|| ModelError::ObjectiveNotFound(objective.to_string()))?;
        if !score_function.fits(primitive.domain()) {
            return Err(DomainError::validation(
                "score_function",
                format!("Score function kind does not match the domain of '{}'", objective),
            ));
        }
        if primitive.default_score_function().is_immutable() {
            return Err(DomainError::validation(
                "score_function",
                format!("The score function for '{}' cannot be changed", objective),
            ));
        }
        let user = self
            .chart
            .user(username)
            .ok_or_else(|| ModelError::UserNotFound(username.to_string()))?;
        let current = user.score_functions().get(objective).cloned();
        if current.as_ref() == Some(&score_function) {
            return Ok(false);
        }

        let mut candidate = self.chart.clone();
        candidate
            .require_user_mut(username)?
            .score_functions_mut()
            .set(objective, score_function.clone());
        self.check_drawable(&candidate)?;

        self.history
            .save(ScoreFunctionRecord::new(username, objective, current).into());
        self.chart = candidate;
        info!(username, objective, "Changed score function");

        self.notify(
            ScoreFunctionChanged::new(self.chart.id(), username, objective, score_function).into(),
        );
        self.refresh()?;
        Ok(true)
    }

    /// Replaces the objective tree, typically to reorder objectives.
    ///
    /// The new tree is only committed if the chart can still be drawn.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if the tree reuses a name
    /// - `ModelIncomplete` if alternatives or preferences do not cover the
    ///   new tree; the chart is left unchanged
    pub fn set_objectives(&mut self, roots: Vec<Objective>) -> Result<(), DomainError> {
        let mut candidate = self.chart.clone();
        candidate.set_root_objectives(roots)?;
        self.check_drawable(&candidate)?;

        self.history
            .save_objectives_record(self.chart.root_objectives());
        self.chart = candidate;
        let primitives = primitive_names(&self.chart);
        info!(primitives = primitives.len(), "Changed objectives");

        self.notify(ObjectivesChanged::new(self.chart.id(), primitives).into());
        self.render().map(|_| ())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────

    /// Reverts the newest change. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<ChangeKind>, DomainError> {
        self.replay(HistoryDirection::Undo)
    }

    /// Re-applies the newest undone change. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<Option<ChangeKind>, DomainError> {
        self.replay(HistoryDirection::Redo)
    }

    fn replay(&mut self, direction: HistoryDirection) -> Result<Option<ChangeKind>, DomainError> {
        self.require_idle()?;
        let applied = match direction {
            HistoryDirection::Undo => self.history.undo(&mut self.chart)?,
            HistoryDirection::Redo => self.history.redo(&mut self.chart)?,
        };
        let Some(kind) = applied else {
            debug!(?direction, "Nothing to replay");
            return Ok(None);
        };

        self.notify(UndoRedoApplied::new(self.chart.id(), direction, kind).into());
        match kind {
            ChangeKind::WeightMap | ChangeKind::ScoreFunction => self.refresh()?,
            ChangeKind::AlternativeOrder | ChangeKind::Objectives => {
                self.render()?;
            }
        }
        Ok(Some(kind))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ordering
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts dragging the alternative at `index`.
    ///
    /// # Errors
    ///
    /// - `InteractionDisabled` unless the sort mode is manual
    /// - `ModelIncomplete` if the chart cannot be drawn
    pub fn start_drag(&mut self, index: usize, layout: &TrackLayout) -> Result<(), DomainError> {
        require_enabled(self.interaction.reorder_by_drag(), "Reordering by drag")?;
        self.ensure_view()?;
        self.sorter
            .start_drag(&self.chart, &mut self.history, index, layout)?;
        Ok(())
    }

    pub fn drag(&mut self, delta: f64) -> Result<DragUpdate, DomainError> {
        Ok(self.sorter.drag(delta)?)
    }

    /// Drops the dragged alternative into its new slot.
    ///
    /// The new order is committed whether or not the chart can be drawn;
    /// the view is patched when it still lines up and rebuilt otherwise.
    pub fn end_drag(&mut self) -> Result<Option<Reordered>, DomainError> {
        let moved = self.sorter.end_drag(&mut self.chart)?;
        if let Some(Reordered { from, to }) = moved {
            self.notify_reordered();
            self.move_view_cells(from, to);
        }
        Ok(moved)
    }

    fn move_view_cells(&mut self, from: usize, to: usize) {
        if let Some(view) = self.view.as_mut() {
            match view.move_alternative(from, to) {
                Ok(()) => {
                    publish(&self.sinks, &self.chart, view, &self.view_config);
                    return;
                }
                Err(err) => debug!(error = %err, "Rebuilding view after drop"),
            }
        }
        if let Err(err) = self.render() {
            warn!(error = %err, "Reordered chart cannot be drawn");
        }
    }

    /// Sorts alternatives by name. Returns true if the order changed.
    pub fn sort_alphabetically(&mut self) -> Result<bool, DomainError> {
        let changed = self
            .sorter
            .sort_alphabetically(&mut self.chart, &mut self.history)?;
        self.after_sort(changed)
    }

    /// Puts alternatives back in the order the session opened with.
    pub fn reset_order(&mut self) -> Result<bool, DomainError> {
        let changed = self.sorter.reset_order(&mut self.chart, &mut self.history)?;
        self.after_sort(changed)
    }

    /// Sorts alternatives by descending score on an objective.
    ///
    /// # Errors
    ///
    /// - `InteractionDisabled` unless the sort mode is objective
    /// - `ObjectiveNotFound` if the chart has no such objective
    pub fn sort_by_objective(&mut self, objective: &str) -> Result<bool, DomainError> {
        require_enabled(self.interaction.sort_by_objective(), "Sorting by objective")?;
        self.ensure_view()?;
        let view = self.view.as_ref().ok_or_else(missing_view)?;
        let changed =
            self.sorter
                .sort_by_objective(&mut self.chart, &mut self.history, view, objective)?;
        self.after_sort(changed)
    }

    fn after_sort(&mut self, changed: bool) -> Result<bool, DomainError> {
        if changed {
            self.notify_reordered();
            self.render()?;
        }
        Ok(changed)
    }

    fn notify_reordered(&self) {
        let order = self
            .chart
            .alternatives()
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        self.notify(AlternativesReordered::new(self.chart.id(), order).into());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Structure
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies an edited chart structure and repairs everything that
    /// depended on the old one.
    ///
    /// Details, objectives and alternatives come from `new`; users keep
    /// their preferences, cleaned up to fit. History is cleared since old
    /// records may refer to objectives or alternatives that are gone. A
    /// chart that cannot be drawn yet is still applied; the next
    /// [`ChartSession::render`] reports why.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` while an alternative is being dragged
    /// - `DuplicateName` if the new objective tree reuses a name
    pub fn update_structure(&mut self, new: &Chart) -> Result<StructureUpdate, DomainError> {
        self.require_idle()?;
        let changes = StructureDiff::update_chart(&mut self.chart, new)?;
        PreferenceRepair::clean_up_alternatives(&mut self.chart);

        let usernames: Vec<String> = self
            .chart
            .users()
            .iter()
            .map(|u| u.username().to_string())
            .collect();
        let mut warnings = Vec::new();
        for username in usernames {
            let repaired = PreferenceRepair::clean_up_user_preferences(&mut self.chart, &username)?;
            if !repaired.is_empty() {
                warnings.push((username, repaired));
            }
        }
        self.history.reset();

        if !changes.is_empty() {
            self.notify(ChartStructureChanged::new(self.chart.id(), changes.clone()).into());
        }
        if let Err(err) = self.render() {
            warn!(error = %err, "Updated chart cannot be drawn yet");
        }
        Ok(StructureUpdate { changes, warnings })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn notify(&self, notification: ChartNotification) {
        for observer in &self.observers {
            observer.notify(&notification);
        }
    }

    fn require_idle(&self) -> Result<(), DomainError> {
        if self.sorter.phase() == DragPhase::Idle {
            return Ok(());
        }
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            "Finish the current drag first",
        ))
    }
}

fn publish(
    sinks: &[Arc<dyn RenderSink>],
    chart: &Chart,
    view: &ReconciledView,
    config: &ViewConfig,
) {
    if sinks.is_empty() {
        return;
    }
    let update = view.renderer_update(chart, config.width, config.height);
    for sink in sinks {
        sink.render(&update);
    }
}

fn primitive_names(chart: &Chart) -> Vec<String> {
    chart
        .primitive_objectives()
        .iter()
        .map(|p| p.name().to_string())
        .collect()
}

fn require_enabled(enabled: bool, interaction: &str) -> Result<(), DomainError> {
    if enabled {
        return Ok(());
    }
    warn!(interaction, "Rejected disabled interaction");
    Err(DomainError::new(
        ErrorCode::InteractionDisabled,
        format!("{} is disabled for this chart", interaction),
    ))
}

fn missing_view() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "No reconciled view is available")
}
