//! Optimistic local state for one editor of a shared semester.
//!
//! Each editor keeps a [`SnapshotCache`] of the semester's assignments. Moves
//! and removals are applied to the cache before the store confirms them; a
//! failure restores the captured [`Snapshot`], a success is reconciled by a
//! refetch. Changes made by other editors only mark the cache stale, and the
//! next [`Timetable::refresh_if_stale`] brings it up to date.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::core::grid::{build_grid, Grid, RowKeyKind, RowResource};
use crate::core::model::{Assignment, ClassSession};
use crate::core::operations::{
    locate, AssignOutcome, CellRef, MoveOutcome, OperationContext, RemoveOutcome, Scheduler,
};
use crate::core::ports::{ApprovalGateway, AssignmentChange, AssignmentStore, ResourceCatalog};
use crate::core::state_machine::pending_session_ids;
use crate::core::{EngineError, Precondition};
use crate::util::SessionId;

/// Row headers for every view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCatalog {
    /// Class-group rows.
    pub class_groups: Vec<RowResource>,
    /// Classroom rows.
    pub classrooms: Vec<RowResource>,
    /// Instructor rows.
    pub instructors: Vec<RowResource>,
}

impl RowCatalog {
    /// Rows rendered in `view`.
    #[must_use]
    pub fn rows_for(&self, view: RowKeyKind) -> &[RowResource] {
        match view {
            RowKeyKind::ClassGroup => &self.class_groups,
            RowKeyKind::Classroom => &self.classrooms,
            RowKeyKind::Instructor => &self.instructors,
        }
    }
}

/// Captured cache contents used to roll back an optimistic mutation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    assignments: Vec<Assignment>,
    version: u64,
}

impl Snapshot {
    /// Cache version at capture time.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Default)]
struct CacheState {
    assignments: Vec<Assignment>,
    rows: RowCatalog,
    stale: bool,
}

/// Local copy of the active semester's assignments.
pub struct SnapshotCache {
    state: Mutex<CacheState>,
    version: AtomicU64,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCache {
    /// Empty cache, stale until the first refetch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState {
                stale: true,
                ..CacheState::default()
            }),
            version: AtomicU64::new(0),
        }
    }

    /// Current assignments.
    #[must_use]
    pub fn assignments(&self) -> Vec<Assignment> {
        self.state.lock().assignments.clone()
    }

    /// Current row headers.
    #[must_use]
    pub fn rows(&self) -> RowCatalog {
        self.state.lock().rows.clone()
    }

    /// Bumped on every local or remote change to the contents.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Whether a remote change has been observed since the last refetch.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.state.lock().stale
    }

    /// Capture the current contents.
    #[must_use]
    pub fn capture(&self) -> Snapshot {
        let state = self.state.lock();
        Snapshot {
            assignments: state.assignments.clone(),
            version: self.version(),
        }
    }

    /// Mutate the contents in place.
    pub fn apply(&self, mutate: impl FnOnce(&mut Vec<Assignment>)) {
        let mut state = self.state.lock();
        mutate(&mut state.assignments);
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Roll back to a captured snapshot.
    pub fn restore(&self, snapshot: Snapshot) {
        let mut state = self.state.lock();
        state.assignments = snapshot.assignments;
        self.version.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(captured = snapshot.version, "optimistic update rolled back");
    }

    /// Replace the contents with an authoritative refetch.
    pub fn replace(&self, assignments: Vec<Assignment>, rows: Option<RowCatalog>) {
        let mut state = self.state.lock();
        state.assignments = assignments;
        if let Some(rows) = rows {
            state.rows = rows;
        }
        state.stale = false;
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Mark the contents as outdated.
    pub fn invalidate(&self) {
        self.state.lock().stale = true;
    }
}

/// One editor's view of a semester timetable.
pub struct Timetable<C, S, A> {
    scheduler: Arc<Scheduler<C, S, A>>,
    ctx: OperationContext,
    cache: SnapshotCache,
}

impl<C, S, A> Timetable<C, S, A>
where
    C: ResourceCatalog,
    S: AssignmentStore,
    A: ApprovalGateway,
{
    /// Editor over a shared scheduler. Call [`Self::refresh`] before use.
    pub fn new(scheduler: Arc<Scheduler<C, S, A>>, ctx: OperationContext) -> Self {
        Self {
            scheduler,
            ctx,
            cache: SnapshotCache::new(),
        }
    }

    /// Operation context of this editor.
    pub const fn context(&self) -> &OperationContext {
        &self.ctx
    }

    /// Local cache.
    pub const fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Refetch assignments and row headers.
    pub async fn refresh(&self) -> Result<(), EngineError> {
        let semester_id = self
            .ctx
            .semester_id
            .as_deref()
            .ok_or(Precondition::MissingSemester)?;
        let catalog = self.scheduler.catalog();
        let rows = RowCatalog {
            class_groups: catalog.class_groups().await?.iter().map(RowResource::from).collect(),
            classrooms: catalog.classrooms().await?.iter().map(RowResource::from).collect(),
            instructors: catalog.instructors().await?.iter().map(RowResource::from).collect(),
        };
        let assignments = self.scheduler.store().list(semester_id).await?;
        tracing::debug!(semester = semester_id, count = assignments.len(), "timetable refreshed");
        self.cache.replace(assignments, Some(rows));
        Ok(())
    }

    /// Refetch only when a remote change was observed.
    pub async fn refresh_if_stale(&self) -> Result<bool, EngineError> {
        if !self.cache.is_stale() {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Grid for `view` built from the local cache.
    pub fn grid(&self, view: RowKeyKind) -> Result<Grid, EngineError> {
        let schedule = self
            .ctx
            .schedule
            .as_ref()
            .ok_or(Precondition::MissingScheduleConfig)?;
        let rows = self.cache.rows();
        Ok(build_grid(
            &self.cache.assignments(),
            view,
            rows.rows_for(view),
            schedule.total_periods(),
        ))
    }

    /// Sessions awaiting approval in the local cache.
    #[must_use]
    pub fn pending_session_ids(&self) -> BTreeSet<SessionId> {
        pending_session_ids(&self.cache.assignments())
    }

    /// Place a session; the cache is updated from the store afterwards.
    pub async fn assign(
        &self,
        view: RowKeyKind,
        target: &CellRef,
        session: &ClassSession,
    ) -> Result<AssignOutcome, EngineError> {
        let grid = self.grid(view)?;
        let outcome = self
            .scheduler
            .assign(&self.ctx, &grid, target, session)
            .await
            .inspect_err(|e| self.note_failure(e))?;
        self.reconcile().await;
        Ok(outcome)
    }

    /// Move a session, showing it at the target before the store confirms.
    pub async fn move_assignment(
        &self,
        view: RowKeyKind,
        from: &CellRef,
        to: &CellRef,
        session: &ClassSession,
    ) -> Result<MoveOutcome, EngineError> {
        let grid = self.grid(view)?;
        if from == to {
            return self
                .scheduler
                .move_assignment(&self.ctx, &grid, from, to, session)
                .await;
        }

        let snapshot = self.cache.capture();
        if let Some(placed) = locate(&grid, from, session) {
            let id = placed.assignment_id;
            let group = (view == RowKeyKind::ClassGroup).then(|| to.row_id.clone());
            let period = to.period;
            self.cache.apply(|assignments| {
                if let Some(a) = assignments.iter_mut().find(|a| a.id == id) {
                    a.start_period_index = period;
                    if let Some(group) = group {
                        a.class_group_id = group;
                    }
                }
            });
        }

        match self
            .scheduler
            .move_assignment(&self.ctx, &grid, from, to, session)
            .await
        {
            Ok(outcome) => {
                if matches!(outcome, MoveOutcome::AwaitingApproval { .. }) {
                    self.cache.restore(snapshot);
                }
                self.reconcile().await;
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(session = %session.id, "move failed, rolling back: {e}");
                self.cache.restore(snapshot);
                self.note_failure(&e);
                Err(e)
            }
        }
    }

    /// Remove the assignment at `at`, hiding it before the store confirms.
    pub async fn remove(&self, view: RowKeyKind, at: &CellRef) -> Result<RemoveOutcome, EngineError> {
        let grid = self.grid(view)?;
        let snapshot = self.cache.capture();
        if let Some(placed) = grid.cell(&at.row_id, at.period) {
            let id = placed.assignment_id;
            self.cache.apply(|assignments| assignments.retain(|a| a.id != id));
        }

        match self.scheduler.remove(&self.ctx, &grid, at).await {
            Ok(outcome) => {
                self.reconcile().await;
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(row = %at.row_id, period = at.period, "remove failed, rolling back: {e}");
                self.cache.restore(snapshot);
                self.note_failure(&e);
                Err(e)
            }
        }
    }

    /// Note a change published by the store. Returns whether the cache was
    /// invalidated.
    pub fn on_remote_change(&self, change: &AssignmentChange) -> bool {
        if self.ctx.semester_id.as_deref() != Some(change.semester_id.as_str()) {
            return false;
        }
        self.cache.invalidate();
        true
    }

    /// Consume queued store notifications without waiting. Returns how many
    /// invalidated the cache; a lagged receiver always invalidates.
    pub fn drain_changes(&self, rx: &mut broadcast::Receiver<AssignmentChange>) -> usize {
        let mut invalidated = 0;
        loop {
            match rx.try_recv() {
                Ok(change) => {
                    if self.on_remote_change(&change) {
                        invalidated += 1;
                    }
                }
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "change feed lagged; invalidating");
                    self.cache.invalidate();
                    invalidated += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        invalidated
    }

    fn note_failure(&self, err: &EngineError) {
        if err.is_stale() {
            tracing::debug!("store rejected a write allowed by the cache; marking stale");
            self.cache.invalidate();
        }
    }

    async fn reconcile(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!("refetch after mutation failed, cache marked stale: {e}");
            self.cache.invalidate();
        }
    }
}
