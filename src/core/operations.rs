//! Conflict-checked scheduling operations.
//!
//! [`Scheduler`] ties the conflict detector, the approval state machine and
//! the collaborator ports together. Each operation validates against the
//! caller's grid snapshot, persists through the [`AssignmentStore`] and, for
//! cross-department placements, talks to the [`ApprovalGateway`].

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, ScheduleConfig};
use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::conflict::{check_conflict, ConflictCheck, ConflictReport};
use crate::core::grid::{Grid, PlacedSession, RowKeyKind};
use crate::core::model::{Assignment, ClassSession, NewAssignment, Program};
use crate::core::ports::{
    ApprovalGateway, ApprovalRequest, AssignmentStore, MoveApprovalRequest, ResourceCatalog,
};
use crate::core::state_machine::{
    cross_department_resources, decide_move, initial_status, removal_cancels_requests,
    CrossDepartmentResource, MoveDecision,
};
use crate::core::{EngineError, Precondition};
use crate::util::{AssignmentId, PeriodIndex, RequestId, RowId, SemesterId, SessionId};

/// Signed-in caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    /// User identifier.
    pub id: String,
    /// Role name as issued by the auth layer.
    pub role: Option<String>,
}

/// Ambient state an operation needs before it can run.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    /// Grid shape.
    pub schedule: Option<ScheduleConfig>,
    /// Active semester.
    pub semester_id: Option<SemesterId>,
    /// Signed-in caller.
    pub requester: Option<Requester>,
}

struct Ready<'a> {
    schedule: &'a ScheduleConfig,
    semester_id: &'a str,
    requester: &'a Requester,
}

impl OperationContext {
    /// Context with every precondition satisfied.
    #[must_use]
    pub fn new(schedule: ScheduleConfig, semester_id: impl Into<String>, requester: Requester) -> Self {
        Self {
            schedule: Some(schedule),
            semester_id: Some(semester_id.into()),
            requester: Some(requester),
        }
    }

    /// First unmet precondition, if any. An unusable grid shape is reported
    /// as invalid configuration.
    pub fn ensure_ready(&self) -> Result<(), EngineError> {
        self.ready().map(|_| ())
    }

    fn ready(&self) -> Result<Ready<'_>, EngineError> {
        let schedule = self
            .schedule
            .as_ref()
            .ok_or(Precondition::MissingScheduleConfig)?;
        schedule.validate().map_err(EngineError::InvalidConfig)?;
        let semester_id = self
            .semester_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(Precondition::MissingSemester)?;
        let requester = self.requester.as_ref().ok_or(Precondition::Unauthenticated)?;
        Ok(Ready {
            schedule,
            semester_id,
            requester,
        })
    }
}

/// A grid cell addressed in the grid's view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// Row identifier.
    pub row_id: RowId,
    /// Period index.
    pub period: PeriodIndex,
}

impl CellRef {
    /// Address a cell.
    pub fn new(row_id: impl Into<RowId>, period: PeriodIndex) -> Self {
        Self {
            row_id: row_id.into(),
            period,
        }
    }
}

/// An approval request that could not be raised after a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalFailure {
    /// Resource the request was for.
    pub resource: CrossDepartmentResource,
    /// Gateway error.
    pub message: String,
}

/// Result of a successful `assign`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignOutcome {
    /// Persisted assignment.
    pub assignment: Assignment,
    /// Approval requests raised.
    pub requests: Vec<RequestId>,
    /// Requests that failed; the placement stays committed as pending.
    pub approval_failures: Vec<ApprovalFailure>,
}

/// Result of a successful `move_assignment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source and target were the same cell.
    Unchanged,
    /// The assignment now lives at the target.
    Moved(Assignment),
    /// The assignment stays put until the move is approved.
    AwaitingApproval {
        /// Assignment left in place.
        assignment_id: AssignmentId,
        /// Move-approval request raised.
        request_id: RequestId,
    },
}

/// Result of a successful `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Deleted assignment.
    pub assignment_id: AssignmentId,
    /// Session it placed.
    pub session_id: SessionId,
    /// Approval requests cancelled alongside.
    pub cancelled_requests: usize,
}

/// Scheduling operations over pluggable collaborators.
pub struct Scheduler<C, S, A> {
    config: EngineConfig,
    catalog: C,
    store: S,
    approvals: A,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<C, S, A> Scheduler<C, S, A> {
    /// Create a scheduler from its collaborators.
    pub const fn new(config: EngineConfig, catalog: C, store: S, approvals: A) -> Self {
        Self {
            config,
            catalog,
            store,
            approvals,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Engine options.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Catalog adapter.
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Store adapter.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Approval adapter.
    pub const fn approvals(&self) -> &A {
        &self.approvals
    }

    /// Run the conflict detector with this scheduler's options applied.
    #[must_use]
    pub fn check(
        &self,
        grid: &Grid,
        check: ConflictCheck<'_>,
        settings: &ScheduleConfig,
        programs: &[Program],
    ) -> Option<ConflictReport> {
        let check = check.with_strict_pool_drops(self.config.strict_pool_drops);
        check_conflict(grid, &check, settings, programs)
    }

    fn record(&self, ready: &Ready<'_>, session_id: &str, action: AuditAction, detail: Option<String>) {
        if let Some(sink) = &self.audit {
            sink.lock().record(build_audit_event(
                ready.semester_id,
                session_id,
                ready.requester.id.as_str(),
                action,
                detail,
            ));
        }
    }
}

impl<C, S, A> Scheduler<C, S, A>
where
    C: ResourceCatalog,
    S: AssignmentStore,
    A: ApprovalGateway,
{
    /// Place `session` at `target`.
    ///
    /// Cross-department placements are stored as pending and one approval
    /// request is raised per foreign resource. A failed request does not undo
    /// the placement; it is reported in the outcome.
    pub async fn assign(
        &self,
        ctx: &OperationContext,
        grid: &Grid,
        target: &CellRef,
        session: &ClassSession,
    ) -> Result<AssignOutcome, EngineError> {
        let ready = ctx.ready()?;
        let programs = self.catalog.get_programs().await?;

        let check = ConflictCheck::placement(session, &target.row_id, target.period);
        if let Some(report) = self.check(grid, check, ready.schedule, &programs) {
            tracing::warn!(session = %session.id, row = %target.row_id, period = target.period, "assign rejected: {report}");
            return Err(report.into());
        }

        let cross = cross_department_resources(session, &programs);
        let status = initial_status(&cross);
        if grid.view() != RowKeyKind::ClassGroup && target.row_id != grid.view().row_of(session) {
            tracing::warn!(
                session = %session.id,
                row = %target.row_id,
                "session placed on a row it is not bound to; bound resources unchanged"
            );
        }
        let assignment = self
            .store
            .create(NewAssignment {
                session: session.clone(),
                class_group_id: check.target_group_id(grid.view()).to_string(),
                start_period_index: target.period,
                semester_id: ready.semester_id.to_string(),
                status,
            })
            .await?;
        tracing::info!(
            assignment = %assignment.id,
            session = %session.id,
            status = status.as_str(),
            "session assigned"
        );
        self.record(&ready, &session.id, AuditAction::Assign, Some(status.as_str().into()));

        let mut requests = Vec::new();
        let mut approval_failures = Vec::new();
        for resource in cross {
            let request = ApprovalRequest {
                resource_type: resource.kind,
                resource_id: resource.resource_id.clone(),
                target_department_id: resource.department_id.clone(),
                class_session_id: session.id.clone(),
                requester_id: ready.requester.id.clone(),
                program_id: session.program_id.clone(),
                semester_id: ready.semester_id.to_string(),
                assignment_id: assignment.id,
            };
            match self.approvals.create_request(request).await {
                Ok(id) => requests.push(id),
                Err(e) => {
                    tracing::warn!(
                        session = %session.id,
                        resource = %resource.resource_id,
                        "approval request failed: {e}"
                    );
                    self.record(
                        &ready,
                        &session.id,
                        AuditAction::ApprovalRequestFailed,
                        Some(format!("{} {}", resource.kind.as_str(), resource.resource_id)),
                    );
                    approval_failures.push(ApprovalFailure {
                        resource,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(AssignOutcome {
            assignment,
            requests,
            approval_failures,
        })
    }

    /// Relocate the assignment of `session` shown at `from` to `to`.
    ///
    /// Stores with transactions swap the placement atomically. Otherwise the
    /// new placement is written before the old one is deleted, so a failure
    /// in between leaves a duplicate rather than losing the session; the next
    /// refresh reconciles it.
    pub async fn move_assignment(
        &self,
        ctx: &OperationContext,
        grid: &Grid,
        from: &CellRef,
        to: &CellRef,
        session: &ClassSession,
    ) -> Result<MoveOutcome, EngineError> {
        if from == to {
            tracing::debug!(session = %session.id, "move onto same cell ignored");
            return Ok(MoveOutcome::Unchanged);
        }
        let ready = ctx.ready()?;
        let source = locate(grid, from, session).ok_or_else(|| {
            EngineError::NotFound(format!(
                "session {} is not placed at row {} period {}",
                session.id, from.row_id, from.period
            ))
        })?;
        let programs = self.catalog.get_programs().await?;

        let check = ConflictCheck::relocation(session, &to.row_id, to.period)
            .stored_under(&source.class_group_id);
        if let Some(report) = self.check(grid, check, ready.schedule, &programs) {
            tracing::warn!(session = %session.id, row = %to.row_id, period = to.period, "move rejected: {report}");
            return Err(report.into());
        }

        let new_group = check.target_group_id(grid.view()).to_string();
        let cross = cross_department_resources(session, &programs);
        match decide_move(source.status, !cross.is_empty()) {
            MoveDecision::RequireApproval => {
                let request = MoveApprovalRequest {
                    assignment_id: source.assignment_id,
                    class_session_id: session.id.clone(),
                    requester_id: ready.requester.id.clone(),
                    semester_id: ready.semester_id.to_string(),
                    new_class_group_id: new_group,
                    new_start_period_index: to.period,
                    target_department_ids: cross.into_iter().map(|r| r.department_id).collect(),
                };
                let request_id = self.approvals.request_move_approval(request).await?;
                tracing::info!(
                    assignment = %source.assignment_id,
                    request = %request_id,
                    "cross-department move sent for approval"
                );
                self.record(
                    &ready,
                    &session.id,
                    AuditAction::MoveRequested,
                    Some(format!("{} -> {}:{}", source.start_period_index, to.row_id, to.period)),
                );
                Ok(MoveOutcome::AwaitingApproval {
                    assignment_id: source.assignment_id,
                    request_id,
                })
            }
            MoveDecision::Apply(status) => {
                let replacement = NewAssignment {
                    session: session.clone(),
                    class_group_id: new_group,
                    start_period_index: to.period,
                    semester_id: ready.semester_id.to_string(),
                    status,
                };
                let moved = match self
                    .store
                    .replace(source.assignment_id, replacement.clone())
                    .await?
                {
                    Some(moved) => moved,
                    None => self.create_then_delete(source.assignment_id, replacement).await?,
                };
                tracing::info!(
                    old = %source.assignment_id,
                    new = %moved.id,
                    period = to.period,
                    "assignment moved"
                );
                self.record(
                    &ready,
                    &session.id,
                    AuditAction::Move,
                    Some(format!("{} -> {}", source.start_period_index, to.period)),
                );
                Ok(MoveOutcome::Moved(moved))
            }
        }
    }

    /// Remove the assignment shown at `at`, cancelling its open approval
    /// requests first when it borrows another department's resources.
    pub async fn remove(
        &self,
        ctx: &OperationContext,
        grid: &Grid,
        at: &CellRef,
    ) -> Result<RemoveOutcome, EngineError> {
        let ready = ctx.ready()?;
        let placed = grid.cell(&at.row_id, at.period).ok_or_else(|| {
            EngineError::NotFound(format!(
                "nothing is scheduled at row {} period {}",
                at.row_id, at.period
            ))
        })?;
        let programs = self.catalog.get_programs().await?;

        let cross = !cross_department_resources(&placed.session, &programs).is_empty();
        let cancelled_requests = if removal_cancels_requests(cross) {
            self.approvals
                .cancel_active_requests_for_class_session(&placed.session.id)
                .await?
        } else {
            0
        };
        self.store.delete(placed.assignment_id).await?;

        tracing::info!(
            assignment = %placed.assignment_id,
            session = %placed.session.id,
            cancelled_requests,
            "assignment removed"
        );
        self.record(&ready, &placed.session.id, AuditAction::Remove, None);
        Ok(RemoveOutcome {
            assignment_id: placed.assignment_id,
            session_id: placed.session.id.clone(),
            cancelled_requests,
        })
    }
}

impl<C, S, A> Scheduler<C, S, A>
where
    S: AssignmentStore,
{
    async fn create_then_delete(
        &self,
        old: AssignmentId,
        replacement: NewAssignment,
    ) -> Result<Assignment, EngineError> {
        let moved = self.store.create(replacement).await?;
        if let Err(e) = self.store.delete(old).await {
            tracing::warn!(old = %old, new = %moved.id, "move left a duplicate placement: {e}");
            return Err(EngineError::Persistence(format!(
                "session was placed at the new slot but the old placement could not be removed ({e}); refresh to reconcile"
            )));
        }
        Ok(moved)
    }
}

/// Placement of `session` shown at `from`. Merged sessions share a view
/// cell, so the group rows are searched when the cell shows another session.
pub(crate) fn locate<'g>(
    grid: &'g Grid,
    from: &CellRef,
    session: &ClassSession,
) -> Option<&'g PlacedSession> {
    let matches = |p: &&PlacedSession| p.session.id == session.id;
    grid.cell(&from.row_id, from.period)
        .filter(matches)
        .or_else(|| grid.group_cell(&session.group.id, from.period).filter(matches))
        .or_else(|| {
            grid.group_rows()
                .filter_map(|(_, row)| row.get(from.period as usize)?.as_deref())
                .find(matches)
        })
}
