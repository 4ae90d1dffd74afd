//! Build a [`Scheduler`] from engine options and collaborator adapters.

use crate::config::EngineConfig;
use crate::core::{
    ApprovalGateway, AssignmentStore, EngineError, InMemoryAuditSink, ResourceCatalog, Scheduler,
};
use crate::infra::{InMemoryApprovalGateway, InMemoryAssignmentStore, InMemoryCatalog};

/// Scheduler wired to the in-memory adapters.
pub type InMemoryScheduler =
    Scheduler<InMemoryCatalog, InMemoryAssignmentStore, InMemoryApprovalGateway>;

/// Builder for a scheduler with validated options.
pub struct SchedulerBuilder {
    config: EngineConfig,
    audit: bool,
}

impl SchedulerBuilder {
    /// Start from the given options. Audit recording is on by default.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            audit: true,
        }
    }

    /// Options the scheduler will run with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Enable or disable the in-memory audit trail.
    #[must_use]
    pub const fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = enabled;
        self
    }

    /// Validate the options and assemble the scheduler.
    pub fn build<C, S, A>(
        self,
        catalog: C,
        store: S,
        approvals: A,
    ) -> Result<Scheduler<C, S, A>, EngineError>
    where
        C: ResourceCatalog,
        S: AssignmentStore,
        A: ApprovalGateway,
    {
        self.config.validate().map_err(EngineError::InvalidConfig)?;
        let capacity = self.config.audit_capacity;
        let scheduler = Scheduler::new(self.config, catalog, store, approvals);
        if !self.audit {
            return Ok(scheduler);
        }
        tracing::debug!(capacity, "audit trail enabled");
        Ok(scheduler.with_audit(Box::new(InMemoryAuditSink::new(capacity))))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Build a scheduler over a catalog with a fresh in-memory store and
/// approval gateway.
pub fn build_in_memory(
    config: EngineConfig,
    catalog: InMemoryCatalog,
) -> Result<InMemoryScheduler, EngineError> {
    SchedulerBuilder::new(config).build(
        catalog,
        InMemoryAssignmentStore::new(),
        InMemoryApprovalGateway::new(),
    )
}
