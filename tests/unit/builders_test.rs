//! Tests for builder modules

use timetable_engine::builders::{build_in_memory, SchedulerBuilder};
use timetable_engine::config::EngineConfig;
use timetable_engine::core::EngineError;
use timetable_engine::infra::{InMemoryApprovalGateway, InMemoryAssignmentStore, InMemoryCatalog};

#[test]
fn test_scheduler_builder_defaults() {
    let builder = SchedulerBuilder::default();
    assert_eq!(builder.config(), &EngineConfig::default());

    let scheduler = builder
        .build(
            InMemoryCatalog::new(),
            InMemoryAssignmentStore::new(),
            InMemoryApprovalGateway::new(),
        )
        .unwrap();
    assert_eq!(scheduler.config().audit_capacity, 1024);
}

#[test]
fn test_scheduler_builder_rejects_invalid_config() {
    let config = EngineConfig {
        audit_capacity: 0,
        strict_pool_drops: false,
    };
    let result = SchedulerBuilder::new(config).with_audit(false).build(
        InMemoryCatalog::new(),
        InMemoryAssignmentStore::new(),
        InMemoryApprovalGateway::new(),
    );
    assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}

#[test]
fn test_build_in_memory_carries_options() {
    let config = EngineConfig {
        audit_capacity: 16,
        strict_pool_drops: true,
    };
    let scheduler = build_in_memory(config.clone(), InMemoryCatalog::new()).unwrap();
    assert_eq!(scheduler.config(), &config);
    assert!(scheduler.store().all().is_empty());
    assert!(scheduler.approvals().requests().is_empty());
}
