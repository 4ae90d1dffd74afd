//! Tests for configuration validation

use timetable_engine::config::{EngineConfig, ScheduleConfig};

#[test]
fn test_schedule_config_validation() {
    assert!(ScheduleConfig::new(6, 5).validate().is_ok());
    assert!(ScheduleConfig::new(0, 5).validate().is_err());
    assert!(ScheduleConfig::new(6, 0).validate().is_err());
    assert!(ScheduleConfig::new(6, 5).with_period_duration(0).validate().is_err());
    assert!(ScheduleConfig::new(6, 5).with_start_time("25:00").validate().is_err());
    assert!(ScheduleConfig::new(6, 5).with_start_time("eight").validate().is_err());
}

#[test]
fn test_schedule_config_rejects_shape_past_index_range() {
    let cfg = ScheduleConfig::new(u32::MAX, 2);
    let err = cfg.validate().unwrap_err();
    assert!(err.contains("does not fit a period index"));
    assert_eq!(cfg.total_periods(), u32::MAX);
    assert!(ScheduleConfig::new(65_536, 65_535).validate().is_ok());
    assert!(ScheduleConfig::new(65_536, 65_536).validate().is_err());
}

#[test]
fn test_schedule_config_from_json_defaults() {
    let cfg = ScheduleConfig::from_json_str(r#"{"periods_per_day": 4, "days_per_week": 5}"#).unwrap();
    assert_eq!(cfg, ScheduleConfig::new(4, 5));
    assert_eq!(cfg.total_periods(), 20);
}

#[test]
fn test_schedule_config_from_json_rejects_invalid() {
    let err = ScheduleConfig::from_json_str(r#"{"periods_per_day": 0, "days_per_week": 5}"#).unwrap_err();
    assert!(err.contains("periods_per_day"));
    assert!(ScheduleConfig::from_json_str("{").unwrap_err().starts_with("parse error"));
}

#[test]
fn test_day_major_layout() {
    let cfg = ScheduleConfig::new(4, 5);
    assert_eq!(cfg.day_of(3), 0);
    assert_eq!(cfg.day_of(4), 1);
    assert_eq!(cfg.period_in_day(5), 1);
    assert_eq!(cfg.period_label(5), "Day 2, 08:50-09:40");
}

#[test]
fn test_period_label_custom_start() {
    let cfg = ScheduleConfig::new(8, 5)
        .with_start_time("07:30")
        .with_period_duration(45);
    assert_eq!(cfg.period_label(2), "Day 1, 09:00-09:45");
}

#[test]
fn test_engine_config_defaults() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.audit_capacity, 1024);
    assert!(!cfg.strict_pool_drops);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_engine_config_invalid_audit_capacity() {
    let cfg = EngineConfig {
        audit_capacity: 0,
        ..EngineConfig::default()
    };
    assert!(cfg.validate().is_err());
}
