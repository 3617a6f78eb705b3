//! Configuration Tests.

use mipsim_core::config::{Config, ConfigError, ReplacementKind, SchedulerKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn empty_document_takes_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.memory.num_phys_pages, 4);
    assert_eq!(config.memory.num_virtual_pages, 32);
    assert_eq!(config.memory.stack_pages, 8);
    assert!(config.memory.vm_enabled);
    assert_eq!(config.kernel.quantum, 10);
    assert_eq!(config.kernel.max_processes, 256);
    assert_eq!(config.kernel.scheduler, SchedulerKind::RoundRobin);
    assert_eq!(config.kernel.replacement, ReplacementKind::Clock);
    assert_eq!(config.hardware.switch_time_ms, 5);
    assert!(!config.general.trace_instructions);
}

#[rstest]
#[case("\"Clock\"", ReplacementKind::Clock)]
#[case("\"FirstFit\"", ReplacementKind::FirstFit)]
#[case("\"First\"", ReplacementKind::FirstFit)]
fn replacement_names(#[case] name: &str, #[case] expected: ReplacementKind) {
    let json = format!(r#"{{ "kernel": {{ "replacement": {name} }} }}"#);
    assert_eq!(Config::from_json(&json).unwrap().kernel.replacement, expected);
}

#[test]
fn scheduler_accepts_short_name() {
    let config = Config::from_json(r#"{ "kernel": { "scheduler": "RR" } }"#).unwrap();
    assert_eq!(config.kernel.scheduler, SchedulerKind::RoundRobin);
}

#[rstest]
#[case::no_frames(r#"{ "memory": { "num_phys_pages": 0 } }"#)]
#[case::no_room_for_code(r#"{ "memory": { "num_virtual_pages": 9, "stack_pages": 8 } }"#)]
#[case::zero_quantum(r#"{ "kernel": { "quantum": 0 } }"#)]
#[case::no_process_slots(r#"{ "kernel": { "max_processes": 0 } }"#)]
fn unusable_machines_are_rejected(#[case] json: &str) {
    assert!(matches!(Config::from_json(json), Err(ConfigError::Invalid(_))));
}

#[rstest]
#[case::not_json("memory = 4")]
#[case::unknown_policy(r#"{ "kernel": { "replacement": "Lru" } }"#)]
#[case::wrong_type(r#"{ "memory": { "num_phys_pages": "four" } }"#)]
fn malformed_documents_fail_to_parse(#[case] json: &str) {
    assert!(matches!(Config::from_json(json), Err(ConfigError::Parse(_))));
}

#[test]
fn smallest_address_space_is_accepted() {
    let json = r#"{ "memory": { "num_virtual_pages": 10, "stack_pages": 8 } }"#;
    assert!(Config::from_json(json).is_ok());
}
