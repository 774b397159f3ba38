use tasktracker_core::{validate_description, Task, TaskValidationError};

#[test]
fn task_new_sets_defaults() {
    let task = Task::new(3, "water plants");

    assert_eq!(task.id, 3);
    assert_eq!(task.description, "water plants");
    assert!(!task.completed);
    assert_eq!(task.notes, None);
}

#[test]
fn task_serialization_uses_stable_field_names() {
    let mut task = Task::new(4, "file taxes");
    task.completed = true;
    task.notes = Some("before april".to_string());

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], 4);
    assert_eq!(json["description"], "file taxes");
    assert_eq!(json["completed"], true);
    assert_eq!(json["notes"], "before april");

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn missing_notes_deserialize_as_absent() {
    let value = serde_json::json!({ "id": 1, "description": "a", "completed": false });
    let task: Task = serde_json::from_value(value).unwrap();
    assert_eq!(task.notes, None);
}

#[test]
fn deserialize_rejects_unknown_fields_and_negative_ids() {
    let extra = serde_json::json!({
        "id": 1,
        "description": "a",
        "completed": false,
        "priority": "high"
    });
    assert!(serde_json::from_value::<Task>(extra).is_err());

    let negative = serde_json::json!({ "id": -1, "description": "a", "completed": false });
    assert!(serde_json::from_value::<Task>(negative).is_err());
}

#[test]
fn validation_error_messages_are_readable() {
    let err = validate_description(" ").unwrap_err();
    assert_eq!(err, TaskValidationError::EmptyDescription);
    assert_eq!(err.to_string(), "task description cannot be empty");
    assert_eq!(
        TaskValidationError::DuplicateId(3).to_string(),
        "task id 3 appears more than once"
    );
}
