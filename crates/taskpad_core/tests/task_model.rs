use chrono::{TimeZone, Utc};
use taskpad_core::{decode_tasks, encode_tasks, BlobError, Task, TaskDraft, TaskId, TaskStatus};

fn sample_task(id: &str) -> Task {
    Task {
        id: TaskId::from(id),
        title: "Buy milk".to_string(),
        description: "2 litres".to_string(),
        location: "Corner shop".to_string(),
        execution_date: Utc.with_ymd_and_hms(2025, 3, 14, 18, 30, 0).unwrap(),
        status: TaskStatus::InProgress,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
    }
}

#[test]
fn from_draft_sets_pending_and_keeps_fields() {
    let execution_date = Utc.with_ymd_and_hms(2025, 3, 14, 18, 30, 0).unwrap();
    let created_at = Utc::now();
    let mut draft = TaskDraft::new("Call plumber", execution_date);
    draft.location = "Home".to_string();

    let task = Task::from_draft(TaskId::generate(), draft, created_at);

    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.title, "Call plumber");
    assert_eq!(task.description, "");
    assert_eq!(task.location, "Home");
    assert_eq!(task.execution_date, execution_date);
    assert_eq!(task.created_at, created_at);
}

#[test]
fn task_serialization_uses_camel_case_wire_fields() {
    let task = sample_task("task-1");

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], "task-1");
    assert_eq!(json["title"], "Buy milk");
    assert_eq!(json["description"], "2 litres");
    assert_eq!(json["location"], "Corner shop");
    assert_eq!(json["executionDate"], "2025-03-14T18:30:00Z");
    assert_eq!(json["status"], "in_progress");
    assert_eq!(json["createdAt"], "2025-03-01T09:00:00Z");
}

#[test]
fn blob_roundtrip_preserves_every_field() {
    let mut fresh = Task::from_draft(
        TaskId::generate(),
        TaskDraft::new("Sub-second timestamps", Utc::now()),
        Utc::now(),
    );
    fresh.status = TaskStatus::Cancelled;
    let tasks = vec![sample_task("task-1"), fresh];

    let blob = encode_tasks(&tasks).unwrap();
    let decoded = decode_tasks(&blob).unwrap();

    assert_eq!(decoded, tasks);
}

#[test]
fn empty_collection_roundtrips() {
    let blob = encode_tasks(&[]).unwrap();
    assert_eq!(blob, "[]");
    assert!(decode_tasks(&blob).unwrap().is_empty());
}

#[test]
fn decode_rekeys_later_duplicate_ids() {
    let mut second = sample_task("dup");
    second.title = "Second with same id".to_string();
    let blob = encode_tasks(&[sample_task("dup"), second, sample_task("other")]).unwrap();

    let decoded = decode_tasks(&blob).unwrap();

    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded[0].id.as_str(), "dup");
    assert_eq!(decoded[0].title, "Buy milk");
    assert_ne!(decoded[1].id.as_str(), "dup");
    assert_ne!(decoded[1].id.as_str(), "other");
    assert_eq!(decoded[1].title, "Second with same id");
    assert_eq!(decoded[2].id.as_str(), "other");
}

#[test]
fn decode_rejects_non_array_payload() {
    let err = decode_tasks(r#"{"tasks": []}"#).unwrap_err();
    assert!(matches!(err, BlobError::Json(_)));
}

#[test]
fn validate_rejects_blank_title_and_empty_id() {
    let mut task = sample_task("task-1");
    task.title = " \t".to_string();
    assert!(task.validate().is_err());

    let mut task = sample_task("");
    task.title = "ok".to_string();
    assert!(task.validate().is_err());
}

#[test]
fn status_display_names_match_list_screen_labels() {
    let names = TaskStatus::ALL
        .iter()
        .map(|status| status.display_name())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Pending", "In Progress", "Completed", "Cancelled"]);
}
