use super::*;
use serde_json::json;

fn full_payload() -> serde_json::Value {
    json!({
        "hook_event_name": "Status",
        "session_id": "4f1c2d9e-77aa-4b1e-9c3a-0d2e8f6b5a10",
        "transcript_path": "/tmp/transcript.jsonl",
        "cwd": "/home/user/project",
        "model": { "id": "claude-opus-4-1", "display_name": "Opus" },
        "workspace": { "current_dir": "/home/user/project" },
        "version": "1.0.80",
        "output_style": { "name": "default" }
    })
}

#[test]
fn deserialize_full_payload() {
    let ctx = SessionContext::parse(&full_payload().to_string()).unwrap();
    assert_eq!(ctx.model.display_name, "Opus");
    assert_eq!(ctx.version, "1.0.80");
    assert_eq!(ctx.output_style.name, "default");
    assert_eq!(ctx.session_prefix(), "4f1c2d9e");
}

#[test]
fn each_field_is_required() {
    for field in ["model", "version", "output_style", "session_id"] {
        let mut input = full_payload();
        input.as_object_mut().unwrap().remove(field);
        assert!(
            SessionContext::parse(&input.to_string()).is_err(),
            "expected parse failure without {field}"
        );
    }
}

#[test]
fn nested_display_name_is_required() {
    let mut input = full_payload();
    input["model"] = json!({ "id": "claude-opus-4-1" });
    assert!(SessionContext::parse(&input.to_string()).is_err());
}

#[test]
fn rejects_malformed_json() {
    assert!(SessionContext::parse("not json").is_err());
    assert!(SessionContext::parse("").is_err());
}

#[test]
fn short_session_id_is_kept_whole() {
    let mut input = full_payload();
    input["session_id"] = json!("abc");
    let ctx = SessionContext::parse(&input.to_string()).unwrap();
    assert_eq!(ctx.session_prefix(), "abc");
}

#[test]
fn session_prefix_counts_characters_not_bytes() {
    let mut input = full_payload();
    input["session_id"] = json!("ééééééééxyz");
    let ctx = SessionContext::parse(&input.to_string()).unwrap();
    assert_eq!(ctx.session_prefix(), "éééééééé");
}
