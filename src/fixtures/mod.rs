//! Test fixtures for Slack API responses.
//!
//! Canned payloads shaped like what the Web API returns.

use serde_json::{json, Value};

/// A public channel as returned by channels.info
pub fn channel(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "created": 1360782804,
        "creator": "U024BE7LH",
        "is_archived": false,
        "is_general": false,
        "is_channel": true,
        "is_member": true,
        "members": ["U024BE7LH"],
        "topic": {"value": "Fun times", "creator": "U024BE7LV", "last_set": 1369677212},
        "purpose": {"value": "This channel is for fun", "creator": "U024BE7LH", "last_set": 1360782804},
        "last_read": "1401383885.000061",
        "latest": {"type": "message", "user": "U024BE7LH", "text": "hi", "ts": "1401383885.000061"},
        "unread_count": 0,
        "unread_count_display": 0,
        "num_members": 1
    })
}

/// A private group
pub fn group(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "created": 1360782804,
        "creator": "U024BE7LH",
        "is_archived": false,
        "is_group": true,
        "members": ["U024BE7LH", "U061F7AUR"]
    })
}

/// File metadata
pub fn file(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "created": 1356032811,
        "name": name,
        "title": name,
        "mimetype": "text/plain",
        "filetype": "text",
        "pretty_type": "Plain Text",
        "user": "U2147483697",
        "mode": "hosted",
        "editable": true,
        "is_external": false,
        "size": 5,
        "url_private": format!("https://files.slack.com/files-pri/T1-{}/{}", id, name),
        "permalink": format!("https://example.slack.com/files/U2147483697/{}/{}", id, name),
        "is_public": true,
        "public_url_shared": false,
        "channels": ["C123"],
        "num_stars": 0
    })
}

/// A file comment
pub fn comment(id: &str, text: &str) -> Value {
    json!({
        "id": id,
        "timestamp": 1356032811,
        "user": "U1234567890",
        "comment": text,
        "created": 1356032811
    })
}

/// `{"ok": true}` merged with `payload`
pub fn ok(payload: Value) -> Value {
    let mut body = json!({"ok": true});
    if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), payload) {
        body.extend(extra);
    }
    body
}

/// `{"ok": false, "error": code}`
pub fn error(code: &str) -> Value {
    json!({"ok": false, "error": code})
}
