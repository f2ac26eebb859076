//! Helpers for inspecting serialized server frames in tests.
//!
//! Frames are handled as `serde_json::Value` so this crate stays independent
//! of the backend's message types.

use serde_json::Value;

/// The `type` discriminator of a frame, or `""` when absent.
pub fn frame_type(frame: &Value) -> &str {
    frame.get("type").and_then(Value::as_str).unwrap_or("")
}

/// All frames whose `type` equals `ty`, in arrival order.
pub fn frames_of_type<'a>(frames: &'a [Value], ty: &str) -> Vec<&'a Value> {
    frames.iter().filter(|f| frame_type(f) == ty).collect()
}

/// Count of frames with the given `type`.
pub fn count_of_type(frames: &[Value], ty: &str) -> usize {
    frames.iter().filter(|f| frame_type(f) == ty).count()
}

/// The last frame with the given `type`, if any.
pub fn last_of_type<'a>(frames: &'a [Value], ty: &str) -> Option<&'a Value> {
    frames.iter().rev().find(|f| frame_type(f) == ty)
}

/// Assert that `frame` is an error frame carrying `expected_code`.
pub fn assert_error_code(frame: &Value, expected_code: &str) {
    assert_eq!(frame_type(frame), "error", "expected an error frame, got {frame}");
    let code = frame
        .get("code")
        .and_then(Value::as_str)
        .expect("error frame should carry a code");
    assert_eq!(code, expected_code, "unexpected error code in {frame}");
    assert!(
        frame.get("message").and_then(Value::as_str).is_some(),
        "error frame should carry a message: {frame}"
    );
}
