use cgmath::{Vector2, Vector3};

pub const EPSILON: f32 = 1e-4;

/// One frame at 60 Hz.
pub const FRAME: f32 = 1.0 / 60.0;

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_vec2_close(actual: Vector2<f32>, expected: Vector2<f32>) {
    assert!(
        (actual.x - expected.x).abs() <= EPSILON && (actual.y - expected.y).abs() <= EPSILON,
        "expected {expected:?}, got {actual:?}"
    );
}

pub fn assert_vec3_close(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        (actual.x - expected.x).abs() <= EPSILON
            && (actual.y - expected.y).abs() <= EPSILON
            && (actual.z - expected.z).abs() <= EPSILON,
        "expected {expected:?}, got {actual:?}"
    );
}

/// Calls `step` once per 60 Hz frame for `seconds` and collects what it
/// returns.
pub fn run_frames<T>(seconds: f32, mut step: impl FnMut(f32) -> Option<T>) -> Vec<T> {
    let frames = (seconds / FRAME).ceil() as usize;
    (0..frames).filter_map(|_| step(FRAME)).collect()
}
