//! Joint-angle geometry in 2D pixel space.
//!
//! All angles are in degrees. Pixel y grows downward.

use swish_core::Point;

/// Vectors shorter than this are treated as degenerate.
const MIN_VECTOR_LEN: f32 = 1e-6;

/// Shoulder widths below this many pixels make ratio metrics undefined.
pub const MIN_SHOULDER_WIDTH_PX: f32 = 1e-3;

/// Angle at vertex `b` between `b→a` and `b→c`, in `[0, 180]`.
///
/// Uses `cos(θ) = (v1 · v2) / (|v1| |v2|)` with the cosine clamped to
/// `[-1, 1]`. Returns 0 when either vector has zero length.
pub fn joint_angle(a: Point, b: Point, c: Point) -> f32 {
    let v1 = (a.x - b.x, a.y - b.y);
    let v2 = (c.x - b.x, c.y - b.y);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if !(mag1 >= MIN_VECTOR_LEN && mag2 >= MIN_VECTOR_LEN) {
        return 0.0;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// [`joint_angle`], or `None` when either vector is degenerate.
pub fn checked_joint_angle(a: Point, b: Point, c: Point) -> Option<f32> {
    (is_segment(b, a) && is_segment(b, c)).then(|| joint_angle(a, b, c))
}

/// True when `from` and `to` are far enough apart to define a direction.
pub fn is_segment(from: Point, to: Point) -> bool {
    from.distance(to) >= MIN_VECTOR_LEN
}

/// Lateral elbow offset from the shoulder midline as a percentage of
/// shoulder width. `None` when the shoulders coincide.
pub fn flare_ratio(elbow: Point, left_shoulder: Point, right_shoulder: Point) -> Option<f32> {
    let width = (right_shoulder.x - left_shoulder.x).abs();
    if width < MIN_SHOULDER_WIDTH_PX {
        return None;
    }
    let mid_x = (left_shoulder.x + right_shoulder.x) * 0.5;
    Some((elbow.x - mid_x).abs() / width * 100.0)
}

/// Angle of the elbow's deviation vector from the shoulder midpoint,
/// measured from vertical: `atan(|dx| / |dy|)`.
pub fn lateral_angle(elbow: Point, shoulder_mid: Point) -> f32 {
    let dx = (elbow.x - shoulder_mid.x).abs();
    let dy = (elbow.y - shoulder_mid.y).abs();
    dx.atan2(dy).to_degrees()
}

/// Wrist-snap angle: angle at the wrist between the forearm (toward the
/// elbow) and a reference point `offset_px` directly below the wrist.
pub fn wrist_snap_angle(elbow: Point, wrist: Point, offset_px: f32) -> f32 {
    let reference = Point::new(wrist.x, wrist.y + offset_px.abs().max(MIN_VECTOR_LEN));
    joint_angle(elbow, wrist, reference)
}
