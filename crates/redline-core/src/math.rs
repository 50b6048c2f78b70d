use crate::Vector3;

/// Vectors shorter than this are treated as having no direction.
pub const DIRECTION_EPSILON: f64 = 1e-9;

/// Normalizes `v`, or returns `None` if it is (almost) the zero vector.
pub fn safe_normalize(v: Vector3) -> Option<Vector3> {
    let norm = v.norm();
    if norm > DIRECTION_EPSILON && norm.is_finite() {
        Some(v / norm)
    } else {
        None
    }
}

/// Projects `v` onto the ground plane.
pub fn flat(v: Vector3) -> Vector3 {
    Vector3::new(v.x, v.y, 0.0)
}

/// Removes the component of `v` along `normal`, leaving only the part of `v` that is
/// perpendicular to it. A zero `normal` leaves `v` untouched.
pub fn flatten_along(v: Vector3, normal: Vector3) -> Vector3 {
    match safe_normalize(normal) {
        Some(n) => v - n * v.dot(&n),
        None => v,
    }
}

/// Limits the length of `v` to `[min, max]`, keeping its direction.
pub fn cap_magnitude(v: Vector3, min: f64, max: f64) -> Vector3 {
    match safe_normalize(v) {
        Some(dir) => dir * v.norm().clamp(min, max),
        None => v,
    }
}

/// Direction from `from` towards `to`.
pub fn direction(from: Vector3, to: Vector3) -> Option<Vector3> {
    safe_normalize(to - from)
}

/// Direction from `from` towards `to` in the ground plane.
pub fn flat_direction(from: Vector3, to: Vector3) -> Option<Vector3> {
    safe_normalize(flat(to - from))
}

/// Signed counter-clockwise angle (seen from above) that rotates `a` onto `b`, ignoring
/// the z component of both.
pub fn flat_angle_between(a: Vector3, b: Vector3) -> f64 {
    let cross = a.x * b.y - a.y * b.x;
    let dot = a.x * b.x + a.y * b.y;
    cross.atan2(dot)
}

/// Finds the intersection point of two lines in the ground plane.
///
/// Each line is defined by a point and a direction vector. Returns the parameter `t` along
/// the first line (`point1 + t * direction1`) and the intersection, or `None` if the lines
/// are parallel. The z components are ignored.
pub fn find_flat_intersection(
    point1: Vector3,
    direction1: Vector3,
    point2: Vector3,
    direction2: Vector3,
) -> Option<(f64, Vector3)> {
    let det = direction1.x * direction2.y - direction1.y * direction2.x;
    if det.abs() < 1e-10 {
        return None;
    }

    let dp = point2 - point1;
    let t = (dp.x * direction2.y - dp.y * direction2.x) / det;
    let intersection = flat(point1 + t * direction1);

    Some((t, intersection))
}
