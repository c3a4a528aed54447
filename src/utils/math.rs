//! Additional math helpers layered on top of `glam`.

use glam::Vec3;

const SEGMENT_PROJECTION_ROUNDS: usize = 8;

/// Closest point to `point` on the segment `a..b`.
pub fn closest_point_on_segment(a: Vec3, b: Vec3, point: Vec3) -> Vec3 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq < 1e-12 {
        return a;
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Clamps `point` into the box `min..max` component-wise.
pub fn clamp_to_box(point: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    point.max(min).min(max)
}

pub fn point_box_distance_squared(point: Vec3, min: Vec3, max: Vec3) -> f32 {
    point.distance_squared(clamp_to_box(point, min, max))
}

/// Axis along which `delta` is strictly largest, preferring Y, then X, then Z.
pub fn dominant_axis(delta: Vec3) -> usize {
    let abs = delta.abs();
    if abs.y > abs.x && abs.y > abs.z {
        1
    } else if abs.x > abs.y && abs.x > abs.z {
        0
    } else {
        2
    }
}

/// Closest points between segments `p1..q1` and `p2..q2`.
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    if a <= f32::EPSILON && e <= f32::EPSILON {
        return (p1, p2);
    }

    let (s, t) = if a <= f32::EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= f32::EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s = if denom > f32::EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}

/// Closest points between the segment `a..b` and the box `min..max`, found by
/// projecting back and forth between the two from the segment midpoint.
pub fn closest_points_segment_box(a: Vec3, b: Vec3, min: Vec3, max: Vec3) -> (Vec3, Vec3) {
    let mut on_segment = (a + b) * 0.5;
    let mut on_box = clamp_to_box(on_segment, min, max);
    for _ in 0..SEGMENT_PROJECTION_ROUNDS {
        let next = closest_point_on_segment(a, b, on_box);
        if next == on_segment {
            break;
        }
        on_segment = next;
        on_box = clamp_to_box(on_segment, min, max);
    }
    (on_segment, on_box)
}

pub fn segment_box_distance_squared(a: Vec3, b: Vec3, min: Vec3, max: Vec3) -> f32 {
    let (on_segment, on_box) = closest_points_segment_box(a, b, min, max);
    on_segment.distance_squared(on_box)
}
