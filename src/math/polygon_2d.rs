use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Computes the area centroid of a simple closed polygon.
///
/// Returns `None` when the polygon encloses no area.
#[must_use]
pub fn centroid(points: &[Point2]) -> Option<Point2> {
    let area = signed_area(points);
    if area.abs() < TOLERANCE {
        return None;
    }
    let n = points.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let j = (i + 1) % n;
        let cross = points[i].x * points[j].y - points[j].x * points[i].y;
        cx += (points[i].x + points[j].x) * cross;
        cy += (points[i].y + points[j].y) * cross;
    }
    let factor = 1.0 / (6.0 * area);
    Some(Point2::new(cx * factor, cy * factor))
}

/// Linearly interpolates the ordinate at `x` on the segment `a`–`b`.
///
/// A vertical segment yields the larger of the two ordinates.
#[must_use]
pub fn lerp_at(a: &Point2, b: &Point2, x: f64) -> f64 {
    let dx = b.x - a.x;
    if dx.abs() < TOLERANCE {
        return a.y.max(b.y);
    }
    let t = ((x - a.x) / dx).clamp(0.0, 1.0);
    a.y + t * (b.y - a.y)
}
