use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{centroid, lerp_at, signed_area};
use crate::math::{Point2, TOLERANCE};

/// Waterplane shape of a vertical-sided body.
///
/// Described by half-breadths along X, mirrored about a centreline parallel
/// to X. Vertices are `(x, half_breadth)` pairs with non-decreasing `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Planform {
    vertices: Vec<Point2>,
    centerline: f64,
}

impl Planform {
    /// Creates a planform from `(x, half_breadth)` vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two vertices are given, if `x`
    /// decreases, if the planform has no length, or if a half-breadth is
    /// negative.
    pub fn new(vertices: Vec<Point2>) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(
                GeometryError::InvalidInput("planform needs at least two vertices".into()).into(),
            );
        }
        if vertices.windows(2).any(|w| w[1].x < w[0].x) {
            return Err(GeometryError::InvalidInput(
                "planform vertices must be ordered along X".into(),
            )
            .into());
        }
        if let Some(v) = vertices.iter().find(|v| v.y < 0.0) {
            return Err(GeometryError::InvalidInput(format!(
                "negative half-breadth {} at x = {}",
                v.y, v.x
            ))
            .into());
        }
        let planform = Self {
            vertices,
            centerline: 0.0,
        };
        let (x_min, x_max) = planform.x_range();
        if x_max - x_min < TOLERANCE {
            return Err(GeometryError::InvalidInput("planform has no length".into()).into());
        }
        Ok(planform)
    }

    /// A rectangular planform of the given length span and full beam.
    #[must_use]
    pub fn rectangle(x_min: f64, x_max: f64, beam: f64) -> Self {
        let half = beam.abs() * 0.5;
        Self {
            vertices: vec![
                Point2::new(x_min.min(x_max), half),
                Point2::new(x_min.max(x_max), half),
            ],
            centerline: 0.0,
        }
    }

    /// Moves the centreline to `y`.
    #[must_use]
    pub fn centred_at(mut self, y: f64) -> Self {
        self.centerline = y;
        self
    }

    /// Y coordinate of the centreline.
    #[must_use]
    pub fn centerline(&self) -> f64 {
        self.centerline
    }

    /// Longitudinal extent as `(x_min, x_max)`.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        let first = self.vertices.first().map_or(0.0, |v| v.x);
        let last = self.vertices.last().map_or(0.0, |v| v.x);
        (first, last)
    }

    /// Half-breadth at station `x`, zero outside the planform.
    #[must_use]
    pub fn half_breadth_at(&self, x: f64) -> f64 {
        let (x_min, x_max) = self.x_range();
        if x < x_min - TOLERANCE || x > x_max + TOLERANCE {
            return 0.0;
        }
        self.vertices
            .windows(2)
            .filter(|w| x >= w[0].x - TOLERANCE && x <= w[1].x + TOLERANCE)
            .map(|w| lerp_at(&w[0], &w[1], x))
            .fold(0.0, f64::max)
    }

    /// Largest half-breadth over the planform.
    #[must_use]
    pub fn max_half_breadth(&self) -> f64 {
        self.vertices.iter().map(|v| v.y).fold(0.0, f64::max)
    }

    /// Closed outline in the XY plane, counter-clockwise.
    #[must_use]
    pub fn outline(&self) -> Vec<Point2> {
        let lower = self
            .vertices
            .iter()
            .map(|v| Point2::new(v.x, self.centerline - v.y));
        let upper = self
            .vertices
            .iter()
            .rev()
            .map(|v| Point2::new(v.x, self.centerline + v.y));
        lower.chain(upper).collect()
    }

    /// Enclosed waterplane area.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area(&self.outline()).abs()
    }

    /// Area centroid; the mid-length point on the centreline when the
    /// planform has no area.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        centroid(&self.outline()).unwrap_or_else(|| {
            let (x_min, x_max) = self.x_range();
            Point2::new((x_min + x_max) * 0.5, self.centerline)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn diamond() -> Planform {
        Planform::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(430.0, 100.0),
            Point2::new(1000.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn rectangle_area_and_centroid() {
        let p = Planform::rectangle(0.0, 1000.0, 200.0).centred_at(10.0);
        assert_relative_eq!(p.area(), 200_000.0, max_relative = 1e-12);
        let c = p.centroid();
        assert_relative_eq!(c.x, 500.0, max_relative = 1e-12);
        assert_relative_eq!(c.y, 10.0, max_relative = 1e-12);
    }

    #[test]
    fn diamond_area_and_centroid() {
        let p = diamond();
        // Two triangles, total base 1000 and height 200.
        assert_relative_eq!(p.area(), 100_000.0, max_relative = 1e-12);
        // Triangle centroid: (0 + 430 + 1000) / 3.
        assert_relative_eq!(p.centroid().x, 1430.0 / 3.0, max_relative = 1e-9);
    }

    #[test]
    fn half_breadth_interpolates() {
        let p = diamond();
        assert_relative_eq!(p.half_breadth_at(430.0), 100.0);
        assert_relative_eq!(p.half_breadth_at(215.0), 50.0, max_relative = 1e-12);
        assert!(p.half_breadth_at(0.0).abs() < TOLERANCE);
        assert!(p.half_breadth_at(-1.0).abs() < TOLERANCE);
        assert!(p.half_breadth_at(1001.0).abs() < TOLERANCE);
        assert_relative_eq!(p.max_half_breadth(), 100.0);
    }

    #[test]
    fn rejects_bad_vertices() {
        assert!(Planform::new(vec![Point2::new(0.0, 1.0)]).is_err());
        assert!(Planform::new(vec![Point2::new(1.0, 1.0), Point2::new(0.0, 1.0)]).is_err());
        assert!(Planform::new(vec![Point2::new(0.0, -1.0), Point2::new(1.0, 1.0)]).is_err());
        assert!(Planform::new(vec![Point2::new(2.0, 1.0), Point2::new(2.0, 1.0)]).is_err());
    }
}
