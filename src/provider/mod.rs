//! Geometry provider interface.
//!
//! The hydrostatic procedures never touch B-rep data directly. Every cut,
//! split, stitch and physical query goes through [`GeometryProvider`], and
//! every entity the procedures create is a [`Transient`] that must be handed
//! back through [`GeometryProvider::release`].

mod scratch;

pub use scratch::Scratch;

use crate::error::Result;
use crate::math::{Point3, TOLERANCE};

slotmap::new_key_type! {
    /// Handle to a body (solid or surface) owned by the provider.
    pub struct BodyId;
}

slotmap::new_key_type! {
    /// Handle to a construction plane owned by the provider.
    pub struct PlaneId;
}

slotmap::new_key_type! {
    /// Handle to a sketch holding the curves of a cross-section.
    pub struct SketchId;
}

/// Reference axis along which a cutting plane is offset.
///
/// `Z` planes are parallel to XY (waterlines), `X` planes are parallel to
/// YZ (transverse stations).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Returns the component of `point` along this axis.
    #[must_use]
    pub fn component(self, point: &Point3) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
            Self::Z => point.z,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Extent of the box along `axis`.
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        axis.component(&self.max) - axis.component(&self.min)
    }

    /// Returns `true` if `value` lies within the box along `axis`.
    #[must_use]
    pub fn spans(&self, axis: Axis, value: f64) -> bool {
        value >= axis.component(&self.min) - TOLERANCE
            && value <= axis.component(&self.max) + TOLERANCE
    }
}

/// What a plane cut through a body produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    /// The plane missed the body.
    Empty,
    /// Curves were found but they do not close into a profile.
    OpenCurves,
    /// One or more closed profiles.
    Closed { profiles: usize },
}

/// A cross-section sketch and the shape of what it holds.
#[derive(Debug, Clone, Copy)]
pub struct CrossSection {
    pub sketch: SketchId,
    pub shape: SectionShape,
}

/// The two halves of a body split by a horizontal plane.
#[derive(Debug, Clone, Copy)]
pub struct SplitFragments {
    pub below: BodyId,
    pub above: BodyId,
}

/// Any entity created on behalf of a procedure that must be released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transient {
    Body(BodyId),
    Plane(PlaneId),
    Sketch(SketchId),
}

impl From<BodyId> for Transient {
    fn from(id: BodyId) -> Self {
        Self::Body(id)
    }
}

impl From<PlaneId> for Transient {
    fn from(id: PlaneId) -> Self {
        Self::Plane(id)
    }
}

impl From<SketchId> for Transient {
    fn from(id: SketchId) -> Self {
        Self::Sketch(id)
    }
}

/// Operations a CAD host must supply to the hydrostatic procedures.
///
/// Lengths are centimetres, masses kilograms.
pub trait GeometryProvider {
    /// Axis-aligned bounds of a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is unknown.
    fn bounding_box(&self, body: BodyId) -> Result<Aabb>;

    /// Creates a plane offset by `offset` along `axis` from the matching
    /// origin plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the plane.
    fn add_plane(&mut self, axis: Axis, offset: f64) -> Result<PlaneId>;

    /// Intersects a body with a plane into a new sketch.
    ///
    /// # Errors
    ///
    /// Returns an error if the body or plane is unknown.
    fn cross_section(&mut self, body: BodyId, plane: PlaneId) -> Result<CrossSection>;

    /// Area of one closed profile of a section sketch.
    ///
    /// # Errors
    ///
    /// Returns an error if the sketch or profile index is unknown.
    fn profile_area(&self, sketch: SketchId, profile: usize) -> Result<f64>;

    /// Fills a closed profile into a planar surface body.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be filled.
    fn cap_profile(&mut self, sketch: SketchId, profile: usize) -> Result<BodyId>;

    /// Fills the raw curves of a sketch into a planar surface body, closing
    /// open ends where possible.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::CapFailed`](crate::error::GeometryError::CapFailed)
    /// if the curves cannot bound a region.
    fn cap_curves(&mut self, sketch: SketchId) -> Result<BodyId>;

    /// Splits a body by a plane into an unambiguous (below, above) pair.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::SplitFailed`](crate::error::GeometryError::SplitFailed)
    /// if the split cannot be performed.
    fn split_below(&mut self, body: BodyId, plane: PlaneId) -> Result<SplitFragments>;

    /// Stitches surface bodies into a single body within `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::StitchFailed`](crate::error::GeometryError::StitchFailed)
    /// if the surfaces do not join.
    fn stitch(&mut self, bodies: &[BodyId], tolerance: f64) -> Result<BodyId>;

    /// Area of a planar surface body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is unknown or not a planar surface.
    fn area(&self, body: BodyId) -> Result<f64>;

    /// Enclosed volume of a body; zero for bodies that are not watertight.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is unknown.
    fn volume(&self, body: BodyId) -> Result<f64>;

    /// Physical mass of a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is unknown.
    fn mass(&self, body: BodyId) -> Result<f64>;

    /// Physical centre of mass of a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is unknown.
    fn center_of_mass(&self, body: BodyId) -> Result<Point3>;

    /// Deletes an entity created for a procedure. Never fails.
    fn release(&mut self, entity: Transient);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_extent_and_span() {
        let aabb = Aabb {
            min: Point3::new(0.0, -100.0, 10.0),
            max: Point3::new(1000.0, 100.0, 110.0),
        };
        assert!((aabb.extent(Axis::X) - 1000.0).abs() < TOLERANCE);
        assert!((aabb.extent(Axis::Y) - 200.0).abs() < TOLERANCE);
        assert!((aabb.extent(Axis::Z) - 100.0).abs() < TOLERANCE);
        assert!(aabb.spans(Axis::Z, 110.0));
        assert!(!aabb.spans(Axis::Z, 110.1));
        assert!(!aabb.spans(Axis::X, -0.5));
    }
}
