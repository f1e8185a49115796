//! Reference geometry provider for vertical-sided hulls.
//!
//! [`PrismKernel`] stands in for the CAD host in tests and demos. It keeps
//! every entity in slotmap arenas, so handles behave like the host's:
//! released handles stop resolving and leaks show up in
//! [`PrismKernel::live_transients`].

mod planform;
mod prism;

pub use planform::Planform;
pub use prism::{Breach, Prism};

use slotmap::SlotMap;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::provider::{
    Aabb, Axis, BodyId, CrossSection, GeometryProvider, PlaneId, SectionShape, SketchId,
    SplitFragments, Transient,
};

/// Geometry held by a body.
#[derive(Debug, Clone)]
enum BodyData {
    /// Closed prism.
    Solid(Prism),
    /// Hull plating: bottom and sides, open at the top.
    Shell(Prism),
    /// Planar surface filling a horizontal section.
    Cap { planform: Planform, z: f64 },
    /// Planar surface filling a transverse section.
    Patch { area: f64, bounds: Aabb },
}

#[derive(Debug, Clone)]
struct BodyEntry {
    data: BodyData,
    /// Created through the provider interface rather than by the user.
    derived: bool,
}

#[derive(Debug, Clone, Copy)]
struct PlaneData {
    axis: Axis,
    offset: f64,
}

/// Curves left by a cut.
#[derive(Debug, Clone)]
enum SketchData {
    Empty,
    Waterplane {
        planform: Planform,
        z: f64,
        closed: bool,
    },
    Station {
        x: f64,
        width: f64,
        height: f64,
        bounds: Aabb,
        closed: bool,
        breached: bool,
    },
}

impl SketchData {
    fn shape(&self) -> SectionShape {
        match self {
            Self::Empty => SectionShape::Empty,
            Self::Waterplane { closed: true, .. } | Self::Station { closed: true, .. } => {
                SectionShape::Closed { profiles: 1 }
            }
            Self::Waterplane { .. } | Self::Station { .. } => SectionShape::OpenCurves,
        }
    }
}

/// A failure the kernel can be told to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Split,
    Stitch,
}

/// Counts of the operations performed so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KernelStats {
    pub sections: usize,
    pub splits: usize,
    pub stitches: usize,
}

/// In-process [`GeometryProvider`] over prismatic bodies.
#[derive(Debug, Default)]
pub struct PrismKernel {
    bodies: SlotMap<BodyId, BodyEntry>,
    planes: SlotMap<PlaneId, PlaneData>,
    sketches: SlotMap<SketchId, SketchData>,
    stats: KernelStats,
    fault: Option<Fault>,
}

impl PrismKernel {
    /// Creates an empty kernel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a closed solid body to the model.
    pub fn add_solid(&mut self, prism: Prism) -> BodyId {
        self.insert_body(BodyData::Solid(prism), false)
    }

    /// Adds an open-topped hull surface to the model.
    pub fn add_shell(&mut self, prism: Prism) -> BodyId {
        self.insert_body(BodyData::Shell(prism), false)
    }

    /// Makes every subsequent operation of the given kind fail.
    pub fn inject_fault(&mut self, fault: Fault) {
        self.fault = Some(fault);
    }

    /// Sections, splits and stitches performed so far.
    #[must_use]
    pub fn stats(&self) -> KernelStats {
        self.stats
    }

    /// Number of planes, sketches and bodies created through the provider
    /// interface and not yet released.
    #[must_use]
    pub fn live_transients(&self) -> usize {
        let bodies = self.bodies.values().filter(|entry| entry.derived).count();
        bodies + self.planes.len() + self.sketches.len()
    }

    fn insert_body(&mut self, data: BodyData, derived: bool) -> BodyId {
        self.bodies.insert(BodyEntry { data, derived })
    }

    fn body(&self, id: BodyId) -> Result<&BodyData> {
        self.bodies
            .get(id)
            .map(|entry| &entry.data)
            .ok_or_else(|| GeometryError::EntityNotFound("body").into())
    }

    fn plane(&self, id: PlaneId) -> Result<PlaneData> {
        self.planes
            .get(id)
            .copied()
            .ok_or_else(|| GeometryError::EntityNotFound("plane").into())
    }

    fn sketch(&self, id: SketchId) -> Result<&SketchData> {
        self.sketches
            .get(id)
            .ok_or_else(|| GeometryError::EntityNotFound("sketch").into())
    }

    fn section_of(prism: &Prism, plane: PlaneData, open_top: bool) -> Result<SketchData> {
        match plane.axis {
            Axis::Z => {
                let z = plane.offset;
                if !prism.crosses_z(z) {
                    return Ok(SketchData::Empty);
                }
                let gap = prism.breach.is_some_and(|b| b.cuts_at(z));
                Ok(SketchData::Waterplane {
                    planform: prism.planform.clone(),
                    z,
                    closed: !gap,
                })
            }
            Axis::X => {
                let x = plane.offset;
                let width = 2.0 * prism.planform.half_breadth_at(x);
                if width < TOLERANCE {
                    return Ok(SketchData::Empty);
                }
                let y = prism.planform.centerline();
                let bounds = Aabb {
                    min: Point3::new(x, y - width * 0.5, prism.z_min),
                    max: Point3::new(x, y + width * 0.5, prism.z_max),
                };
                let breached = matches!(prism.breach, Some(Breach::Wall { .. }));
                Ok(SketchData::Station {
                    x,
                    width,
                    height: prism.height(),
                    bounds,
                    closed: !open_top && !breached,
                    breached,
                })
            }
            Axis::Y => Err(GeometryError::InvalidInput(
                "longitudinal sections are not supported".into(),
            )
            .into()),
        }
    }
}

impl GeometryProvider for PrismKernel {
    fn bounding_box(&self, body: BodyId) -> Result<Aabb> {
        Ok(match self.body(body)? {
            BodyData::Solid(prism) | BodyData::Shell(prism) => prism.bounds(),
            BodyData::Cap { planform, z } => {
                let (x_min, x_max) = planform.x_range();
                let y = planform.centerline();
                let half = planform.max_half_breadth();
                Aabb {
                    min: Point3::new(x_min, y - half, *z),
                    max: Point3::new(x_max, y + half, *z),
                }
            }
            BodyData::Patch { bounds, .. } => *bounds,
        })
    }

    fn add_plane(&mut self, axis: Axis, offset: f64) -> Result<PlaneId> {
        if !offset.is_finite() {
            return Err(GeometryError::InvalidInput(format!("plane offset {offset}")).into());
        }
        Ok(self.planes.insert(PlaneData { axis, offset }))
    }

    fn cross_section(&mut self, body: BodyId, plane: PlaneId) -> Result<CrossSection> {
        let plane = self.plane(plane)?;
        let data = match self.body(body)? {
            BodyData::Solid(prism) => Self::section_of(prism, plane, false)?,
            BodyData::Shell(prism) => Self::section_of(prism, plane, true)?,
            BodyData::Cap { .. } | BodyData::Patch { .. } => {
                return Err(
                    GeometryError::InvalidInput("cannot section a planar surface".into()).into(),
                )
            }
        };
        self.stats.sections += 1;
        let shape = data.shape();
        let sketch = self.sketches.insert(data);
        Ok(CrossSection { sketch, shape })
    }

    fn profile_area(&self, sketch: SketchId, profile: usize) -> Result<f64> {
        match self.sketch(sketch)? {
            SketchData::Waterplane {
                planform,
                closed: true,
                ..
            } if profile == 0 => Ok(planform.area()),
            SketchData::Station {
                width,
                height,
                closed: true,
                ..
            } if profile == 0 => Ok(width * height),
            _ => Err(GeometryError::EntityNotFound("profile").into()),
        }
    }

    fn cap_profile(&mut self, sketch: SketchId, profile: usize) -> Result<BodyId> {
        let data = match self.sketch(sketch)? {
            SketchData::Waterplane {
                planform,
                z,
                closed: true,
            } if profile == 0 => BodyData::Cap {
                planform: planform.clone(),
                z: *z,
            },
            SketchData::Station {
                width,
                height,
                bounds,
                closed: true,
                ..
            } if profile == 0 => BodyData::Patch {
                area: width * height,
                bounds: *bounds,
            },
            _ => return Err(GeometryError::EntityNotFound("profile").into()),
        };
        Ok(self.insert_body(data, true))
    }

    fn cap_curves(&mut self, sketch: SketchId) -> Result<BodyId> {
        let data = match self.sketch(sketch)? {
            SketchData::Empty => {
                return Err(GeometryError::CapFailed("sketch holds no curves".into()).into())
            }
            SketchData::Station { breached: true, x, .. } => {
                return Err(GeometryError::CapFailed(format!(
                    "curves at x = {x} are interrupted by a breach"
                ))
                .into())
            }
            SketchData::Station {
                width,
                height,
                bounds,
                ..
            } => BodyData::Patch {
                area: width * height,
                bounds: *bounds,
            },
            SketchData::Waterplane {
                planform,
                z,
                closed,
            } => {
                if !closed {
                    return Err(GeometryError::CapFailed(format!(
                        "waterline at z = {z} is interrupted by a breach"
                    ))
                    .into());
                }
                BodyData::Cap {
                    planform: planform.clone(),
                    z: *z,
                }
            }
        };
        Ok(self.insert_body(data, true))
    }

    fn split_below(&mut self, body: BodyId, plane: PlaneId) -> Result<SplitFragments> {
        if self.fault == Some(Fault::Split) {
            return Err(GeometryError::SplitFailed("injected fault".into()).into());
        }
        let plane = self.plane(plane)?;
        if plane.axis != Axis::Z {
            return Err(
                GeometryError::SplitFailed("only horizontal planes can split a hull".into()).into(),
            );
        }
        let z = plane.offset;
        let (below, above) = match self.body(body)? {
            BodyData::Solid(prism) if prism.crosses_z(z) => {
                let (below, above) = prism.split_at(z);
                (BodyData::Solid(below), BodyData::Solid(above))
            }
            BodyData::Shell(prism) if prism.crosses_z(z) => {
                let (below, above) = prism.split_at(z);
                (BodyData::Shell(below), BodyData::Shell(above))
            }
            _ => {
                return Err(GeometryError::SplitFailed(format!(
                    "plane at z = {z} does not cross the body"
                ))
                .into())
            }
        };
        self.stats.splits += 1;
        Ok(SplitFragments {
            below: self.insert_body(below, true),
            above: self.insert_body(above, true),
        })
    }

    fn stitch(&mut self, bodies: &[BodyId], tolerance: f64) -> Result<BodyId> {
        if self.fault == Some(Fault::Stitch) {
            return Err(GeometryError::StitchFailed("injected fault".into()).into());
        }
        let mut cap = None;
        let mut hull = None;
        for &id in bodies {
            match self.body(id)? {
                BodyData::Cap { planform, z } => cap = Some((planform, *z)),
                BodyData::Solid(prism) | BodyData::Shell(prism) => hull = Some(prism),
                BodyData::Patch { .. } => {}
            }
        }
        let (Some((planform, z)), Some(prism)) = (cap, hull) else {
            return Err(
                GeometryError::StitchFailed("expected a cap and a hull surface".into()).into(),
            );
        };
        if bodies.len() != 2 || *planform != prism.planform || (z - prism.z_max).abs() > tolerance
        {
            return Err(
                GeometryError::StitchFailed("cap does not meet the open edge".into()).into(),
            );
        }
        let closed = prism.clone();
        self.stats.stitches += 1;
        Ok(self.insert_body(BodyData::Solid(closed), true))
    }

    fn area(&self, body: BodyId) -> Result<f64> {
        match self.body(body)? {
            BodyData::Cap { planform, .. } => Ok(planform.area()),
            BodyData::Patch { area, .. } => Ok(*area),
            BodyData::Solid(_) | BodyData::Shell(_) => {
                Err(GeometryError::InvalidInput("body is not a planar surface".into()).into())
            }
        }
    }

    fn volume(&self, body: BodyId) -> Result<f64> {
        Ok(match self.body(body)? {
            BodyData::Solid(prism) if prism.is_intact() => prism.gross_volume(),
            _ => 0.0,
        })
    }

    fn mass(&self, body: BodyId) -> Result<f64> {
        Ok(match self.body(body)? {
            BodyData::Solid(prism) => prism.mass(),
            _ => 0.0,
        })
    }

    fn center_of_mass(&self, body: BodyId) -> Result<Point3> {
        Ok(match self.body(body)? {
            BodyData::Solid(prism) | BodyData::Shell(prism) => prism.center(),
            BodyData::Cap { planform, z } => {
                let c = planform.centroid();
                Point3::new(c.x, c.y, *z)
            }
            BodyData::Patch { bounds, .. } => nalgebra::center(&bounds.min, &bounds.max),
        })
    }

    fn release(&mut self, entity: Transient) {
        let released = match entity {
            Transient::Body(id) => {
                if self.bodies.get(id).is_some_and(|entry| !entry.derived) {
                    tracing::warn!("refusing to release model body {id:?}");
                    return;
                }
                self.bodies.remove(id).is_some()
            }
            Transient::Plane(id) => self.planes.remove(id).is_some(),
            Transient::Sketch(id) => self.sketches.remove(id).is_some(),
        };
        if !released {
            tracing::warn!("release of unknown entity {entity:?}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::HydrolisError;
    use approx::assert_relative_eq;

    fn box_prism() -> Prism {
        Prism::new(Planform::rectangle(0.0, 1000.0, 200.0), 0.0, 100.0)
    }

    #[test]
    fn horizontal_section_of_shell() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(box_prism());
        let inside = kernel.add_plane(Axis::Z, 40.0).unwrap();
        let above = kernel.add_plane(Axis::Z, 140.0).unwrap();

        let section = kernel.cross_section(hull, inside).unwrap();
        assert_eq!(section.shape, SectionShape::Closed { profiles: 1 });
        assert_relative_eq!(kernel.profile_area(section.sketch, 0).unwrap(), 200_000.0);

        let section = kernel.cross_section(hull, above).unwrap();
        assert_eq!(section.shape, SectionShape::Empty);
        assert_eq!(kernel.stats().sections, 2);
    }

    #[test]
    fn transverse_section_of_shell_is_open() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(box_prism());
        let plane = kernel.add_plane(Axis::X, 500.0).unwrap();
        let section = kernel.cross_section(hull, plane).unwrap();
        assert_eq!(section.shape, SectionShape::OpenCurves);
        assert!(kernel.profile_area(section.sketch, 0).is_err());
        let patch = kernel.cap_curves(section.sketch).unwrap();
        assert_relative_eq!(kernel.area(patch).unwrap(), 20_000.0);
    }

    #[test]
    fn wall_breach_opens_waterline() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(box_prism().with_breach(Breach::Wall {
            z_from: 60.0,
            z_to: 70.0,
        }));
        let plane = kernel.add_plane(Axis::Z, 65.0).unwrap();
        let section = kernel.cross_section(hull, plane).unwrap();
        assert_eq!(section.shape, SectionShape::OpenCurves);
        assert!(matches!(
            kernel.cap_curves(section.sketch),
            Err(HydrolisError::Geometry(GeometryError::CapFailed(_)))
        ));
    }

    #[test]
    fn split_and_stitch_give_submerged_volume() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(box_prism());
        let plane = kernel.add_plane(Axis::Z, 50.0).unwrap();
        let section = kernel.cross_section(hull, plane).unwrap();
        let cap = kernel.cap_profile(section.sketch, 0).unwrap();
        let parts = kernel.split_below(hull, plane).unwrap();

        let below = kernel.bounding_box(parts.below).unwrap();
        assert_relative_eq!(below.max.z, 50.0);
        assert_relative_eq!(kernel.volume(parts.below).unwrap(), 0.0);

        let solid = kernel.stitch(&[cap, parts.below], 0.1).unwrap();
        assert_relative_eq!(kernel.volume(solid).unwrap(), 10_000_000.0);
        assert_eq!(
            kernel.stats(),
            KernelStats {
                sections: 1,
                splits: 1,
                stitches: 1
            }
        );
    }

    #[test]
    fn stitch_rejects_misplaced_cap() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(box_prism());
        let low = kernel.add_plane(Axis::Z, 20.0).unwrap();
        let high = kernel.add_plane(Axis::Z, 50.0).unwrap();
        let section = kernel.cross_section(hull, low).unwrap();
        let cap = kernel.cap_profile(section.sketch, 0).unwrap();
        let parts = kernel.split_below(hull, high).unwrap();
        assert!(matches!(
            kernel.stitch(&[cap, parts.below], 0.1),
            Err(HydrolisError::Geometry(GeometryError::StitchFailed(_)))
        ));
    }

    #[test]
    fn split_rejects_plane_outside_body() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(box_prism());
        let plane = kernel.add_plane(Axis::Z, 150.0).unwrap();
        assert!(matches!(
            kernel.split_below(hull, plane),
            Err(HydrolisError::Geometry(GeometryError::SplitFailed(_)))
        ));
        assert_eq!(kernel.stats().splits, 0);
    }

    #[test]
    fn injected_faults() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(box_prism());
        let plane = kernel.add_plane(Axis::Z, 50.0).unwrap();
        kernel.inject_fault(Fault::Split);
        assert!(kernel.split_below(hull, plane).is_err());
        kernel.inject_fault(Fault::Stitch);
        assert!(kernel.stitch(&[hull], 0.1).is_err());
    }

    #[test]
    fn release_tracks_live_transients() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(box_prism());
        assert_eq!(kernel.live_transients(), 0);
        let plane = kernel.add_plane(Axis::Z, 50.0).unwrap();
        let section = kernel.cross_section(hull, plane).unwrap();
        assert_eq!(kernel.live_transients(), 2);

        kernel.release(section.sketch.into());
        kernel.release(plane.into());
        kernel.release(plane.into());
        assert_eq!(kernel.live_transients(), 0);

        // Model bodies are never deleted through the provider.
        kernel.release(hull.into());
        assert!(kernel.bounding_box(hull).is_ok());
    }

    #[test]
    fn mass_and_center_of_solid() {
        let mut kernel = PrismKernel::new();
        let body = kernel.add_solid(
            Prism::new(Planform::rectangle(-5.0, 5.0, 10.0), -1.0, 9.0).with_density(30.0),
        );
        assert_relative_eq!(kernel.mass(body).unwrap(), 30.0, max_relative = 1e-12);
        let c = kernel.center_of_mass(body).unwrap();
        assert_relative_eq!(c.z, 4.0);
        assert!(c.x.abs() < 1e-9 && c.y.abs() < 1e-9);
    }
}
