use crate::config::HydroConfig;
use crate::error::{HydrostaticError, Result};
use crate::provider::{Axis, BodyId, GeometryProvider, Scratch, SectionShape};

/// Outcome of immersing a hull to a given waterline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplacementResult {
    /// Weight of water displaced, in kilograms.
    Displaced { weight: f64 },
    /// The waterline does not close around the hull: water gets in, or the
    /// plane is clear of the hull.
    NotFloating,
}

impl DisplacementResult {
    /// Displaced weight, if the hull floats.
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        match *self {
            Self::Displaced { weight } => Some(weight),
            Self::NotFloating => None,
        }
    }
}

/// A watertight body bounded by the hull and its waterplane.
///
/// The body belongs to the caller, who must release it.
#[derive(Debug, Clone, Copy)]
pub struct SubmergedVolume {
    pub body: BodyId,
    pub waterline: f64,
    /// Volume in cubic centimetres.
    pub volume: f64,
    /// Displaced weight in kilograms.
    pub weight: f64,
}

/// Displaced weight of a hull immersed to a horizontal waterline.
///
/// The waterline is a plane at height `waterline` above the XY origin
/// plane. Every closed profile of the waterplane is capped, so a multihull
/// is closed across each of its hulls. The hull body itself is never modified; every plane, sketch,
/// cap, fragment and stitched body created on the way is released before
/// returning, on success and on error alike.
pub struct Displacement {
    hull: BodyId,
    waterline: f64,
    config: HydroConfig,
}

impl Displacement {
    /// Creates a new `Displacement` query at an absolute waterline height.
    #[must_use]
    pub fn new(hull: BodyId, waterline: f64) -> Self {
        Self {
            hull,
            waterline,
            config: HydroConfig::default(),
        }
    }

    /// Creates a query for a draft measured from the bottom of the hull.
    ///
    /// # Errors
    ///
    /// Returns [`HydrostaticError::NegativeDraft`] for a negative draft, or a
    /// provider error if the hull bounds cannot be read.
    pub fn at_draft<P: GeometryProvider + ?Sized>(
        provider: &P,
        hull: BodyId,
        draft: f64,
    ) -> Result<Self> {
        if draft < 0.0 {
            return Err(HydrostaticError::NegativeDraft(draft).into());
        }
        let bounds = provider.bounding_box(hull)?;
        Ok(Self::new(hull, bounds.min.z + draft))
    }

    /// Sets the water density and stitch tolerance source.
    #[must_use]
    pub fn with_config(mut self, config: HydroConfig) -> Self {
        self.config = config;
        self
    }

    /// Absolute waterline height in cm.
    #[must_use]
    pub fn waterline(&self) -> f64 {
        self.waterline
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns [`HydrostaticError::PuncturedHull`] if the stitched volume is
    /// not watertight, or a provider error if a split or stitch fails.
    pub fn execute<P: GeometryProvider + ?Sized>(
        &self,
        provider: &mut P,
    ) -> Result<DisplacementResult> {
        let mut scratch = Scratch::new(provider);
        let result = match self.immerse(&mut scratch)? {
            Some((_, volume)) => DisplacementResult::Displaced {
                weight: self.config.weight_of(volume),
            },
            None => DisplacementResult::NotFloating,
        };
        Ok(result)
    }

    /// Executes the query but hands the submerged body to the caller.
    ///
    /// Returns `None` when the hull does not float at this waterline.
    ///
    /// # Errors
    ///
    /// Same as [`Displacement::execute`].
    pub fn extract<P: GeometryProvider + ?Sized>(
        &self,
        provider: &mut P,
    ) -> Result<Option<SubmergedVolume>> {
        let mut scratch = Scratch::new(provider);
        let Some((body, volume)) = self.immerse(&mut scratch)? else {
            return Ok(None);
        };
        scratch.keep(body);
        Ok(Some(SubmergedVolume {
            body,
            waterline: self.waterline,
            volume,
            weight: self.config.weight_of(volume),
        }))
    }

    fn immerse<P: GeometryProvider + ?Sized>(
        &self,
        scratch: &mut Scratch<'_, P>,
    ) -> Result<Option<(BodyId, f64)>> {
        let plane = scratch.add_plane(Axis::Z, self.waterline)?;
        scratch.track(plane);
        let section = scratch.cross_section(self.hull, plane)?;
        scratch.track(section.sketch);

        let SectionShape::Closed { profiles } = section.shape else {
            tracing::debug!(
                waterline = self.waterline,
                shape = ?section.shape,
                "waterline does not close around the hull"
            );
            return Ok(None);
        };

        let mut faces = Vec::with_capacity(profiles + 1);
        for profile in 0..profiles {
            let cap = scratch.cap_profile(section.sketch, profile)?;
            faces.push(scratch.track(cap));
        }
        let fragments = scratch.split_below(self.hull, plane)?;
        scratch.track(fragments.below);
        scratch.track(fragments.above);
        faces.push(fragments.below);

        let body = scratch.stitch(&faces, self.config.stitch_tolerance)?;
        scratch.track(body);
        let volume = scratch.volume(body)?;
        // Anything that rounds to zero cubic centimetres is a leak.
        if volume.abs() < 0.5 {
            return Err(HydrostaticError::PuncturedHull {
                waterline: self.waterline,
                volume,
            }
            .into());
        }
        Ok(Some((body, volume)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GeometryError, HydrolisError};
    use crate::kernel::{Breach, Fault, Planform, Prism, PrismKernel};
    use crate::math::{Point2, Point3};
    use crate::provider::{Aabb, CrossSection, PlaneId, SketchId, SplitFragments, Transient};
    use approx::assert_relative_eq;

    /// Reports each closed waterplane as two profiles and records how many
    /// faces every stitch receives.
    struct TwinProfiles {
        kernel: PrismKernel,
        stitched: Vec<usize>,
    }

    impl GeometryProvider for TwinProfiles {
        fn bounding_box(&self, body: BodyId) -> Result<Aabb> {
            self.kernel.bounding_box(body)
        }

        fn add_plane(&mut self, axis: Axis, offset: f64) -> Result<PlaneId> {
            self.kernel.add_plane(axis, offset)
        }

        fn cross_section(&mut self, body: BodyId, plane: PlaneId) -> Result<CrossSection> {
            let mut section = self.kernel.cross_section(body, plane)?;
            if let SectionShape::Closed { profiles } = &mut section.shape {
                *profiles = 2;
            }
            Ok(section)
        }

        fn profile_area(&self, sketch: SketchId, _profile: usize) -> Result<f64> {
            Ok(self.kernel.profile_area(sketch, 0)? * 0.5)
        }

        fn cap_profile(&mut self, sketch: SketchId, _profile: usize) -> Result<BodyId> {
            self.kernel.cap_profile(sketch, 0)
        }

        fn cap_curves(&mut self, sketch: SketchId) -> Result<BodyId> {
            self.kernel.cap_curves(sketch)
        }

        fn split_below(&mut self, body: BodyId, plane: PlaneId) -> Result<SplitFragments> {
            self.kernel.split_below(body, plane)
        }

        fn stitch(&mut self, bodies: &[BodyId], tolerance: f64) -> Result<BodyId> {
            self.stitched.push(bodies.len());
            let (Some(&first), Some(&last)) = (bodies.first(), bodies.last()) else {
                return Err(GeometryError::StitchFailed("nothing to stitch".into()).into());
            };
            self.kernel.stitch(&[first, last], tolerance)
        }

        fn area(&self, body: BodyId) -> Result<f64> {
            self.kernel.area(body)
        }

        fn volume(&self, body: BodyId) -> Result<f64> {
            self.kernel.volume(body)
        }

        fn mass(&self, body: BodyId) -> Result<f64> {
            self.kernel.mass(body)
        }

        fn center_of_mass(&self, body: BodyId) -> Result<Point3> {
            self.kernel.center_of_mass(body)
        }

        fn release(&mut self, entity: Transient) {
            self.kernel.release(entity);
        }
    }

    fn box_hull(kernel: &mut PrismKernel) -> BodyId {
        kernel.add_shell(Prism::new(
            Planform::rectangle(0.0, 1000.0, 200.0),
            0.0,
            100.0,
        ))
    }

    fn weight_at(kernel: &mut PrismKernel, hull: BodyId, z: f64) -> f64 {
        Displacement::new(hull, z)
            .execute(kernel)
            .unwrap()
            .weight()
            .unwrap()
    }

    #[test]
    fn half_submerged_box() {
        let mut kernel = PrismKernel::new();
        let hull = box_hull(&mut kernel);
        let weight = weight_at(&mut kernel, hull, 50.0);
        assert_relative_eq!(weight, 10_250.0, max_relative = 1e-12);
        assert_eq!(kernel.live_transients(), 0);
    }

    #[test]
    fn weight_grows_with_waterline() {
        let mut kernel = PrismKernel::new();
        let planform = Planform::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(300.0, 80.0),
            Point2::new(1000.0, 20.0),
        ])
        .unwrap();
        let hull = kernel.add_shell(Prism::new(planform, 0.0, 100.0));
        let weights: Vec<f64> = (1..=10)
            .map(|i| weight_at(&mut kernel, hull, f64::from(i) * 10.0))
            .collect();
        assert!(weights.windows(2).all(|w| w[0] <= w[1]), "{weights:?}");
        assert_eq!(kernel.live_transients(), 0);
    }

    #[test]
    fn waterline_above_deck_does_not_split() {
        let mut kernel = PrismKernel::new();
        let hull = box_hull(&mut kernel);
        let result = Displacement::new(hull, 150.0).execute(&mut kernel).unwrap();
        assert_eq!(result, DisplacementResult::NotFloating);
        assert_eq!(kernel.stats().splits, 0);
        assert_eq!(kernel.stats().stitches, 0);
        assert_eq!(kernel.live_transients(), 0);
    }

    #[test]
    fn waterline_through_wall_breach_takes_water() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(
            Prism::new(Planform::rectangle(0.0, 1000.0, 200.0), 0.0, 100.0).with_breach(
                Breach::Wall {
                    z_from: 60.0,
                    z_to: 70.0,
                },
            ),
        );
        let result = Displacement::new(hull, 65.0).execute(&mut kernel).unwrap();
        assert_eq!(result, DisplacementResult::NotFloating);
        assert!(Displacement::new(hull, 50.0)
            .execute(&mut kernel)
            .unwrap()
            .weight()
            .is_some());
        assert_eq!(kernel.live_transients(), 0);
    }

    #[test]
    fn punctured_bottom_is_reported() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(
            Prism::new(Planform::rectangle(0.0, 1000.0, 200.0), 0.0, 100.0)
                .with_breach(Breach::Bottom),
        );
        let err = Displacement::new(hull, 50.0).execute(&mut kernel).unwrap_err();
        assert!(matches!(
            err,
            HydrolisError::Hydrostatic(HydrostaticError::PuncturedHull { .. })
        ));
        assert_eq!(kernel.live_transients(), 0);
    }

    #[test]
    fn geometry_failures_abort_and_clean_up() {
        for fault in [Fault::Split, Fault::Stitch] {
            let mut kernel = PrismKernel::new();
            let hull = box_hull(&mut kernel);
            kernel.inject_fault(fault);
            let err = Displacement::new(hull, 50.0).execute(&mut kernel).unwrap_err();
            match fault {
                Fault::Split => assert!(matches!(
                    err,
                    HydrolisError::Geometry(GeometryError::SplitFailed(_))
                )),
                Fault::Stitch => assert!(matches!(
                    err,
                    HydrolisError::Geometry(GeometryError::StitchFailed(_))
                )),
            }
            assert_eq!(kernel.live_transients(), 0);
        }
    }

    #[test]
    fn extracted_volume_belongs_to_caller() {
        let mut kernel = PrismKernel::new();
        let hull = box_hull(&mut kernel);
        let submerged = Displacement::new(hull, 30.0)
            .extract(&mut kernel)
            .unwrap()
            .unwrap();
        assert_relative_eq!(submerged.volume, 6_000_000.0, max_relative = 1e-12);
        assert_relative_eq!(submerged.weight, 6_150.0, max_relative = 1e-12);
        assert_eq!(kernel.live_transients(), 1);
        assert_relative_eq!(kernel.bounding_box(submerged.body).unwrap().max.z, 30.0);

        kernel.release(submerged.body.into());
        assert_eq!(kernel.live_transients(), 0);
    }

    #[test]
    fn draft_is_measured_from_the_keel() {
        let mut kernel = PrismKernel::new();
        let hull = kernel.add_shell(Prism::new(
            Planform::rectangle(0.0, 1000.0, 200.0),
            10.0,
            110.0,
        ));
        let query = Displacement::at_draft(&kernel, hull, 25.0).unwrap();
        assert_relative_eq!(query.waterline(), 35.0);
        let weight = query.execute(&mut kernel).unwrap().weight().unwrap();
        assert_relative_eq!(weight, 5_125.0, max_relative = 1e-12);

        assert!(matches!(
            Displacement::at_draft(&kernel, hull, -1.0),
            Err(HydrolisError::Hydrostatic(HydrostaticError::NegativeDraft(_)))
        ));
    }

    #[test]
    fn every_waterplane_profile_is_capped() {
        let mut twin = TwinProfiles {
            kernel: PrismKernel::new(),
            stitched: Vec::new(),
        };
        let hull = box_hull(&mut twin.kernel);
        let weight = Displacement::new(hull, 50.0)
            .execute(&mut twin)
            .unwrap()
            .weight()
            .unwrap();
        assert_relative_eq!(weight, 10_250.0, max_relative = 1e-12);
        assert_eq!(twin.stitched, vec![3]);
        assert_eq!(twin.kernel.live_transients(), 0);
    }

    #[test]
    fn density_comes_from_config() {
        let mut kernel = PrismKernel::new();
        let hull = box_hull(&mut kernel);
        let result = Displacement::new(hull, 50.0)
            .with_config(HydroConfig::default().with_water_density(1.0))
            .execute(&mut kernel)
            .unwrap();
        assert_relative_eq!(result.weight().unwrap(), 10_000.0, max_relative = 1e-12);
    }
}
