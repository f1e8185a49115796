use std::iter::Sum;

use crate::error::{HydrostaticError, Result};
use crate::math::Point3;
use crate::provider::{BodyId, GeometryProvider};

/// A mass concentrated at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoint {
    /// Mass in kilograms, never negative.
    pub mass: f64,
    pub position: Point3,
}

impl WeightedPoint {
    /// Creates a point mass in kilograms.
    #[must_use]
    pub fn new(mass: f64, position: Point3) -> Self {
        Self { mass, position }
    }

    /// The massless point at the origin; identity of [`WeightedPoint::combine`].
    #[must_use]
    pub fn zero() -> Self {
        Self::new(0.0, Point3::origin())
    }

    /// Merges two masses into one at their common centre of gravity.
    ///
    /// A massless `next` leaves `self` unchanged, as does a zero total.
    #[must_use]
    pub fn combine(self, next: Self) -> Self {
        let total = self.mass + next.mass;
        if next.mass <= 0.0 || total <= 0.0 {
            return self;
        }
        let coords = (self.position.coords * self.mass + next.position.coords * next.mass) / total;
        Self::new(total, Point3::from(coords))
    }
}

impl Default for WeightedPoint {
    fn default() -> Self {
        Self::zero()
    }
}

impl Sum for WeightedPoint {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Self::combine)
    }
}

/// Folds `next` into `acc`. See [`WeightedPoint::combine`].
#[must_use]
pub fn combine(acc: WeightedPoint, next: WeightedPoint) -> WeightedPoint {
    acc.combine(next)
}

/// Total mass and centre of gravity of a selection of bodies.
pub struct WeightEstimate {
    bodies: Vec<BodyId>,
}

impl WeightEstimate {
    /// Creates a new `WeightEstimate` over the selected bodies.
    #[must_use]
    pub fn new(bodies: impl IntoIterator<Item = BodyId>) -> Self {
        Self {
            bodies: bodies.into_iter().collect(),
        }
    }

    /// Executes the estimate, folding the bodies in selection order.
    ///
    /// The fold starts from the first body, so an all-massless selection
    /// reports the first body's centre of mass.
    ///
    /// # Errors
    ///
    /// Returns [`HydrostaticError::EmptySelection`] if no body was selected,
    /// or a provider error if a body's properties cannot be read.
    pub fn execute<P: GeometryProvider + ?Sized>(&self, provider: &P) -> Result<WeightedPoint> {
        let (first, rest) = self
            .bodies
            .split_first()
            .ok_or(HydrostaticError::EmptySelection)?;
        let mut total = body_point(provider, *first)?;
        for &body in rest {
            total = total.combine(body_point(provider, body)?);
        }
        tracing::debug!(
            bodies = self.bodies.len(),
            mass = total.mass,
            "weight estimate complete"
        );
        Ok(total)
    }
}

fn body_point<P: GeometryProvider + ?Sized>(provider: &P, body: BodyId) -> Result<WeightedPoint> {
    Ok(WeightedPoint::new(
        provider.mass(body)?,
        provider.center_of_mass(body)?,
    ))
}
