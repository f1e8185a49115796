use crate::config::CM3_PER_LITRE;
use crate::math::{Point3, TOLERANCE};
use crate::provider::Aabb;

use super::Planform;

/// A hole in a hull body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Breach {
    /// Hole in the bottom plating. Sections stay closed but no stitched
    /// volume is ever watertight.
    Bottom,
    /// Hole in the side plating between two heights. Horizontal sections
    /// through it leave a gap.
    Wall { z_from: f64, z_to: f64 },
}

impl Breach {
    /// Returns `true` if a horizontal cut at `z` runs through the hole.
    #[must_use]
    pub fn cuts_at(&self, z: f64) -> bool {
        match *self {
            Self::Bottom => false,
            Self::Wall { z_from, z_to } => z >= z_from - TOLERANCE && z <= z_to + TOLERANCE,
        }
    }
}

/// A vertical-sided body: a planform swept from `z_min` to `z_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prism {
    pub planform: Planform,
    pub z_min: f64,
    pub z_max: f64,
    /// Material density in kg per litre.
    pub density: f64,
    pub breach: Option<Breach>,
}

impl Prism {
    /// Creates a massless, intact prism. The heights are swapped if given
    /// in the wrong order.
    #[must_use]
    pub fn new(planform: Planform, z_min: f64, z_max: f64) -> Self {
        Self {
            planform,
            z_min: z_min.min(z_max),
            z_max: z_min.max(z_max),
            density: 0.0,
            breach: None,
        }
    }

    /// Sets the material density (kg/L).
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Punches a hole in the body.
    #[must_use]
    pub fn with_breach(mut self, breach: Breach) -> Self {
        self.breach = Some(breach);
        self
    }

    /// Vertical extent in cm.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.z_max - self.z_min
    }

    /// Returns `true` if a horizontal cut at `z` meets the side walls.
    #[must_use]
    pub fn crosses_z(&self, z: f64) -> bool {
        z > self.z_min + TOLERANCE && z <= self.z_max + TOLERANCE
    }

    /// Returns `true` if no breach interrupts the plating.
    #[must_use]
    pub fn is_intact(&self) -> bool {
        self.breach.is_none()
    }

    /// Enclosed volume in cubic centimetres, ignoring breaches.
    #[must_use]
    pub fn gross_volume(&self) -> f64 {
        self.planform.area() * self.height()
    }

    /// Mass of the enclosed material in kilograms.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.gross_volume() / CM3_PER_LITRE * self.density
    }

    /// Centre of the enclosed volume.
    #[must_use]
    pub fn center(&self) -> Point3 {
        let c = self.planform.centroid();
        Point3::new(c.x, c.y, (self.z_min + self.z_max) * 0.5)
    }

    /// Axis-aligned bounds.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let (x_min, x_max) = self.planform.x_range();
        let y = self.planform.centerline();
        let half = self.planform.max_half_breadth();
        Aabb {
            min: Point3::new(x_min, y - half, self.z_min),
            max: Point3::new(x_max, y + half, self.z_max),
        }
    }

    /// Splits at height `z` into the parts below and above. A cut at the
    /// top edge leaves a zero-height upper part.
    #[must_use]
    pub fn split_at(&self, z: f64) -> (Self, Self) {
        let z = z.min(self.z_max);
        let below_breach = match self.breach {
            Some(Breach::Wall { z_from, z_to }) if z_from < z => Some(Breach::Wall {
                z_from,
                z_to: z_to.min(z),
            }),
            Some(Breach::Wall { .. }) => None,
            other => other,
        };
        let above_breach = match self.breach {
            Some(Breach::Wall { z_from, z_to }) if z_to > z => Some(Breach::Wall {
                z_from: z_from.max(z),
                z_to,
            }),
            _ => None,
        };
        let below = Self {
            z_max: z,
            breach: below_breach,
            ..self.clone()
        };
        let above = Self {
            z_min: z,
            breach: above_breach,
            ..self.clone()
        };
        (below, above)
    }
}
