//! Human-readable summaries of hydrostatic results.
//!
//! Each report wraps a result value and renders it through [`fmt::Display`]
//! with the rounding used for presentation.

use std::fmt;

use super::area_curve::AreaSample;
use super::displacement::DisplacementResult;
use super::draft::DraftSolution;
use super::mass::WeightedPoint;
use super::section_max::SectionMaxResult;

/// Total mass and centre of gravity, to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightReport(pub WeightedPoint);

impl fmt::Display for WeightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let WeightedPoint { mass, position } = self.0;
        write!(
            f,
            "total mass: {mass:.2} kg, centre of gravity: x {:.2}, y {:.2}, z {:.2}",
            position.x, position.y, position.z
        )
    }
}

/// Draft found for a target displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftReport {
    pub solution: DraftSolution,
    pub converged: bool,
}

impl fmt::Display for DraftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "for a displacement of {:.0} kg the draft is {:.1} cm",
            self.solution.weight, self.solution.draft
        )?;
        if !self.converged {
            f.write_str(" (best estimate, search did not converge)")?;
        }
        Ok(())
    }
}

/// Displaced weight at a user-given draft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementReport {
    /// Draft in cm.
    pub draft: f64,
    pub result: DisplacementResult,
}

impl fmt::Display for DisplacementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let draft_mm = self.draft * 10.0;
        match self.result {
            DisplacementResult::Displaced { weight } => write!(
                f,
                "at a draft of {draft_mm:.2} mm the displacement is {weight:.2} kg"
            ),
            DisplacementResult::NotFloating => write!(
                f,
                "at a draft of {draft_mm:.2} mm the hull takes water or misses the waterplane"
            ),
        }
    }
}

/// Largest transverse section and where it sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionReport(pub SectionMaxResult);

impl fmt::Display for SectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sample = self.0.sample;
        write!(
            f,
            "maximum section: {:.2} cm² at station {:.2} cm",
            sample.area, sample.station
        )?;
        if !self.0.converged {
            write!(f, " (stopped after {} iterations)", self.0.iterations)?;
        }
        Ok(())
    }
}

/// Area curve as `(station, area)` points, one per line.
#[derive(Debug, Clone, Copy)]
pub struct AreaCurveReport<'a>(pub &'a [AreaSample]);

impl AreaCurveReport<'_> {
    /// Points ordered by station, ready for plotting.
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self.0.iter().map(|s| (s.station, s.area)).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }
}

impl fmt::Display for AreaCurveReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("station (cm)\tarea (cm²)")?;
        for (station, area) in self.points() {
            write!(f, "\n{station:.2}\t{area:.2}")?;
        }
        Ok(())
    }
}
