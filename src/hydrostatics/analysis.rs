use std::fmt;

use crate::config::HydroConfig;
use crate::error::{GeometryError, HydrostaticError, Result};
use crate::provider::{BodyId, GeometryProvider, Scratch};

use super::area_curve::{AreaCurve, AreaSample};
use super::displacement::Displacement;
use super::draft::{DraftSearch, DraftSolution};
use super::report::{AreaCurveReport, DraftReport, SectionReport};
use super::section_max::{Bracket, SectionMax, SectionMaxResult};

/// Everything the full analysis learns about a hull at its equilibrium
/// draft.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrostaticReport {
    pub draft: DraftSolution,
    /// `false` if `draft` is the best estimate of an unconverged search.
    pub converged: bool,
    pub draft_iterations: usize,
    /// Submerged volume in cm³.
    pub submerged_volume: f64,
    pub area_curve: Vec<AreaSample>,
    pub max_section: SectionMaxResult,
}

impl fmt::Display for HydrostaticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            DraftReport {
                solution: self.draft,
                converged: self.converged,
            }
        )?;
        writeln!(f, "{}", SectionReport(self.max_section))?;
        write!(f, "{}", AreaCurveReport(&self.area_curve))
    }
}

/// Draft, area curve and maximum section of a hull carrying a given weight.
///
/// Finds the equilibrium waterline, extracts the submerged volume there,
/// samples its transverse areas and refines the largest one. The submerged
/// volume is released before returning.
pub struct HydrostaticAnalysis {
    hull: BodyId,
    target_weight: f64,
    config: HydroConfig,
}

impl HydrostaticAnalysis {
    /// Creates a new `HydrostaticAnalysis` for a target weight in kilograms.
    #[must_use]
    pub fn new(hull: BodyId, target_weight: f64) -> Self {
        Self {
            hull,
            target_weight,
            config: HydroConfig::default(),
        }
    }

    /// Sets the parameters used by every stage.
    #[must_use]
    pub fn with_config(mut self, config: HydroConfig) -> Self {
        self.config = config;
        self
    }

    /// Executes the analysis.
    ///
    /// An unconverged draft search still yields a report, built on its best
    /// estimate and flagged as such.
    ///
    /// # Errors
    ///
    /// Returns a config error for invalid settings,
    /// [`HydrostaticError::Unconverged`] if no trial waterline floated at
    /// all, and propagates punctured-hull and geometry failures.
    pub fn execute<P: GeometryProvider + ?Sized>(
        &self,
        provider: &mut P,
    ) -> Result<HydrostaticReport> {
        self.config.validate()?;

        let outcome = DraftSearch::new(self.hull, self.target_weight)
            .with_config(self.config)
            .execute(provider)?;
        let Some(draft) = outcome.solution() else {
            return Err(HydrostaticError::Unconverged {
                iterations: outcome.iterations(),
                best: None,
            }
            .into());
        };

        let submerged = Displacement::new(self.hull, draft.waterline)
            .with_config(self.config)
            .extract(provider)?
            .ok_or_else(|| {
                GeometryError::InvalidInput(format!(
                    "hull does not float at its own waterline {}",
                    draft.waterline
                ))
            })?;

        let mut scratch = Scratch::new(provider);
        let volume = scratch.track(submerged.body);
        let area_curve = AreaCurve::new(volume, self.config.station_count).execute(&mut *scratch)?;
        let bracket = Bracket::from_curve(&area_curve)?;
        let max_section = SectionMax::new(volume, bracket)
            .with_config(self.config)
            .execute(&mut *scratch)?;

        tracing::info!(
            draft = draft.draft,
            weight = draft.weight,
            converged = outcome.is_converged(),
            max_area = max_section.sample.area,
            max_station = max_section.sample.station,
            "hydrostatic analysis complete"
        );
        Ok(HydrostaticReport {
            draft,
            converged: outcome.is_converged(),
            draft_iterations: outcome.iterations(),
            submerged_volume: submerged.volume,
            area_curve,
            max_section,
        })
    }
}
