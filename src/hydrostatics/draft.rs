use crate::config::HydroConfig;
use crate::error::{GeometryError, HydrostaticError, Result};
use crate::math::TOLERANCE;
use crate::provider::{Axis, BodyId, GeometryProvider};

use super::displacement::{Displacement, DisplacementResult};

/// A waterline at which the hull displaces a known weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftSolution {
    /// Height of the waterline above the keel, in cm.
    pub draft: f64,
    /// Absolute height of the waterline, in cm.
    pub waterline: f64,
    /// Displaced weight at this waterline, in kg.
    pub weight: f64,
}

/// How a draft search ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DraftOutcome {
    Converged {
        solution: DraftSolution,
        iterations: usize,
    },
    /// The iteration budget ran out. `best` is the floating evaluation
    /// closest to the target weight, if any evaluation floated at all.
    Unconverged {
        best: Option<DraftSolution>,
        iterations: usize,
    },
}

impl DraftOutcome {
    /// The converged solution, or the best estimate of an unconverged search.
    #[must_use]
    pub fn solution(&self) -> Option<DraftSolution> {
        match *self {
            Self::Converged { solution, .. } => Some(solution),
            Self::Unconverged { best, .. } => best,
        }
    }

    /// Whether the search met its tolerance.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// Number of displacement evaluations performed.
    #[must_use]
    pub fn iterations(&self) -> usize {
        match *self {
            Self::Converged { iterations, .. } | Self::Unconverged { iterations, .. } => iterations,
        }
    }

    /// Treats an unconverged search as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`HydrostaticError::Unconverged`] carrying the best estimate.
    pub fn into_converged(self) -> Result<DraftSolution> {
        match self {
            Self::Converged { solution, .. } => Ok(solution),
            Self::Unconverged { best, iterations } => {
                Err(HydrostaticError::Unconverged { iterations, best }.into())
            }
        }
    }
}

/// Position of the trial waterline between evaluations.
#[derive(Debug, Clone, Copy)]
struct SearchState {
    position: f64,
    step: f64,
    last: Option<DisplacementResult>,
    iteration: usize,
}

impl SearchState {
    /// Moves to the next trial waterline: back by half a step after sinking
    /// too deep or taking water, forward by a full step otherwise.
    fn advance(&mut self, target: f64) {
        let overshot = match self.last {
            Some(DisplacementResult::NotFloating) => true,
            Some(DisplacementResult::Displaced { weight }) => weight > target,
            None => false,
        };
        if overshot {
            self.step *= 0.5;
            self.position -= self.step;
        } else {
            self.position += self.step;
        }
        self.iteration += 1;
    }
}

/// Finds the waterline at which a hull displaces a target weight.
///
/// Starts at the keel and walks up in steps of a tenth of the hull height,
/// halving the step and backing off whenever the trial waterline sinks the
/// hull too deep or lets water in. Displaced weight is assumed to grow
/// with draft; hulls where it does not may converge slowly or not at all.
pub struct DraftSearch {
    hull: BodyId,
    target_weight: f64,
    config: HydroConfig,
}

impl DraftSearch {
    /// Creates a new `DraftSearch` for a target weight in kilograms.
    #[must_use]
    pub fn new(hull: BodyId, target_weight: f64) -> Self {
        Self {
            hull,
            target_weight,
            config: HydroConfig::default(),
        }
    }

    /// Sets density, tolerance, iteration cap and initial step.
    #[must_use]
    pub fn with_config(mut self, config: HydroConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the relative weight tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.draft_tolerance = tolerance;
        self
    }

    /// Sets the maximum number of displacement evaluations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.draft_max_iterations = max_iterations;
        self
    }

    /// Executes the search.
    ///
    /// # Errors
    ///
    /// Returns [`HydrostaticError::InvalidTarget`] for a non-positive target,
    /// and propagates punctured-hull and geometry failures from the
    /// displacement evaluations. Running out of iterations is not an error;
    /// see [`DraftOutcome::Unconverged`].
    pub fn execute<P: GeometryProvider + ?Sized>(&self, provider: &mut P) -> Result<DraftOutcome> {
        let target = self.target_weight;
        if !(target.is_finite() && target > 0.0) {
            return Err(HydrostaticError::InvalidTarget(target).into());
        }
        let bounds = provider.bounding_box(self.hull)?;
        let keel = bounds.min.z;
        let height = bounds.extent(Axis::Z);
        if height < TOLERANCE {
            return Err(GeometryError::InvalidInput("hull has no height".into()).into());
        }

        let mut state = SearchState {
            position: keel,
            step: self.config.initial_step_fraction * height,
            last: None,
            iteration: 0,
        };
        let mut best: Option<(f64, DraftSolution)> = None;

        while state.iteration < self.config.draft_max_iterations {
            state.advance(target);
            let result = Displacement::new(self.hull, state.position)
                .with_config(self.config)
                .execute(provider)?;
            tracing::debug!(
                iteration = state.iteration,
                waterline = state.position,
                step = state.step,
                weight = ?result.weight(),
                "draft search step"
            );
            state.last = Some(result);

            let Some(weight) = result.weight() else {
                continue;
            };
            let solution = DraftSolution {
                draft: state.position - keel,
                waterline: state.position,
                weight,
            };
            let error = (weight - target).abs() / target;
            if error <= self.config.draft_tolerance {
                return Ok(DraftOutcome::Converged {
                    solution,
                    iterations: state.iteration,
                });
            }
            if best.is_none_or(|(best_error, _)| error < best_error) {
                best = Some((error, solution));
            }
        }

        tracing::warn!(
            iterations = state.iteration,
            target,
            "draft search stopped before reaching tolerance"
        );
        Ok(DraftOutcome::Unconverged {
            best: best.map(|(_, solution)| solution),
            iterations: state.iteration,
        })
    }
}
