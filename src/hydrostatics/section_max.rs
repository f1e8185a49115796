use crate::config::HydroConfig;
use crate::error::{HydrostaticError, Result};
use crate::math::TOLERANCE;
use crate::provider::{Axis, BodyId, GeometryProvider};

use super::area_curve::{measure_station, AreaSample};

/// Three ordered samples with the largest area in the middle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lo: AreaSample,
    pub peak: AreaSample,
    pub hi: AreaSample,
}

impl Bracket {
    /// Creates a bracket, checking station order and that `peak` is at
    /// least as large as both ends.
    ///
    /// # Errors
    ///
    /// Returns [`HydrostaticError::InvalidBracket`] if the samples are out
    /// of order, not finite, or the middle sample is not a peak.
    pub fn new(lo: AreaSample, peak: AreaSample, hi: AreaSample) -> Result<Self> {
        let finite = [lo, peak, hi]
            .iter()
            .all(|s| s.station.is_finite() && s.area.is_finite());
        if !finite {
            return Err(HydrostaticError::InvalidBracket("non-finite sample".into()).into());
        }
        if lo.station > peak.station || peak.station > hi.station {
            return Err(HydrostaticError::InvalidBracket(format!(
                "stations {} / {} / {} are not ordered",
                lo.station, peak.station, hi.station
            ))
            .into());
        }
        if peak.area < lo.area || peak.area < hi.area {
            return Err(HydrostaticError::InvalidBracket(format!(
                "middle area {} is below an end ({} / {})",
                peak.area, lo.area, hi.area
            ))
            .into());
        }
        Ok(Self { lo, peak, hi })
    }

    /// Brackets the largest interior local peak of a coarse area curve.
    ///
    /// Among several bulges the widest one wins; ties keep the forward-most.
    /// When no interior peak reaches the largest sample (flat or monotonic
    /// curves, or a maximum at an end) the bracket is centred on the first
    /// largest sample, clamped at the curve ends.
    ///
    /// # Errors
    ///
    /// Returns [`HydrostaticError::InvalidBracket`] for an empty curve.
    pub fn from_curve(samples: &[AreaSample]) -> Result<Self> {
        let Some(first) = samples.first() else {
            return Err(HydrostaticError::InvalidBracket("empty area curve".into()).into());
        };

        let mut k = 0;
        let mut largest = first.area;
        for (i, sample) in samples.iter().enumerate().skip(1) {
            if sample.area > largest {
                largest = sample.area;
                k = i;
            }
        }

        let widest_peak = samples
            .windows(3)
            .filter(|w| w[1].area > w[0].area && w[1].area > w[2].area)
            .fold(None::<&[AreaSample]>, |best, w| match best {
                Some(b) if b[1].area >= w[1].area => Some(b),
                _ => Some(w),
            });
        if let Some(w) = widest_peak.filter(|w| w[1].area >= largest) {
            return Ok(Self {
                lo: w[0],
                peak: w[1],
                hi: w[2],
            });
        }

        let last = samples.len() - 1;
        Ok(Self {
            lo: samples[k.saturating_sub(1)],
            peak: samples[k],
            hi: samples[(k + 1).min(last)],
        })
    }

    /// Distance between the two ends.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.hi.station - self.lo.station
    }

    /// Re-centres on the largest interior sample of a five-sample window
    /// `[lo, lo_mid, peak, hi_mid, hi]`. Ties keep the current peak, so a
    /// flat window still narrows to its middle half.
    fn recentre(window: &[AreaSample; 5]) -> Self {
        let mut best = 2;
        for i in [1, 3] {
            if window[i].area > window[best].area {
                best = i;
            }
        }
        Self {
            lo: window[best - 1],
            peak: window[best],
            hi: window[best + 1],
        }
    }
}

/// Refined position and area of the largest transverse section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionMaxResult {
    pub sample: AreaSample,
    pub iterations: usize,
    /// `false` if the iteration cap was hit before the bracket narrowed to
    /// the requested precision.
    pub converged: bool,
}

/// Narrows a bracket around the largest transverse section of a volume.
///
/// Each round measures the midpoints on either side of the peak and keeps
/// the largest of the three interior samples with its two neighbours,
/// halving the bracket.
pub struct SectionMax {
    volume: BodyId,
    bracket: Bracket,
    precision: f64,
    max_iterations: usize,
}

impl SectionMax {
    /// Creates a new `SectionMax` refinement with default precision.
    #[must_use]
    pub fn new(volume: BodyId, bracket: Bracket) -> Self {
        let config = HydroConfig::default();
        Self {
            volume,
            bracket,
            precision: config.section_precision,
            max_iterations: config.section_max_iterations,
        }
    }

    /// Takes precision and iteration cap from `config`.
    #[must_use]
    pub fn with_config(mut self, config: HydroConfig) -> Self {
        self.precision = config.section_precision;
        self.max_iterations = config.section_max_iterations;
        self
    }

    /// Sets the target bracket span relative to the volume's length.
    #[must_use]
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the maximum number of refinement rounds.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Executes the refinement.
    ///
    /// # Errors
    ///
    /// Returns a provider error if a midpoint measurement fails.
    pub fn execute<P: GeometryProvider + ?Sized>(
        &self,
        provider: &mut P,
    ) -> Result<SectionMaxResult> {
        let length = provider.bounding_box(self.volume)?.extent(Axis::X);
        let target_span = self.precision * length;
        let mut bracket = self.bracket;
        let mut iterations = 0;

        while bracket.span() > target_span && iterations < self.max_iterations {
            iterations += 1;
            let lo_mid = self.midpoint(provider, &bracket.lo, &bracket.peak)?;
            let hi_mid = self.midpoint(provider, &bracket.peak, &bracket.hi)?;
            bracket = Bracket::recentre(&[bracket.lo, lo_mid, bracket.peak, hi_mid, bracket.hi]);
            tracing::debug!(
                iteration = iterations,
                station = bracket.peak.station,
                area = bracket.peak.area,
                span = bracket.span(),
                "section refinement round"
            );
        }

        let converged = bracket.span() <= target_span;
        if !converged {
            tracing::warn!(
                iterations,
                span = bracket.span(),
                target_span,
                "maximum section refinement hit its iteration cap"
            );
        }
        Ok(SectionMaxResult {
            sample: bracket.peak,
            iterations,
            converged,
        })
    }

    fn midpoint<P: GeometryProvider + ?Sized>(
        &self,
        provider: &mut P,
        a: &AreaSample,
        b: &AreaSample,
    ) -> Result<AreaSample> {
        if (b.station - a.station).abs() < TOLERANCE {
            return Ok(*a);
        }
        let station = (a.station + b.station) * 0.5;
        let area = measure_station(provider, self.volume, station)?;
        Ok(AreaSample::new(station, area))
    }
}
