use crate::error::ConfigError;

/// Cubic centimetres per litre. Model lengths are in centimetres.
pub const CM3_PER_LITRE: f64 = 1000.0;

/// Smallest station count offered to the user for the area curve.
pub const MIN_STATION_COUNT: usize = 5;

/// Largest station count offered to the user for the area curve.
pub const MAX_STATION_COUNT: usize = 30;

/// Constants and defaults consumed by the hydrostatic procedures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydroConfig {
    /// Water density in kg per litre.
    pub water_density: f64,
    /// Relative tolerance on displaced weight for the draft search.
    pub draft_tolerance: f64,
    /// Iteration cap for the draft search.
    pub draft_max_iterations: usize,
    /// Initial draft search step as a fraction of hull height.
    pub initial_step_fraction: f64,
    /// Number of intervals sampled along the hull for the area curve.
    pub station_count: usize,
    /// Target bracket span for the maximum section, relative to hull length.
    pub section_precision: f64,
    /// Iteration cap for the maximum section refinement.
    pub section_max_iterations: usize,
    /// Gap tolerance when stitching the waterplane cap onto the hull, in cm.
    pub stitch_tolerance: f64,
}

impl Default for HydroConfig {
    fn default() -> Self {
        Self {
            water_density: 1.025,
            draft_tolerance: 0.01,
            draft_max_iterations: 10,
            initial_step_fraction: 0.10,
            station_count: 10,
            section_precision: 0.001,
            section_max_iterations: 100,
            stitch_tolerance: 0.1,
        }
    }
}

impl HydroConfig {
    /// Sets the water density (kg/L).
    #[must_use]
    pub fn with_water_density(mut self, density: f64) -> Self {
        self.water_density = density;
        self
    }

    /// Sets the draft search tolerance and iteration cap.
    #[must_use]
    pub fn with_draft_search(mut self, tolerance: f64, max_iterations: usize) -> Self {
        self.draft_tolerance = tolerance;
        self.draft_max_iterations = max_iterations;
        self
    }

    /// Sets the number of area curve intervals.
    #[must_use]
    pub fn with_station_count(mut self, count: usize) -> Self {
        self.station_count = count;
        self
    }

    /// Sets the maximum section precision and iteration cap.
    #[must_use]
    pub fn with_section_search(mut self, precision: f64, max_iterations: usize) -> Self {
        self.section_precision = precision;
        self.section_max_iterations = max_iterations;
        self
    }

    /// Converts a volume in cubic centimetres to a displaced weight in kilograms.
    #[must_use]
    pub fn weight_of(&self, volume_cm3: f64) -> f64 {
        volume_cm3 / CM3_PER_LITRE * self.water_density
    }

    /// Checks every parameter against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first offending parameter.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_open("water_density", self.water_density, 0.0, f64::INFINITY)?;
        check_open("draft_tolerance", self.draft_tolerance, 0.0, 1.0)?;
        check_open("initial_step_fraction", self.initial_step_fraction, 0.0, 1.0)?;
        check_open("section_precision", self.section_precision, 0.0, 1.0)?;
        check_open("stitch_tolerance", self.stitch_tolerance, 0.0, f64::INFINITY)?;
        if self.draft_max_iterations == 0 {
            return Err(ConfigError::OutOfRange {
                parameter: "draft_max_iterations",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        if self.section_max_iterations == 0 {
            return Err(ConfigError::OutOfRange {
                parameter: "section_max_iterations",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        if !(MIN_STATION_COUNT..=MAX_STATION_COUNT).contains(&self.station_count) {
            return Err(ConfigError::OutOfRange {
                parameter: "station_count",
                value: self.station_count as f64,
                min: MIN_STATION_COUNT as f64,
                max: MAX_STATION_COUNT as f64,
            });
        }
        Ok(())
    }
}

fn check_open(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value > min && value < max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            parameter,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(HydroConfig::default().validate().is_ok());
    }

    #[test]
    fn weight_of_one_cubic_metre() {
        let config = HydroConfig::default().with_water_density(1.0);
        assert!((config.weight_of(1_000_000.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn station_count_outside_user_range() {
        for count in [4, 31] {
            let err = HydroConfig::default()
                .with_station_count(count)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::OutOfRange {
                    parameter: "station_count",
                    ..
                }
            ));
        }
    }

    #[test]
    fn rejects_non_positive_density_and_bad_tolerance() {
        assert!(HydroConfig::default()
            .with_water_density(0.0)
            .validate()
            .is_err());
        assert!(HydroConfig::default()
            .with_draft_search(1.5, 10)
            .validate()
            .is_err());
        assert!(HydroConfig::default()
            .with_draft_search(0.01, 0)
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(HydroConfig::default()
            .with_section_search(f64::NAN, 100)
            .validate()
            .is_err());
    }
}
