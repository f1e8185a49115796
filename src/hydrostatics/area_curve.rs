use crate::error::{GeometryError, HydrolisError, Result};
use crate::provider::{Aabb, Axis, BodyId, GeometryProvider, Scratch, SectionShape};

/// Cross-sectional area measured at one longitudinal station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSample {
    /// Longitudinal position in cm.
    pub station: f64,
    /// Area in cm², zero where the cut produced no usable profile.
    pub area: f64,
}

impl AreaSample {
    /// Creates a sample from a station and its area.
    #[must_use]
    pub fn new(station: f64, area: f64) -> Self {
        Self { station, area }
    }
}

/// Measures the transverse section area of `body` at `station`.
///
/// A cut that misses the body reads zero. A cut whose curves cannot be
/// closed, even by capping the raw curves, also reads zero and is logged;
/// such stations under-report the true area.
///
/// # Errors
///
/// Returns a provider error if the body or a created entity cannot be
/// resolved. Capping failures are not errors.
pub fn measure_station<P: GeometryProvider + ?Sized>(
    provider: &mut P,
    body: BodyId,
    station: f64,
) -> Result<f64> {
    let mut scratch = Scratch::new(provider);
    let plane = scratch.add_plane(Axis::X, station)?;
    scratch.track(plane);
    let section = scratch.cross_section(body, plane)?;
    scratch.track(section.sketch);

    let area = match section.shape {
        SectionShape::Empty => 0.0,
        SectionShape::OpenCurves => match scratch.cap_curves(section.sketch) {
            Ok(patch) => {
                scratch.track(patch);
                scratch.area(patch)?
            }
            Err(HydrolisError::Geometry(GeometryError::CapFailed(reason))) => {
                tracing::warn!(station, %reason, "degenerate section recorded as zero area");
                0.0
            }
            Err(err) => return Err(err),
        },
        SectionShape::Closed { profiles } => (0..profiles)
            .map(|profile| scratch.profile_area(section.sketch, profile))
            .sum::<Result<f64>>()?,
    };
    Ok(area.max(0.0))
}

/// Curve of transverse section areas along a submerged volume.
///
/// Samples `station_count + 1` evenly spaced stations from the volume's
/// forward to aft bound, both ends included.
pub struct AreaCurve {
    volume: BodyId,
    station_count: usize,
}

impl AreaCurve {
    /// Creates a new `AreaCurve` over `station_count` intervals.
    #[must_use]
    pub fn new(volume: BodyId, station_count: usize) -> Self {
        Self {
            volume,
            station_count,
        }
    }

    /// Stations sampled over the given bounds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stations(&self, bounds: &Aabb) -> Vec<f64> {
        let start = bounds.min.x;
        let end = bounds.max.x;
        let n = self.station_count;
        (0..=n)
            .map(|i| {
                if i == n {
                    end
                } else {
                    start + (end - start) * i as f64 / n as f64
                }
            })
            .collect()
    }

    /// Executes the sampling.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two intervals were requested or if a
    /// station measurement fails at the provider boundary.
    pub fn execute<P: GeometryProvider + ?Sized>(&self, provider: &mut P) -> Result<Vec<AreaSample>> {
        if self.station_count < 2 {
            return Err(GeometryError::InvalidInput(format!(
                "area curve needs at least 2 intervals, got {}",
                self.station_count
            ))
            .into());
        }
        let bounds = provider.bounding_box(self.volume)?;
        let samples = self
            .stations(&bounds)
            .into_iter()
            .map(|station| {
                let area = measure_station(&mut *provider, self.volume, station)?;
                tracing::debug!(station, area, "area curve sample");
                Ok(AreaSample::new(station, area))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(samples)
    }
}
