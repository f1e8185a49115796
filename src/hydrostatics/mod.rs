pub mod analysis;
pub mod area_curve;
pub mod displacement;
pub mod draft;
pub mod mass;
pub mod report;
pub mod section_max;

pub use analysis::{HydrostaticAnalysis, HydrostaticReport};
pub use area_curve::{measure_station, AreaCurve, AreaSample};
pub use displacement::{Displacement, DisplacementResult, SubmergedVolume};
pub use draft::{DraftOutcome, DraftSearch, DraftSolution};
pub use mass::{combine, WeightEstimate, WeightedPoint};
pub use report::{AreaCurveReport, DisplacementReport, DraftReport, SectionReport, WeightReport};
pub use section_max::{Bracket, SectionMax, SectionMaxResult};
