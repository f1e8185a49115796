pub mod config;
pub mod error;
pub mod hydrostatics;
pub mod kernel;
pub mod math;
pub mod provider;

pub use config::HydroConfig;
pub use error::{HydrolisError, Result};
