//! Hydrostatics walkthrough on a box-shaped hull.
//!
//! ```text
//! cargo run --example hydrostatics
//! RUST_LOG=hydrolis=debug cargo run --example hydrostatics
//! ```

use hydrolis::hydrostatics::{
    Displacement, DisplacementReport, HydrostaticAnalysis, WeightEstimate, WeightReport,
};
use hydrolis::kernel::{Planform, Prism, PrismKernel};
use hydrolis::{HydroConfig, Result};

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for hydrolis.
    // Override with RUST_LOG env var (e.g. RUST_LOG=hydrolis=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("hydrolis=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut kernel = PrismKernel::new();
    let hull = kernel.add_shell(Prism::new(
        Planform::rectangle(0.0, 1000.0, 200.0),
        0.0,
        100.0,
    ));

    // Ballast and deck gear.
    let ballast = kernel.add_solid(
        Prism::new(Planform::rectangle(400.0, 600.0, 60.0), 0.0, 20.0).with_density(11.3),
    );
    let gear = kernel.add_solid(
        Prism::new(Planform::rectangle(100.0, 300.0, 150.0), 100.0, 130.0).with_density(0.6),
    );
    let weight = WeightEstimate::new([ballast, gear]).execute(&kernel)?;
    println!("{}", WeightReport(weight));

    let config = HydroConfig::default().with_station_count(20);
    let query = Displacement::at_draft(&kernel, hull, 25.0)?.with_config(config);
    println!(
        "{}",
        DisplacementReport {
            draft: 25.0,
            result: query.execute(&mut kernel)?,
        }
    );

    let report = HydrostaticAnalysis::new(hull, weight.mass)
        .with_config(config)
        .execute(&mut kernel)?;
    println!("{report}");
    Ok(())
}
