pub mod runner;
pub mod scheduler;
pub mod summary;

pub use runner::{
    run_simulation, run_simulation_parallel, SimulationError, SimulationResult,
};
pub use scheduler::{burst_active_at, simulate_once, RotationOutcome};
pub use summary::{histogram, mean, quantile, sample_std, Histogram};
