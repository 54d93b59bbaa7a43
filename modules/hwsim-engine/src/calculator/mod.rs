//! Closed-form metrics for each simulator family.
//!
//! Inputs are assumed validated. Floors and ceilings are presentation clamps applied after the
//! raw formula. Any reported metric that still comes out non-finite or negative is an
//! internal computation error rather than something to coerce.

mod cpu;
mod fab;

pub use cpu::compute_cpu;
pub use fab::compute_fab;

use hwsim_common::{SimError, SimulationInput, SimulationOutput};

pub fn compute(input: &SimulationInput) -> Result<SimulationOutput, SimError> {
    match input {
        SimulationInput::Cpu(input) => compute_cpu(input).map(SimulationOutput::Cpu),
        SimulationInput::Fab(input) => compute_fab(input).map(SimulationOutput::Fab),
    }
}

fn ensure_metric(name: &str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::Computation(format!("{name} evaluated to {value}")))
    }
}
