//! Markdown reports for simulation results.

use hwsim_common::{CpuArchitectureOutput, SemiconductorFabOutput, SimulationOutput, SimulatorKind};

pub const UNKNOWN_SIMULATOR_MESSAGE: &str = "Unknown simulator type.";

const NOT_CONFIGURED: &str = "not configured";
const NO_BOTTLENECK: &str = "none";

/// Render `output` as the report for `kind`.
///
/// A kind that does not match the output family gets [`UNKNOWN_SIMULATOR_MESSAGE`].
pub fn render(kind: SimulatorKind, output: &SimulationOutput) -> String {
    match (kind, output) {
        (SimulatorKind::CpuArchitecture, SimulationOutput::Cpu(out)) => render_cpu(out),
        (SimulatorKind::SemiconductorFab, SimulationOutput::Fab(out)) => render_fab(out),
        _ => UNKNOWN_SIMULATOR_MESSAGE.to_string(),
    }
}

pub fn render_cpu(out: &CpuArchitectureOutput) -> String {
    let l3 = out
        .l3_hit_rate
        .map_or_else(|| NOT_CONFIGURED.to_string(), |rate| format!("{rate:.2}%"));

    format!(
        r#"## CPU Architecture Simulation Results

### Performance
- **IPC (Instructions Per Cycle)**: {ipc:.2}
- **Total Execution Time**: {time:.2} s
- **Stall Rate**: {stall:.2}%

### Memory Analysis
- **L1 Hit Rate**: {l1:.2}%
- **L2 Hit Rate**: {l2:.2}%
- **L3 Hit Rate**: {l3}
- **Average Memory Access Time (AMAT)**: {amat:.2} cycles
- **Misses Per Kilo-Instruction (MPI)**: {mpi:.2}

### Multicore & Traffic
- **Coherence Misses**: {misses}
- **Bus Congestion**: {bus:.2}%

### Energy
- **Total Energy**: {energy:.2} J
- **Energy-Delay Product (EDP)**: {edp:.2}"#,
        ipc = out.ipc,
        time = out.total_execution_time,
        stall = out.stall_rate,
        l1 = out.l1_hit_rate,
        l2 = out.l2_hit_rate,
        amat = out.amat,
        mpi = out.mpi,
        misses = out.coherence_misses,
        bus = out.bus_congestion,
        energy = out.total_energy,
        edp = out.edp,
    )
}

pub fn render_fab(out: &SemiconductorFabOutput) -> String {
    let bins = &out.binning_distribution;
    let bottleneck = out.bottleneck_station_id.as_deref().unwrap_or(NO_BOTTLENECK);

    format!(
        r#"## Semiconductor Fab Simulation Results

### Yield Analysis
- **Parametric Yield**: {parametric:.2}%
- **Functional Yield**: {functional:.2}%
- **Binning Distribution**:
  - Grade A (top): {grade_a:.2}%
  - Grade B (mid): {grade_b:.2}%
  - Grade C (low): {grade_c:.2}%

### Operational Efficiency
- **OEE (Overall Equipment Effectiveness)**: {oee:.2}%
- **Work-in-Process (WIP)**: {wip} wafers
- **Bottleneck Station**: {bottleneck}

### Economics & Strategy
- **Mask Amortization Cost**: {mask:.2}
- **Line Balance Efficiency**: {balance:.2}%"#,
        parametric = out.parametric_yield,
        functional = out.functional_yield,
        grade_a = bins.grade_a,
        grade_b = bins.grade_b,
        grade_c = bins.grade_c,
        oee = out.oee,
        wip = out.wip_level,
        mask = out.mask_amortization_cost,
        balance = out.line_balance_efficiency,
    )
}
