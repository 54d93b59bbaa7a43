use hwsim_common::{CpuArchitectureInput, CpuArchitectureOutput, SimError};

use super::ensure_metric;

const IPC_PER_ISSUE_SLOT: f64 = 0.8;
const IPC_FLOOR: f64 = 0.1;

const L1_BASE_HIT_RATE: f64 = 95.0;
const L1_HIT_PENALTY_PER_CYCLE: f64 = 2.0;
const L1_HIT_FLOOR: f64 = 80.0;
const L2_BASE_HIT_RATE: f64 = 85.0;
const L2_HIT_PENALTY_PER_CYCLE: f64 = 1.0;
const L2_HIT_FLOOR: f64 = 70.0;
const L3_HIT_RATE: f64 = 70.0;

const COHERENCE_MISSES_PER_CORE: u64 = 10;
const BUS_CONGESTION_PER_CORE: f64 = 5.0;
const BUS_CONGESTION_CEILING: f64 = 50.0;

const ENERGY_PER_GHZ_CORE: f64 = 10.0;
const EDP_DELAY_FACTOR: f64 = 1000.0;
const WORKLOAD_SCALE: f64 = 1000.0;

pub fn compute_cpu(input: &CpuArchitectureInput) -> Result<CpuArchitectureOutput, SimError> {
    let l1_latency = f64::from(input.l1_cache_config.latency);
    let l2_latency = f64::from(input.l2_cache_config.latency);
    let cores = f64::from(input.number_of_cores);

    let base_ipc = f64::from(input.issue_width.min(input.number_of_cores)) * IPC_PER_ISSUE_SLOT;
    let cache_penalty = (100.0 - l1_latency) / 100.0;
    let ipc = (base_ipc * cache_penalty).max(IPC_FLOOR);

    // Raw rates drive AMAT and MPI; only the reported rates are floored.
    let l1_hit = L1_BASE_HIT_RATE - l1_latency * L1_HIT_PENALTY_PER_CYCLE;
    let l2_hit = L2_BASE_HIT_RATE - l2_latency * L2_HIT_PENALTY_PER_CYCLE;
    let l3 = input
        .l3_cache_config
        .as_ref()
        .map(|cache| (f64::from(cache.latency), L3_HIT_RATE));

    let mut amat = l1_latency * (l1_hit / 100.0)
        + l2_latency * ((100.0 - l1_hit) / 100.0) * (l2_hit / 100.0);
    if let Some((l3_latency, l3_hit)) = l3 {
        amat += l3_latency * ((100.0 - l2_hit) / 100.0) * (l3_hit / 100.0);
    }
    let last_level_hit = l3.map_or(l2_hit, |(_, hit)| hit);
    amat += f64::from(input.main_memory_latency) * ((100.0 - last_level_hit) / 100.0);

    let total_energy = input.clock_frequency * cores * ENERGY_PER_GHZ_CORE;

    Ok(CpuArchitectureOutput {
        ipc: ensure_metric("ipc", ipc)?,
        total_execution_time: ensure_metric(
            "total_execution_time",
            WORKLOAD_SCALE / (input.clock_frequency * ipc),
        )?,
        stall_rate: ensure_metric(
            "stall_rate",
            100.0 - ipc / f64::from(input.issue_width) * 100.0,
        )?,
        l1_hit_rate: l1_hit.max(L1_HIT_FLOOR),
        l2_hit_rate: l2_hit.max(L2_HIT_FLOOR),
        l3_hit_rate: l3.map(|(_, hit)| hit),
        amat: ensure_metric("amat", amat)?,
        mpi: ensure_metric("mpi", (100.0 - l1_hit) / 10.0)?,
        coherence_misses: u64::from(input.number_of_cores) * COHERENCE_MISSES_PER_CORE,
        bus_congestion: (cores * BUS_CONGESTION_PER_CORE).min(BUS_CONGESTION_CEILING),
        total_energy: ensure_metric("total_energy", total_energy)?,
        edp: ensure_metric("edp", total_energy * EDP_DELAY_FACTOR)?,
    })
}
