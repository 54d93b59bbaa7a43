//! Baseline parameter values used when a request does not supply a field.

use crate::types::{
    CacheConfig, CoherenceProtocol, CpuArchitectureInput, LithographySource, PrefetchPolicy,
    SemiconductorFabInput, TechnologyNode,
};

mod cpu {
    pub const CLOCK_FREQUENCY_GHZ: f64 = 3.2;
    pub const NUMBER_OF_CORES: u32 = 4;
    pub const PIPELINE_DEPTH: u32 = 10;
    pub const ISSUE_WIDTH: u32 = 4;
    pub const ROB_SIZE: u32 = 128;
    pub const BRANCH_PREDICTION_ACCURACY: f64 = 95.0;
    pub const MAIN_MEMORY_LATENCY: u32 = 200;
    pub const BUS_BANDWIDTH_GBPS: f64 = 50.0;
    pub const BLOCK_SIZE: u32 = 64;
}

mod fab {
    pub const MASK_LAYER_COUNT: u32 = 50;
    pub const CPK_TARGET: f64 = 1.67;
    pub const CD_UNIFORMITY: f64 = 95.0;
    pub const OVERLAY_ACCURACY_NM: f64 = 2.0;
    pub const THROUGHPUT_WPH: u32 = 100;
    pub const MTBF_HOURS: f64 = 1000.0;
    pub const MTTR_HOURS: f64 = 5.0;
    pub const DEFECT_CLUSTERING_FACTOR: f64 = 1.0;
    pub const KILLER_DEFECT_RATIO: f64 = 30.0;
}

fn cache(size: &str, associativity: u32, latency: u32, cache_type: Option<&str>) -> CacheConfig {
    CacheConfig {
        size: size.to_string(),
        associativity,
        block_size: cpu::BLOCK_SIZE,
        latency,
        cache_type: cache_type.map(str::to_string),
    }
}

/// Immutable set of fallback values, built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationDefaults {
    /// Complete CPU record with no L3 configured.
    pub cpu: CpuArchitectureInput,
    /// L3 used when a request names an L3 size but omits its other fields.
    pub l3: CacheConfig,
    pub fab: SemiconductorFabInput,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            cpu: CpuArchitectureInput {
                clock_frequency: cpu::CLOCK_FREQUENCY_GHZ,
                number_of_cores: cpu::NUMBER_OF_CORES,
                pipeline_depth: cpu::PIPELINE_DEPTH,
                issue_width: cpu::ISSUE_WIDTH,
                rob_size: cpu::ROB_SIZE,
                branch_prediction_accuracy: cpu::BRANCH_PREDICTION_ACCURACY,
                l1_cache_config: cache("32KB", 4, 2, Some("split")),
                l2_cache_config: cache("256KB", 8, 12, Some("unified")),
                l3_cache_config: None,
                main_memory_latency: cpu::MAIN_MEMORY_LATENCY,
                prefetcher_type: PrefetchPolicy::NextLine,
                coherence_protocol: CoherenceProtocol::Mesi,
                bus_bandwidth: cpu::BUS_BANDWIDTH_GBPS,
                trace_file: None,
            },
            l3: cache("8MB", 16, 40, None),
            fab: SemiconductorFabInput {
                technology_node: TechnologyNode::Nm7,
                lithography_source: LithographySource::ArfImmersion,
                mask_layer_count: fab::MASK_LAYER_COUNT,
                cpk_target: fab::CPK_TARGET,
                cd_uniformity: fab::CD_UNIFORMITY,
                overlay_accuracy: fab::OVERLAY_ACCURACY_NM,
                throughput_wph: fab::THROUGHPUT_WPH,
                mtbf: fab::MTBF_HOURS,
                mttr: fab::MTTR_HOURS,
                defect_clustering_factor: fab::DEFECT_CLUSTERING_FACTOR,
                killer_defect_ratio: fab::KILLER_DEFECT_RATIO,
            },
        }
    }
}
