use std::collections::BTreeMap;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Partial parameter mapping produced by an extractor: field name → raw JSON value.
pub type ParamMap = BTreeMap<String, serde_json::Value>;

// --- Enums ---

/// Declares a closed set of wire strings with serde, `Display` and `FromStr` wired up.
///
/// `FromStr` fails with a human-readable constraint ("must be one of ...") so callers can
/// attach the field name themselves.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const WIRE_VALUES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!(
                        "must be one of [{}] (got \"{}\")",
                        $name::WIRE_VALUES.join(", "),
                        other
                    )),
                }
            }
        }
    };
}

wire_enum! {
    pub enum PrefetchPolicy {
        None => "none",
        NextLine => "next_line",
        Stride => "stride",
    }
}

wire_enum! {
    pub enum CoherenceProtocol {
        Msi => "msi",
        Mesi => "mesi",
        Moesi => "moesi",
    }
}

wire_enum! {
    /// Process technology node, finest last.
    pub enum TechnologyNode {
        Nm28 => "28nm",
        Nm14 => "14nm",
        Nm7 => "7nm",
        Nm3 => "3nm",
    }
}

wire_enum! {
    pub enum LithographySource {
        ArfImmersion => "arf_immersion",
        Euv => "euv",
    }
}

impl LithographySource {
    /// EUV is the advanced exposure option.
    pub fn is_advanced(&self) -> bool {
        matches!(self, LithographySource::Euv)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorKind {
    CpuArchitecture,
    SemiconductorFab,
}

impl SimulatorKind {
    pub const ALL: [SimulatorKind; 2] =
        [SimulatorKind::CpuArchitecture, SimulatorKind::SemiconductorFab];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimulatorKind::CpuArchitecture => "cpu_architecture",
            SimulatorKind::SemiconductorFab => "semiconductor_fab",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SimulatorKind::CpuArchitecture => "CPU Architecture & Cache Simulator",
            SimulatorKind::SemiconductorFab => "Advanced Semiconductor Fab & Yield Simulator",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SimulatorKind::CpuArchitecture => {
                "Core pipeline, cache hierarchy, coherence and energy metrics"
            }
            SimulatorKind::SemiconductorFab => {
                "Yield, binning, equipment effectiveness and mask economics"
            }
        }
    }

    pub fn descriptor(&self) -> SimulatorDescriptor {
        SimulatorDescriptor {
            kind: *self,
            name: self.display_name(),
            description: self.description(),
        }
    }
}

impl std::fmt::Display for SimulatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulatorKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu_architecture" => Ok(SimulatorKind::CpuArchitecture),
            "semiconductor_fab" => Ok(SimulatorKind::SemiconductorFab),
            other => Err(SimError::UnknownSimulatorKind(other.to_string())),
        }
    }
}

/// Listing entry for a supported simulator.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatorDescriptor {
    #[serde(rename = "type")]
    pub kind: SimulatorKind,
    pub name: &'static str,
    pub description: &'static str,
}

// --- CPU Architecture & Cache ---

fn default_block_size() -> u32 {
    64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CacheConfig {
    /// Capacity label, e.g. "32KB" or "8MB".
    pub size: String,
    /// Number of ways.
    pub associativity: u32,
    /// Line size in bytes.
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    /// Hit latency in cycles.
    pub latency: u32,
    /// "split" for L1, "unified" for L2; unset for L3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CpuArchitectureInput {
    // Core
    /// GHz, 0.1..=10.0
    pub clock_frequency: f64,
    pub number_of_cores: u32,
    pub pipeline_depth: u32,
    pub issue_width: u32,
    pub rob_size: u32,
    /// Percent, 90.0..=99.9
    pub branch_prediction_accuracy: f64,

    // Memory hierarchy
    pub l1_cache_config: CacheConfig,
    pub l2_cache_config: CacheConfig,
    #[serde(default)]
    pub l3_cache_config: Option<CacheConfig>,
    /// Cycles, 50..=500
    pub main_memory_latency: u32,
    pub prefetcher_type: PrefetchPolicy,

    // Interconnect
    pub coherence_protocol: CoherenceProtocol,
    /// GB/s, 1.0..=1000.0
    pub bus_bandwidth: f64,

    // Workload. Accepted and echoed, never read by the calculator.
    #[serde(default)]
    pub trace_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CpuArchitectureOutput {
    pub ipc: f64,
    /// Seconds
    pub total_execution_time: f64,
    pub stall_rate: f64,
    pub l1_hit_rate: f64,
    pub l2_hit_rate: f64,
    pub l3_hit_rate: Option<f64>,
    /// Cycles
    pub amat: f64,
    pub mpi: f64,
    pub coherence_misses: u64,
    pub bus_congestion: f64,
    /// Joules
    pub total_energy: f64,
    pub edp: f64,
}

// --- Semiconductor Fab & Yield ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SemiconductorFabInput {
    pub technology_node: TechnologyNode,
    pub lithography_source: LithographySource,
    pub mask_layer_count: u32,
    pub cpk_target: f64,
    /// Percent
    pub cd_uniformity: f64,
    /// nm
    pub overlay_accuracy: f64,
    /// Wafers per hour
    pub throughput_wph: u32,
    /// Hours
    pub mtbf: f64,
    /// Hours
    pub mttr: f64,
    pub defect_clustering_factor: f64,
    /// Percent
    pub killer_defect_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BinningDistribution {
    pub grade_a: f64,
    pub grade_b: f64,
    pub grade_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SemiconductorFabOutput {
    pub parametric_yield: f64,
    pub functional_yield: f64,
    pub binning_distribution: BinningDistribution,
    pub oee: f64,
    pub wip_level: u64,
    pub bottleneck_station_id: Option<String>,
    pub mask_amortization_cost: f64,
    pub line_balance_efficiency: f64,
}

// --- Pipeline records ---

/// A fully populated, validated input for one simulator family.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationInput {
    Cpu(CpuArchitectureInput),
    Fab(SemiconductorFabInput),
}

impl SimulationInput {
    pub fn kind(&self) -> SimulatorKind {
        match self {
            SimulationInput::Cpu(_) => SimulatorKind::CpuArchitecture,
            SimulationInput::Fab(_) => SimulatorKind::SemiconductorFab,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            SimulationInput::Cpu(input) => input.validate(),
            SimulationInput::Fab(input) => input.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutput {
    Cpu(CpuArchitectureOutput),
    Fab(SemiconductorFabOutput),
}

impl SimulationOutput {
    pub fn kind(&self) -> SimulatorKind {
        match self {
            SimulationOutput::Cpu(_) => SimulatorKind::CpuArchitecture,
            SimulationOutput::Fab(_) => SimulatorKind::SemiconductorFab,
        }
    }
}

// --- Request / Response ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Wire name of the simulator; parsed into [`SimulatorKind`] by the pipeline so an
    /// unsupported name surfaces as `UnknownSimulatorKind` rather than a decode error.
    pub simulator_type: String,
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub cpu_input: Option<CpuArchitectureInput>,
    #[serde(default)]
    pub fab_input: Option<SemiconductorFabInput>,
}

impl SimulationRequest {
    pub fn new(kind: SimulatorKind, user_message: impl Into<String>) -> Self {
        Self {
            simulator_type: kind.as_str().to_string(),
            user_message: user_message.into(),
            cpu_input: None,
            fab_input: None,
        }
    }

    pub fn with_cpu_input(mut self, input: CpuArchitectureInput) -> Self {
        self.cpu_input = Some(input);
        self
    }

    pub fn with_fab_input(mut self, input: SemiconductorFabInput) -> Self {
        self.fab_input = Some(input);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub simulator_type: SimulatorKind,
    pub message: String,
    pub cpu_output: Option<CpuArchitectureOutput>,
    pub fab_output: Option<SemiconductorFabOutput>,
    #[serde(default)]
    pub extracted_params: ParamMap,
}
