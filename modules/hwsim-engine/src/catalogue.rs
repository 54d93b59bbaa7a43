//! The flat parameter keys each simulator understands.
//!
//! Extractors emit these keys, the resolver reads them, and the model-backed extractor
//! turns the table into its prompt and tool schema.

use hwsim_common::{
    CoherenceProtocol, LithographySource, PrefetchPolicy, SimulatorKind, TechnologyNode,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamType {
    Float,
    Integer,
    /// Free-form string such as a cache size label or a file name.
    Label,
    /// One of a closed set of wire strings.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct ParamDef {
    pub name: &'static str,
    pub ty: ParamType,
    pub description: &'static str,
}

const fn param(name: &'static str, ty: ParamType, description: &'static str) -> ParamDef {
    ParamDef {
        name,
        ty,
        description,
    }
}

use ParamType::*;

pub const CPU_PARAMS: &[ParamDef] = &[
    param("clock_frequency", Float, "Clock frequency in GHz (0.1-10.0)"),
    param("number_of_cores", Integer, "Core count (1, 2, 4, 8, 16...)"),
    param("pipeline_depth", Integer, "Pipeline depth in stages (5-20)"),
    param("issue_width", Integer, "Issue width (1 = scalar up to 8 = wide superscalar)"),
    param("rob_size", Integer, "Re-order buffer entries (32-512)"),
    param("branch_prediction_accuracy", Float, "Branch prediction accuracy in percent (90.0-99.9)"),
    param("l1_size", Label, "L1 size per core, e.g. \"32KB\""),
    param("l1_associativity", Integer, "L1 ways, e.g. 4 or 8"),
    param("l1_block_size", Integer, "L1 line size in bytes (64 standard)"),
    param("l1_latency", Integer, "L1 hit latency in cycles (1-3 typical)"),
    param("l2_size", Label, "L2 size, e.g. \"256KB\" to \"1MB\""),
    param("l2_associativity", Integer, "L2 ways, e.g. 8 or 16"),
    param("l2_block_size", Integer, "L2 line size in bytes"),
    param("l2_latency", Integer, "L2 hit latency in cycles (10-15 typical)"),
    param("l3_size", Label, "L3 size, e.g. \"8MB\" to \"64MB\"; omit when there is no L3"),
    param("l3_associativity", Integer, "L3 ways"),
    param("l3_block_size", Integer, "L3 line size in bytes"),
    param("l3_latency", Integer, "L3 hit latency in cycles (30-50 typical)"),
    param("main_memory_latency", Integer, "DRAM latency in cycles (50-500)"),
    param("prefetcher_type", Choice(PrefetchPolicy::WIRE_VALUES), "Prefetch algorithm"),
    param("coherence_protocol", Choice(CoherenceProtocol::WIRE_VALUES), "Cache coherence protocol"),
    param("bus_bandwidth", Float, "Bus bandwidth in GB/s (1.0-1000.0)"),
    param("trace_file", Label, "Memory access trace file name"),
];

pub const FAB_PARAMS: &[ParamDef] = &[
    param("technology_node", Choice(TechnologyNode::WIRE_VALUES), "Process technology node"),
    param("lithography_source", Choice(LithographySource::WIRE_VALUES), "Exposure light source"),
    param("mask_layer_count", Integer, "Number of mask layers (30-100)"),
    param("cpk_target", Float, "Process capability index target (1.0, 1.33, 1.67, 2.0)"),
    param("cd_uniformity", Float, "Critical dimension uniformity in percent (80.0-100.0)"),
    param("overlay_accuracy", Float, "Overlay alignment error in nm (0.1-10.0)"),
    param("throughput_wph", Integer, "Throughput in wafers per hour (1-1000)"),
    param("mtbf", Float, "Mean time between failures in hours (100-10000)"),
    param("mttr", Float, "Mean time to repair in hours (0.1-100)"),
    param("defect_clustering_factor", Float, "Defect clustering factor alpha (0.0-5.0)"),
    param("killer_defect_ratio", Float, "Killer defect ratio in percent (0.0-100.0)"),
];

pub fn params_for(kind: SimulatorKind) -> &'static [ParamDef] {
    match kind {
        SimulatorKind::CpuArchitecture => CPU_PARAMS,
        SimulatorKind::SemiconductorFab => FAB_PARAMS,
    }
}

pub fn lookup(kind: SimulatorKind, name: &str) -> Option<&'static ParamDef> {
    params_for(kind).iter().find(|p| p.name == name)
}

/// JSON Schema object whose properties are the kind's keys, none required.
pub fn json_schema(kind: SimulatorKind) -> serde_json::Value {
    let properties: serde_json::Map<String, serde_json::Value> = params_for(kind)
        .iter()
        .map(|p| {
            let mut prop = match p.ty {
                Float => serde_json::json!({ "type": "number" }),
                Integer => serde_json::json!({ "type": "integer" }),
                Label => serde_json::json!({ "type": "string" }),
                Choice(values) => serde_json::json!({ "type": "string", "enum": values }),
            };
            prop["description"] = serde_json::Value::from(p.description);
            (p.name.to_string(), prop)
        })
        .collect();

    serde_json::json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_per_kind() {
        for kind in SimulatorKind::ALL {
            let params = params_for(kind);
            for (i, p) in params.iter().enumerate() {
                assert!(
                    params[i + 1..].iter().all(|q| q.name != p.name),
                    "duplicate key {}",
                    p.name
                );
            }
        }
    }

    #[test]
    fn schema_lists_enum_choices() {
        let schema = json_schema(SimulatorKind::SemiconductorFab);
        assert_eq!(
            schema["properties"]["technology_node"]["enum"],
            serde_json::json!(["28nm", "14nm", "7nm", "3nm"])
        );
        assert_eq!(schema["properties"]["mtbf"]["type"], "number");
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn lookup_is_scoped_to_kind() {
        assert!(lookup(SimulatorKind::CpuArchitecture, "clock_frequency").is_some());
        assert!(lookup(SimulatorKind::SemiconductorFab, "clock_frequency").is_none());
    }
}
