//! Merge an extractor's partial mapping with defaults into a complete, validated input.

use std::str::FromStr;

use serde_json::Value;

use hwsim_common::{
    CacheConfig, CpuArchitectureInput, ParamMap, SemiconductorFabInput, SimError,
    SimulationDefaults, SimulationInput, SimulatorKind,
};

/// Build the full input record for `kind`, taking each field from `params` when present and
/// from `defaults` otherwise, then validate it.
///
/// JSON `null` counts as absent. A present value of the wrong type, or a value outside the
/// field's range, is a `SimError::Validation` naming the field.
pub fn resolve(
    params: &ParamMap,
    kind: SimulatorKind,
    defaults: &SimulationDefaults,
) -> Result<SimulationInput, SimError> {
    let params = Params(params);
    let input = match kind {
        SimulatorKind::CpuArchitecture => SimulationInput::Cpu(resolve_cpu(&params, defaults)?),
        SimulatorKind::SemiconductorFab => SimulationInput::Fab(resolve_fab(&params, defaults)?),
    };
    input.validate()?;
    Ok(input)
}

fn resolve_cpu(params: &Params, defaults: &SimulationDefaults) -> Result<CpuArchitectureInput, SimError> {
    let d = &defaults.cpu;

    // L3 exists only when the request names a size for it.
    let l3_cache_config = match params.label("l3_size")? {
        Some(_) => Some(params.cache("l3", &defaults.l3)?),
        None => None,
    };

    Ok(CpuArchitectureInput {
        clock_frequency: params.float("clock_frequency", d.clock_frequency)?,
        number_of_cores: params.int("number_of_cores", d.number_of_cores)?,
        pipeline_depth: params.int("pipeline_depth", d.pipeline_depth)?,
        issue_width: params.int("issue_width", d.issue_width)?,
        rob_size: params.int("rob_size", d.rob_size)?,
        branch_prediction_accuracy: params
            .float("branch_prediction_accuracy", d.branch_prediction_accuracy)?,
        l1_cache_config: params.cache("l1", &d.l1_cache_config)?,
        l2_cache_config: params.cache("l2", &d.l2_cache_config)?,
        l3_cache_config,
        main_memory_latency: params.int("main_memory_latency", d.main_memory_latency)?,
        prefetcher_type: params.choice("prefetcher_type", d.prefetcher_type)?,
        coherence_protocol: params.choice("coherence_protocol", d.coherence_protocol)?,
        bus_bandwidth: params.float("bus_bandwidth", d.bus_bandwidth)?,
        trace_file: params.label("trace_file")?.or_else(|| d.trace_file.clone()),
    })
}

fn resolve_fab(params: &Params, defaults: &SimulationDefaults) -> Result<SemiconductorFabInput, SimError> {
    let d = &defaults.fab;
    Ok(SemiconductorFabInput {
        technology_node: params.choice("technology_node", d.technology_node)?,
        lithography_source: params.choice("lithography_source", d.lithography_source)?,
        mask_layer_count: params.int("mask_layer_count", d.mask_layer_count)?,
        cpk_target: params.float("cpk_target", d.cpk_target)?,
        cd_uniformity: params.float("cd_uniformity", d.cd_uniformity)?,
        overlay_accuracy: params.float("overlay_accuracy", d.overlay_accuracy)?,
        throughput_wph: params.int("throughput_wph", d.throughput_wph)?,
        mtbf: params.float("mtbf", d.mtbf)?,
        mttr: params.float("mttr", d.mttr)?,
        defect_clustering_factor: params
            .float("defect_clustering_factor", d.defect_clustering_factor)?,
        killer_defect_ratio: params.float("killer_defect_ratio", d.killer_defect_ratio)?,
    })
}

/// Typed, defaulting reads over a [`ParamMap`].
struct Params<'a>(&'a ParamMap);

impl Params<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    fn float(&self, key: &str, default: f64) -> Result<f64, SimError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_f64()
                .ok_or_else(|| type_error(key, "a number", value)),
        }
    }

    fn int(&self, key: &str, default: u32) -> Result<u32, SimError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        let as_int = match value.as_u64() {
            Some(n) => Some(n),
            // Accept integral floats such as 4.0.
            None => value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64),
        };
        as_int
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| type_error(key, "a non-negative integer", value))
    }

    /// String fields; an empty string counts as absent.
    fn label(&self, key: &str) -> Result<Option<String>, SimError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(other) => Err(type_error(key, "a string", other)),
        }
    }

    fn choice<T>(&self, key: &str, default: T) -> Result<T, SimError>
    where
        T: FromStr<Err = String>,
    {
        match self.get(key) {
            None => Ok(default),
            Some(Value::String(s)) => s
                .trim()
                .to_lowercase()
                .parse()
                .map_err(|constraint| SimError::validation(key, constraint)),
            Some(other) => Err(type_error(key, "a string", other)),
        }
    }

    /// `prefix` is `l1`, `l2` or `l3`.
    fn cache(&self, prefix: &str, default: &CacheConfig) -> Result<CacheConfig, SimError> {
        let key = |field: &str| format!("{prefix}_{field}");
        Ok(CacheConfig {
            size: self.label(&key("size"))?.unwrap_or_else(|| default.size.clone()),
            associativity: self.int(&key("associativity"), default.associativity)?,
            block_size: self.int(&key("block_size"), default.block_size)?,
            latency: self.int(&key("latency"), default.latency)?,
            cache_type: default.cache_type.clone(),
        })
    }
}

fn type_error(key: &str, expected: &str, got: &Value) -> SimError {
    SimError::validation(key, format!("must be {expected} (got {got})"))
}
