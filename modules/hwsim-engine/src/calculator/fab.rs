use hwsim_common::{
    BinningDistribution, LithographySource, SemiconductorFabInput, SemiconductorFabOutput,
    SimError, TechnologyNode,
};

use super::ensure_metric;

/// Dimensionless yield multiplier per node; finer nodes are harder to yield.
const NODE_YIELD_FACTORS: &[(TechnologyNode, f64)] = &[
    (TechnologyNode::Nm28, 0.95),
    (TechnologyNode::Nm14, 0.90),
    (TechnologyNode::Nm7, 0.85),
    (TechnologyNode::Nm3, 0.75),
];
const DEFAULT_YIELD_FACTOR: f64 = 0.90;

/// Full mask-set cost per node, in currency units.
const NODE_MASK_COSTS: &[(TechnologyNode, f64)] = &[
    (TechnologyNode::Nm28, 1.0e9),
    (TechnologyNode::Nm14, 5.0e9),
    (TechnologyNode::Nm7, 20.0e9),
    (TechnologyNode::Nm3, 100.0e9),
];
const DEFAULT_MASK_COST: f64 = 10.0e9;

const PARAMETRIC_SHARE: f64 = 0.95;
const YIELD_FLOOR: f64 = 50.0;

// Grade splits of parametric yield, and their floors.
const GRADE_A_SHARE: f64 = 0.2;
const GRADE_B_SHARE: f64 = 0.5;
const GRADE_C_SHARE: f64 = 0.3;
const GRADE_A_FLOOR: f64 = 10.0;
const GRADE_B_FLOOR: f64 = 20.0;
const GRADE_C_FLOOR: f64 = 10.0;

const RATED_THROUGHPUT_WPH: f64 = 100.0;
const OEE_FLOOR: f64 = 50.0;
const LINE_BALANCE_GAIN: f64 = 1.1;
const LINE_BALANCE_FLOOR: f64 = 70.0;

const HOURS_PER_MONTH: f64 = 24.0 * 30.0;
const WIP_PER_WPH: u64 = 2;
const EUV_BOTTLENECK_STATION: &str = "Lithography_Scanner_02";

fn node_lookup(table: &[(TechnologyNode, f64)], node: TechnologyNode, fallback: f64) -> f64 {
    table
        .iter()
        .find(|(n, _)| *n == node)
        .map_or(fallback, |(_, v)| *v)
}

pub fn compute_fab(input: &SemiconductorFabInput) -> Result<SemiconductorFabOutput, SimError> {
    let node_factor = node_lookup(NODE_YIELD_FACTORS, input.technology_node, DEFAULT_YIELD_FACTOR);
    let functional_yield = node_factor * (input.cpk_target / 2.0) * 100.0;
    let parametric_yield = functional_yield * PARAMETRIC_SHARE;

    let throughput = f64::from(input.throughput_wph);
    let availability = input.mtbf / (input.mtbf + input.mttr) * 100.0;
    let performance = (throughput / RATED_THROUGHPUT_WPH * 100.0).min(100.0);
    let quality = functional_yield;
    let oee = (availability * performance * quality / 10_000.0).max(OEE_FLOOR);

    let mask_cost = node_lookup(NODE_MASK_COSTS, input.technology_node, DEFAULT_MASK_COST);
    let monthly_wafers = throughput * HOURS_PER_MONTH;

    let bottleneck_station_id = match input.lithography_source {
        LithographySource::Euv => Some(EUV_BOTTLENECK_STATION.to_string()),
        LithographySource::ArfImmersion => None,
    };

    Ok(SemiconductorFabOutput {
        parametric_yield: ensure_metric("parametric_yield", parametric_yield)?.max(YIELD_FLOOR),
        functional_yield: ensure_metric("functional_yield", functional_yield)?.max(YIELD_FLOOR),
        binning_distribution: BinningDistribution {
            grade_a: (parametric_yield * GRADE_A_SHARE).max(GRADE_A_FLOOR),
            grade_b: (parametric_yield * GRADE_B_SHARE).max(GRADE_B_FLOOR),
            grade_c: (parametric_yield * GRADE_C_SHARE).max(GRADE_C_FLOOR),
        },
        oee: ensure_metric("oee", oee)?,
        wip_level: u64::from(input.throughput_wph) * WIP_PER_WPH,
        bottleneck_station_id,
        mask_amortization_cost: ensure_metric("mask_amortization_cost", mask_cost / monthly_wafers)?,
        line_balance_efficiency: ensure_metric(
            "line_balance_efficiency",
            (oee * LINE_BALANCE_GAIN).max(LINE_BALANCE_FLOOR),
        )?,
    })
}
