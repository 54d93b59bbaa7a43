//! Inclusive range checks for simulator inputs.
//!
//! This is the only place inputs are checked. Out-of-range values are rejected with the
//! offending field and bound; nothing is clamped here.

use crate::error::SimError;
use crate::types::{CpuArchitectureInput, SemiconductorFabInput};

pub(crate) fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), SimError> {
    // NaN fails the contains check as well.
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SimError::validation(
            field,
            format!("must be between {min} and {max} (got {value})"),
        ))
    }
}

pub(crate) fn check_int_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), SimError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SimError::validation(
            field,
            format!("must be between {min} and {max} (got {value})"),
        ))
    }
}

pub(crate) fn check_min(field: &str, value: u32, min: u32) -> Result<(), SimError> {
    if value >= min {
        Ok(())
    } else {
        Err(SimError::validation(
            field,
            format!("must be at least {min} (got {value})"),
        ))
    }
}

impl CpuArchitectureInput {
    pub fn validate(&self) -> Result<(), SimError> {
        check_range("clock_frequency", self.clock_frequency, 0.1, 10.0)?;
        check_min("number_of_cores", self.number_of_cores, 1)?;
        check_int_range("pipeline_depth", self.pipeline_depth, 5, 20)?;
        check_int_range("issue_width", self.issue_width, 1, 8)?;
        check_int_range("rob_size", self.rob_size, 32, 512)?;
        check_range(
            "branch_prediction_accuracy",
            self.branch_prediction_accuracy,
            90.0,
            99.9,
        )?;
        check_int_range("main_memory_latency", self.main_memory_latency, 50, 500)?;
        check_range("bus_bandwidth", self.bus_bandwidth, 1.0, 1000.0)?;
        Ok(())
    }
}

impl SemiconductorFabInput {
    pub fn validate(&self) -> Result<(), SimError> {
        check_int_range("mask_layer_count", self.mask_layer_count, 30, 100)?;
        check_range("cpk_target", self.cpk_target, 1.0, 2.0)?;
        check_range("cd_uniformity", self.cd_uniformity, 80.0, 100.0)?;
        check_range("overlay_accuracy", self.overlay_accuracy, 0.1, 10.0)?;
        check_int_range("throughput_wph", self.throughput_wph, 1, 1000)?;
        check_range("mtbf", self.mtbf, 100.0, 10000.0)?;
        check_range("mttr", self.mttr, 0.1, 100.0)?;
        check_range(
            "defect_clustering_factor",
            self.defect_clustering_factor,
            0.0,
            5.0,
        )?;
        check_range("killer_defect_ratio", self.killer_defect_ratio, 0.0, 100.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::SimulationDefaults;

    fn field_of(err: SimError) -> String {
        match err {
            SimError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let defaults = SimulationDefaults::default();
        defaults.cpu.validate().unwrap();
        defaults.fab.validate().unwrap();
    }

    #[test]
    fn clock_above_max_is_rejected() {
        let mut input = SimulationDefaults::default().cpu;
        input.clock_frequency = 15.0;
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("clock_frequency"));
        assert!(err.to_string().contains("10"));
        assert_eq!(field_of(err), "clock_frequency");
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut input = SimulationDefaults::default().cpu;
        input.clock_frequency = 10.0;
        input.pipeline_depth = 5;
        input.branch_prediction_accuracy = 99.9;
        input.validate().unwrap();
    }

    #[test]
    fn zero_cores_is_rejected() {
        let mut input = SimulationDefaults::default().cpu;
        input.number_of_cores = 0;
        assert_eq!(field_of(input.validate().unwrap_err()), "number_of_cores");
    }

    #[test]
    fn nan_is_rejected() {
        let mut input = SimulationDefaults::default().cpu;
        input.bus_bandwidth = f64::NAN;
        assert_eq!(field_of(input.validate().unwrap_err()), "bus_bandwidth");
    }

    #[test]
    fn fab_out_of_range_fields_are_named() {
        let mut input = SimulationDefaults::default().fab;
        input.throughput_wph = 0;
        assert_eq!(field_of(input.validate().unwrap_err()), "throughput_wph");

        let mut input = SimulationDefaults::default().fab;
        input.mttr = 0.05;
        assert_eq!(field_of(input.validate().unwrap_err()), "mttr");
    }
}
