use std::sync::Arc;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use hwsim_common::{
    Config, ParamMap, SimError, SimulationDefaults, SimulationInput, SimulationOutput,
    SimulationRequest, SimulationResponse, SimulatorKind,
};

use crate::calculator::compute;
use crate::extractor::{build_extractor, ParamExtractor};
use crate::feedback::render;
use crate::resolver::resolve;

/// The request pipeline. Stateless apart from its immutable collaborators, so one instance
/// serves concurrent requests.
#[derive(Clone)]
pub struct Simulator {
    extractor: Arc<dyn ParamExtractor>,
    defaults: SimulationDefaults,
}

impl Simulator {
    pub fn new(extractor: Arc<dyn ParamExtractor>, defaults: SimulationDefaults) -> Self {
        Self {
            extractor,
            defaults,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(build_extractor(config), config.defaults.clone())
    }

    /// Run one simulation end to end.
    ///
    /// An explicit typed input matching the simulator kind is used as-is (after validation)
    /// and the extractor is skipped; otherwise the input is built from `user_message`.
    pub async fn run(&self, request: SimulationRequest) -> Result<SimulationResponse, SimError> {
        let kind: SimulatorKind = request.simulator_type.parse()?;
        let span = info_span!("simulation", run_id = %Uuid::new_v4(), kind = %kind);
        self.run_kind(kind, request).instrument(span).await
    }

    async fn run_kind(
        &self,
        kind: SimulatorKind,
        request: SimulationRequest,
    ) -> Result<SimulationResponse, SimError> {
        let PreparedInput {
            input,
            extracted_params,
            explicit,
        } = self.prepare_input(kind, request).await?;

        let output = compute(&input)?;
        let message = render(kind, &output);
        info!(explicit_input = explicit, "Simulation complete");

        let (cpu_output, fab_output) = match output {
            SimulationOutput::Cpu(out) => (Some(out), None),
            SimulationOutput::Fab(out) => (None, Some(out)),
        };

        Ok(SimulationResponse {
            simulator_type: kind,
            message,
            cpu_output,
            fab_output,
            extracted_params,
        })
    }

    /// Pick the explicit typed input for `kind` when present, otherwise extract and resolve.
    async fn prepare_input(
        &self,
        kind: SimulatorKind,
        request: SimulationRequest,
    ) -> Result<PreparedInput, SimError> {
        let explicit = match kind {
            SimulatorKind::CpuArchitecture => request.cpu_input.map(SimulationInput::Cpu),
            SimulatorKind::SemiconductorFab => request.fab_input.map(SimulationInput::Fab),
        };

        if let Some(input) = explicit {
            input.validate()?;
            return Ok(PreparedInput {
                input,
                extracted_params: ParamMap::new(),
                explicit: true,
            });
        }

        let extracted = self.extractor.extract(&request.user_message, kind).await;
        info!(extracted = extracted.len(), "Parameters extracted");
        Ok(PreparedInput {
            input: resolve(&extracted, kind, &self.defaults)?,
            extracted_params: extracted,
            explicit: false,
        })
    }
}

struct PreparedInput {
    input: SimulationInput,
    extracted_params: ParamMap,
    explicit: bool,
}
