use std::time::Duration;

use ai_client::{truncate_to_char_boundary, Claude};
use async_trait::async_trait;
use tracing::{debug, warn};

use hwsim_common::{ParamMap, SimulatorKind};

use super::ParamExtractor;
use crate::catalogue::{self, ParamType};

const MAX_MESSAGE_BYTES: usize = 8_000;

/// Extractor backed by a Claude model.
///
/// The model call is the pipeline's only suspension point. A failure or a timeout is logged
/// and treated as "nothing extracted", so the request falls through to defaults.
pub struct LlmExtractor {
    claude: Claude,
    timeout: Duration,
}

impl LlmExtractor {
    pub fn new(claude: Claude, timeout: Duration) -> Self {
        Self { claude, timeout }
    }

    fn system_prompt(kind: SimulatorKind) -> String {
        let role = match kind {
            SimulatorKind::CpuArchitecture => "a CPU architecture and cache simulator",
            SimulatorKind::SemiconductorFab => "a semiconductor fab and yield simulator",
        };

        let mut prompt = format!(
            "You extract input parameters for {role} from a user's natural-language request.\n\n\
             ## Parameters\n"
        );
        for param in catalogue::params_for(kind) {
            let choices = match param.ty {
                ParamType::Choice(values) => format!(" One of: {}.", values.join(", ")),
                _ => String::new(),
            };
            prompt.push_str(&format!("- {}: {}.{}\n", param.name, param.description, choices));
        }
        prompt.push_str(
            "\nRecord only parameters the user actually states. \
             Do not fill in defaults or guess values that are not in the request.",
        );
        prompt
    }

    /// Drop keys outside the kind's catalogue and null values.
    fn retain_known(kind: SimulatorKind, raw: serde_json::Map<String, serde_json::Value>) -> ParamMap {
        raw.into_iter()
            .filter(|(key, value)| {
                let known = catalogue::lookup(kind, key).is_some();
                if !known {
                    debug!(key = %key, "Dropping unknown extracted parameter");
                }
                known && !value.is_null()
            })
            .collect()
    }
}

#[async_trait]
impl ParamExtractor for LlmExtractor {
    async fn extract(&self, user_message: &str, kind: SimulatorKind) -> ParamMap {
        let message = truncate_to_char_boundary(user_message, MAX_MESSAGE_BYTES);
        let call = self.claude.extract_object(
            Self::system_prompt(kind),
            message,
            catalogue::json_schema(kind),
        );

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(raw)) => Self::retain_known(kind, raw),
            Ok(Err(e)) => {
                warn!(error = %e, kind = %kind, "Parameter extraction failed; using defaults");
                ParamMap::new()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    kind = %kind,
                    "Parameter extraction timed out; using defaults"
                );
                ParamMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_parameter_and_choice() {
        let prompt = LlmExtractor::system_prompt(SimulatorKind::SemiconductorFab);
        for param in catalogue::FAB_PARAMS {
            assert!(prompt.contains(param.name), "missing {}", param.name);
        }
        assert!(prompt.contains("arf_immersion, euv"));
        assert!(prompt.contains("Do not fill in defaults"));
    }

    #[test]
    fn unknown_keys_and_nulls_are_dropped() {
        let raw = serde_json::json!({
            "clock_frequency": 3.0,
            "l3_size": null,
            "favourite_colour": "blue",
            "technology_node": "7nm"
        });
        let serde_json::Value::Object(raw) = raw else {
            unreachable!()
        };

        let params = LlmExtractor::retain_known(SimulatorKind::CpuArchitecture, raw);
        assert_eq!(params.len(), 1);
        assert_eq!(params["clock_frequency"], 3.0);
    }
}
