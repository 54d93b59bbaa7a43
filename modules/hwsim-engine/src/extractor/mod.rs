mod keyword;
mod llm;

pub use keyword::KeywordExtractor;
pub use llm::LlmExtractor;

use std::sync::Arc;

use ai_client::Claude;
use async_trait::async_trait;
use hwsim_common::{Config, ExtractorBackend, ParamMap, SimulatorKind};
use tracing::info;

/// Turns a free-text request into a partial parameter mapping.
///
/// Best-effort and infallible: only fields the extractor is confident about are returned,
/// everything else is omitted and left for the resolver's defaults. Unmatched text gives an
/// empty map.
#[async_trait]
pub trait ParamExtractor: Send + Sync {
    async fn extract(&self, user_message: &str, kind: SimulatorKind) -> ParamMap;
}

/// Pick the extraction strategy named by the config. Called once at startup.
pub fn build_extractor(config: &Config) -> Arc<dyn ParamExtractor> {
    match &config.extractor {
        ExtractorBackend::Keyword => {
            info!("Using keyword parameter extraction");
            Arc::new(KeywordExtractor::new())
        }
        ExtractorBackend::Claude { api_key, model } => {
            info!(model = %model, "Using Claude parameter extraction");
            Arc::new(LlmExtractor::new(
                Claude::new(api_key, model),
                config.extraction_timeout,
            ))
        }
    }
}
