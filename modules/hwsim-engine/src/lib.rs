//! Parameter resolution and derived-metrics pipeline.
//!
//! `text → extract → resolve (defaults + validation) → compute → render`

pub mod calculator;
pub mod catalogue;
pub mod extractor;
pub mod feedback;
pub mod resolver;
pub mod simulator;

pub use calculator::{compute, compute_cpu, compute_fab};
pub use extractor::{build_extractor, KeywordExtractor, LlmExtractor, ParamExtractor};
pub use feedback::{render, UNKNOWN_SIMULATOR_MESSAGE};
pub use resolver::resolve;
pub use simulator::Simulator;
