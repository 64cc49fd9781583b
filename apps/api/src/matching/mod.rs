// Candidate matching pipeline: prompt builder → model gateway → response
// interpreter → score aggregator. Also hosts the summary / bullet writing assists.
// All model calls go through llm_client::TextGenerator.

pub mod handlers;
pub mod interpreter;
pub mod models;
pub mod prompts;
pub mod scoring;

pub use scoring::AiService;
