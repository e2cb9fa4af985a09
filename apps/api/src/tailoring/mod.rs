//! The CV-tailoring pipeline: prompt construction, model-output extraction
//! and validation, the deterministic keyword fallback, and the orchestrator
//! tying them together.

pub mod extractor;
pub mod fallback;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod validator;
