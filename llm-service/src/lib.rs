//! Shared LLM client used by the review pipeline.
//!
//! Minimal, non-streaming wrapper around the OpenAI chat-completions API:
//! - [`config::LlmModelConfig`] — env-driven model/endpoint/sampling settings
//! - [`services::open_ai_service::OpenAiService`] — the HTTP client
//! - [`error_handler`] — unified error types and env helpers
//!
//! The crate performs no retries and no request shaping beyond what the
//! caller passes in; resilience policy belongs to the caller.

pub mod config;
pub mod error_handler;
pub mod services;

pub use config::LlmModelConfig;
pub use error_handler::{LlmError, LlmResult};
pub use services::open_ai_service::OpenAiService;
