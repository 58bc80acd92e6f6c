//! AI adapter module. Implements `Extractor` for LLM integration.
//!
//! Provides OpenAI-compatible adapter and mock adapter for offline use.

pub mod mock_adapter;
pub mod openai_adapter;

pub use mock_adapter::MockExtractor;
pub use openai_adapter::OpenAiExtractor;
