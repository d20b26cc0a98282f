//! Pluggable AI classification backends
//!
//! The AI pass is the last resort of category resolution: merchants that
//! neither manual overrides nor the trie could resolve are submitted as one
//! batched request. Backends run locally (Ollama); a mock backend exists for
//! tests.
//!
//! # Architecture
//!
//! - `Classifier` trait: the batched merchant classification interface
//! - `ClassifierClient` enum: concrete wrapper providing Clone + compile-time
//!   dispatch
//! - Backend implementations: `OllamaClassifier`, `MockClassifier`
//!
//! # Configuration
//!
//! Environment variables:
//! - `OLLAMA_HOST`: Ollama server URL (required for the ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2:3b)

mod mock;
mod ollama;
pub mod parsing;

pub use mock::MockClassifier;
pub use ollama::OllamaClassifier;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

/// Batched merchant classification interface
///
/// Implementations must validate returned labels against the closed category
/// set and coerce anything else to the default category; callers never see
/// labels outside [`crate::categories::ALLOWED_CATEGORIES`].
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a batch of merchants into categories.
    ///
    /// Returns a merchant -> category map. Merchants missing from the
    /// response are simply absent from the map; total failure is an error
    /// that callers treat as non-fatal.
    async fn classify_merchants(&self, merchants: &[String]) -> Result<HashMap<String, String>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete classifier client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ClassifierClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaClassifier),
    /// Mock backend for testing
    Mock(MockClassifier),
}

impl ClassifierClient {
    /// Create a classifier from environment variables.
    ///
    /// Returns None when `OLLAMA_HOST` is not set; the AI pass is an optional
    /// enhancement and ingestion proceeds without it.
    pub fn from_env() -> Option<Self> {
        OllamaClassifier::from_env().map(ClassifierClient::Ollama)
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        ClassifierClient::Ollama(OllamaClassifier::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        ClassifierClient::Mock(MockClassifier::new())
    }
}

#[async_trait]
impl Classifier for ClassifierClient {
    async fn classify_merchants(&self, merchants: &[String]) -> Result<HashMap<String, String>> {
        match self {
            ClassifierClient::Ollama(b) => b.classify_merchants(merchants).await,
            ClassifierClient::Mock(b) => b.classify_merchants(merchants).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            ClassifierClient::Ollama(b) => b.health_check().await,
            ClassifierClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            ClassifierClient::Ollama(b) => b.model(),
            ClassifierClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            ClassifierClient::Ollama(b) => b.host(),
            ClassifierClient::Mock(b) => b.host(),
        }
    }
}
