//! Mock classifier for testing
//!
//! Returns predictable categories without a running LLM server, and can be
//! configured to fail so the degraded AI path is testable.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::categories::DEFAULT_CATEGORY;
use crate::error::{Error, Result};

use super::Classifier;

/// Mock classification backend
#[derive(Clone, Default)]
pub struct MockClassifier {
    /// When false, `classify_merchants` fails and `health_check` is false
    pub healthy: bool,
    /// Substring (uppercased) -> category rules checked before the fallback
    responses: Vec<(String, String)>,
}

impl MockClassifier {
    /// Create a healthy mock with a few well-known merchants built in
    pub fn new() -> Self {
        let responses = [
            ("NETFLIX", "subscriptions"),
            ("SPOTIFY", "subscriptions"),
            ("GRAB", "transport"),
            ("STARBUCKS", "drinks"),
            ("NTUC", "groceries"),
        ]
        .into_iter()
        .map(|(m, c)| (m.to_string(), c.to_string()))
        .collect();

        Self {
            healthy: true,
            responses,
        }
    }

    /// Create a mock whose classification calls fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            responses: Vec::new(),
        }
    }

    /// Add a substring -> category rule
    pub fn with_response(mut self, merchant_fragment: &str, category: &str) -> Self {
        self.responses
            .push((merchant_fragment.to_uppercase(), category.to_string()));
        self
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify_merchants(&self, merchants: &[String]) -> Result<HashMap<String, String>> {
        if !self.healthy {
            return Err(Error::ClassificationUnavailable(
                "mock backend configured to fail".to_string(),
            ));
        }

        let mut result = HashMap::new();
        for merchant in merchants {
            let upper = merchant.to_uppercase();
            let category = self
                .responses
                .iter()
                .find(|(fragment, _)| upper.contains(fragment))
                .map(|(_, category)| category.clone())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
            result.insert(merchant.clone(), category);
        }
        Ok(result)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
