//! Client for the locally hosted text-completion service.
//!
//! The service takes `{"model": ..., "input": ...}` and answers with a
//! `choices` array; the text of the first choice is the reply.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::error::{Result, TabliteError};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11411/v1/complete";
pub const DEFAULT_MODEL: &str = "3.1";

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    /// URL the prompt is POSTed to
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }
}

/// Something that can answer a free-text prompt.
pub trait Completion {
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Like [`Completion::complete`], but failures come back as a printable
    /// message instead of an error.
    fn ask(&self, prompt: &str) -> String {
        match self.complete(prompt) {
            Ok(text) => text,
            Err(TabliteError::Completion(reason)) => {
                format!("Error querying the completion service: {}", reason)
            }
            Err(e) => format!("Error querying the completion service: {}", e),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

pub struct CompletionClient {
    client: reqwest::Client,
    runtime: Runtime,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut builder = reqwest::Client::builder();
        if is_loopback(&config.endpoint) {
            builder = builder.no_proxy();
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(completion_error)?;

        Ok(Self {
            client,
            runtime,
            config,
        })
    }
}

impl Completion for CompletionClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest {
            model: &self.config.model,
            input: prompt,
        };
        tracing::debug!(endpoint = %self.config.endpoint, model = %self.config.model, "sending completion request");

        self.runtime.block_on(async {
            let response = self
                .client
                .post(&self.config.endpoint)
                .json(&request)
                .send()
                .await
                .map_err(completion_error)?
                .error_for_status()
                .map_err(completion_error)?;

            let body: CompletionResponse = response.json().await.map_err(completion_error)?;
            body.choices
                .into_iter()
                .next()
                .map(|choice| choice.text)
                .ok_or_else(|| TabliteError::Completion("response contained no choices".to_string()))
        })
    }
}

fn is_loopback(endpoint: &str) -> bool {
    let Ok(url) = reqwest::Url::parse(endpoint) else {
        return false;
    };
    match url.host_str() {
        Some(host) => {
            host.eq_ignore_ascii_case("localhost")
                || host
                    .trim_matches(['[', ']'])
                    .parse::<IpAddr>()
                    .map(|ip| ip.is_loopback())
                    .unwrap_or(false)
        }
        None => false,
    }
}

// reqwest keeps the interesting part (e.g. "Connection refused") in the
// source chain.
fn completion_error(e: reqwest::Error) -> TabliteError {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    TabliteError::Completion(message)
}
