use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;

use super::credentials::{CredentialChain, KEY_ENV_VAR};
use super::{BackendError, CompletionBackend};
use crate::config::CONFIG;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

async fn send_chat(
    client: &Client,
    api_key: &str,
    system: &str,
    buffer: &str,
) -> Result<String, BackendError> {
    let request = ChatRequest {
        model: CONFIG.api_model.clone(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: system.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: buffer.to_string(),
            },
        ],
        stream: false,
    };

    let response = client
        .post(format!("{}/chat/completions", CONFIG.api_base))
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| BackendError::Backend(e.to_string()))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(BackendError::Authentication);
    }
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(BackendError::Backend(format!("API error ({}): {}", status, body)));
    }

    let parsed = response
        .json::<ChatResponse>()
        .await
        .map_err(|e| BackendError::Backend(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::Backend("response contained no choices".to_string()))?;

    Ok(choice.message.content)
}

/// Default backend. The key is resolved up front through the credential
/// chain, so a missing key fails before any network traffic.
pub struct OpenRouterApi {
    client: Client,
    credentials: CredentialChain,
}

impl OpenRouterApi {
    pub fn new() -> Self {
        OpenRouterApi {
            client: Client::new(),
            credentials: CredentialChain::new(),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterApi {
    async fn complete(&self, system: &str, buffer: &str) -> Result<String, BackendError> {
        let api_key = self.credentials.resolve().ok_or(BackendError::Authentication)?;
        debug!("dispatching completion to {} as {}", CONFIG.api_base, CONFIG.api_model);
        send_chat(&self.client, &api_key, system, buffer).await
    }
}

/// Implicit-key variant: whatever is in the environment goes on the wire
/// and the server's status code is the only authentication verdict.
pub struct OpenRouterEnv {
    client: Client,
}

impl OpenRouterEnv {
    pub fn new() -> Self {
        OpenRouterEnv {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterEnv {
    async fn complete(&self, system: &str, buffer: &str) -> Result<String, BackendError> {
        let api_key = env::var(KEY_ENV_VAR).unwrap_or_default();
        debug!("dispatching completion to {} as {}", CONFIG.api_base, CONFIG.api_model);
        send_chat(&self.client, &api_key, system, buffer).await
    }
}
