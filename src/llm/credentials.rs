use log::debug;
use std::env;
use std::process::Command;

pub const KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

/// Resolves the OpenRouter API key without involving the backend client:
/// an explicitly supplied value, then the environment, then the OS secret
/// store. Every miss degrades to None.
#[derive(Clone, Default)]
pub struct CredentialChain {
    explicit: Option<String>,
}

impl CredentialChain {
    pub fn new() -> Self {
        CredentialChain { explicit: None }
    }

    #[allow(dead_code)]
    pub fn with_key(key: impl Into<String>) -> Self {
        CredentialChain {
            explicit: Some(key.into()),
        }
    }

    pub fn resolve(&self) -> Option<String> {
        if let Some(key) = &self.explicit {
            return Some(key.clone());
        }
        if let Ok(key) = env::var(KEY_ENV_VAR) {
            if !key.is_empty() {
                debug!("using API key from {}", KEY_ENV_VAR);
                return Some(key);
            }
        }
        self.lookup_secret_tool()
    }

    fn lookup_secret_tool(&self) -> Option<String> {
        let output = Command::new("secret-tool")
            .args(["lookup", "service", "openrouter.ai"])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if key.is_empty() {
            return None;
        }
        debug!("using API key from the OS secret store");
        Some(key)
    }
}
