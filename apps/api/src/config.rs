use anyhow::{Context, Result};

use crate::llm_client::LlmConfig;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            ollama_url: env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            ollama_model: env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Gateway settings, handed to `LlmClient::new` once at startup.
    pub fn llm(&self) -> LlmConfig {
        LlmConfig {
            base_url: self.ollama_url.clone(),
            model: self.ollama_model.clone(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
