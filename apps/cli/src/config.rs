use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use client_core::CommitPolicy;
use serde::Deserialize;
use shared::domain::{RequestConfig, DEFAULT_MAX_SENTENCES, DEFAULT_TOP_K};
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "textlens.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub max_sentences: i64,
    pub top_k: i64,
    pub request_timeout_secs: Option<u64>,
    pub commit_policy: CommitPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            max_sentences: i64::from(DEFAULT_MAX_SENTENCES),
            top_k: i64::from(DEFAULT_TOP_K),
            request_timeout_secs: None,
            commit_policy: CommitPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    max_sentences: Option<i64>,
    top_k: Option<i64>,
    request_timeout_secs: Option<u64>,
    commit_policy: Option<CommitPolicy>,
}

impl Settings {
    /// Clamped request parameters for the session.
    pub fn request_config(&self) -> RequestConfig {
        RequestConfig::new(self.max_sentences, self.top_k)
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.request_timeout_secs.filter(|secs| *secs > 0) {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build().context("failed to build http client")
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.server_url {
            self.server_url = v;
        }
        if let Some(v) = file.max_sentences {
            self.max_sentences = v;
        }
        if let Some(v) = file.top_k {
            self.top_k = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = Some(v);
        }
        if let Some(v) = file.commit_policy {
            self.commit_policy = v;
        }
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("TEXTLENS_SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = parsed_env(&env, "TEXTLENS_MAX_SENTENCES") {
            self.max_sentences = v;
        }
        if let Some(v) = parsed_env(&env, "TEXTLENS_TOP_K") {
            self.top_k = v;
        }
        if let Some(v) = parsed_env(&env, "TEXTLENS_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = Some(v);
        }
        if let Some(v) = parsed_env(&env, "TEXTLENS_COMMIT_POLICY") {
            self.commit_policy = v;
        }
    }
}

fn parsed_env<T>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, value = %raw, error = %err, "ignoring malformed environment override");
            None
        }
    }
}

pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

/// Defaults, then the config file, then environment overrides. An explicitly named
/// config file must exist; the default one is optional.
pub fn load_settings_with(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => {
            let file: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
            settings.apply_file(file);
        }
        Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    }

    settings.apply_env(env);
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
