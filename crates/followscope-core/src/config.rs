use std::env::VarError;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, DEFAULT_HISTORY_LIMIT, MAX_PER_PAGE};
use crate::ConfigError;

/// Reads `.env` (if present) into the process environment, then builds the
/// configuration from it.
///
/// # Errors
///
/// [`ConfigError::MissingEnvVar`] when a required variable is unset or blank,
/// [`ConfigError::InvalidEnvVar`] when a value does not parse or is out of
/// range.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Like [`load_app_config`] but without touching `.env`.
///
/// # Errors
///
/// See [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(std::env::var)
}

/// Trimmed, non-blank view over an env-var lookup.
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&'static str) -> Result<String, VarError>,
{
    fn get(&self, var: &'static str) -> Option<String> {
        let value = (self.lookup)(var).ok()?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_owned())
    }

    fn required(&self, var: &'static str) -> Result<String, ConfigError> {
        self.get(var)
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_owned()))
    }

    fn text(&self, var: &'static str, default: &str) -> String {
        self.get(var).unwrap_or_else(|| default.to_owned())
    }

    /// Parses `var` as a number, or returns `default` when unset. Values
    /// below `min` are rejected.
    fn number<T>(&self, var: &'static str, default: T, min: T) -> Result<T, ConfigError>
    where
        T: FromStr + PartialOrd + Display,
        T::Err: Display,
    {
        let Some(raw) = self.get(var) else {
            return Ok(default);
        };
        let value = raw.parse::<T>().map_err(|e| invalid(var, e.to_string()))?;
        if value < min {
            return Err(invalid(var, format!("must be at least {min}")));
        }
        Ok(value)
    }
}

fn invalid(var: &str, reason: String) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_owned(),
        reason,
    }
}

/// Builds the configuration from an arbitrary lookup so tests need not touch
/// the process environment. Blank values count as unset. Keys are always
/// literals, which lets `std::env::var` be passed as the lookup directly.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&'static str) -> Result<String, VarError>,
{
    let vars = Vars { lookup };

    let username = vars.required("GITHUB_USERNAME")?;
    let token = vars.required("GITHUB_TOKEN")?;

    let per_page = vars.number("FOLLOWSCOPE_PER_PAGE", MAX_PER_PAGE, 1)?;
    if per_page > MAX_PER_PAGE {
        return Err(invalid(
            "FOLLOWSCOPE_PER_PAGE",
            format!("must be between 1 and {MAX_PER_PAGE}"),
        ));
    }

    // The explicit setting wins; inside a workflow GITHUB_REPOSITORY is set
    // to the repository running it.
    let traffic_repo = match ["FOLLOWSCOPE_TRAFFIC_REPO", "GITHUB_REPOSITORY"]
        .into_iter()
        .find_map(|var| vars.get(var).map(|repo| (var, repo)))
    {
        Some((var, repo)) => {
            validate_repo_slug(var, &repo)?;
            Some(repo)
        }
        None => None,
    };

    Ok(AppConfig {
        username,
        token,
        data_dir: PathBuf::from(vars.text("FOLLOWSCOPE_DATA_DIR", "./data")),
        history_limit: vars.number("FOLLOWSCOPE_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT, 1)?,
        per_page,
        api_base_url: vars.text("FOLLOWSCOPE_API_BASE_URL", "https://api.github.com"),
        traffic_repo,
        request_timeout_secs: vars.number("FOLLOWSCOPE_REQUEST_TIMEOUT_SECS", 30, 1)?,
        user_agent: vars.text("FOLLOWSCOPE_USER_AGENT", "followscope/0.1"),
        max_retries: vars.number("FOLLOWSCOPE_MAX_RETRIES", 3, 0)?,
        retry_backoff_base_ms: vars.number("FOLLOWSCOPE_RETRY_BACKOFF_BASE_MS", 1_000, 0)?,
        log_level: vars.text("FOLLOWSCOPE_LOG_LEVEL", "info"),
    })
}

/// Traffic is addressed as `owner/name`; anything else cannot form a URL.
fn validate_repo_slug(var: &str, repo: &str) -> Result<(), ConfigError> {
    let mut parts = repo.split('/');
    let well_formed = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
    );
    if well_formed {
        Ok(())
    } else {
        Err(invalid(var, format!("expected owner/name, got \"{repo}\"")))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
