use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::debug;
use serde::Deserialize;

use crate::common::{HttpTimeouts, QueryWindow, RunConfig, DATE_FORMAT, DEFAULT_OUTPUT_FILE};
use crate::errors::ExportError;
use crate::leads;
use crate::leads::avhdata::range_url;

pub const TOKEN_ENV_VAR: &str = "AVHDATA_API_TOKEN";

/// Raw values as supplied on the command line. Anything left `None` falls back to a default.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub output_file: Option<String>,
    pub verbose: Option<String>,
}

#[derive(Clone)]
pub struct ApiSettings {
    pub root: String,
    pub token: String,
    pub timeouts: HttpTimeouts,
}

#[derive(Deserialize, Debug, Default)]
pub struct LeadsSecret {
    pub token: Option<String>,
    pub root: Option<String>,
}

fn parse_date(value: &str) -> Result<NaiveDate, ExportError> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(d) => { Ok(d) },
        Err(_) => { Err(ExportError::InvalidDate(value.to_owned())) }
    }
}

fn parse_verbose(value: &str) -> Result<bool, ExportError> {
    match value.trim() {
        "1" => { Ok(true) },
        "0" => { Ok(false) },
        other => { Err(ExportError::Config(format!("verbose must be 1 or 0, got '{}'", other))) }
    }
}

pub fn is_csv_filename(name: &str) -> bool {
    name.to_lowercase().ends_with(".csv")
}

/// Merges user overrides over the computed defaults, validates them and builds the request URL.
pub fn resolve_config(overrides: Overrides, defaults: QueryWindow, api: &ApiSettings) -> Result<RunConfig, ExportError> {
    let output_file = overrides.output_file.unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_owned());
    if !is_csv_filename(&output_file) {
        return Err(ExportError::InvalidFilename(output_file));
    }

    let start_date = match overrides.start_date {
        Some(s) => { parse_date(&s)? },
        None => { defaults.start_date }
    };
    let end_date = match overrides.end_date {
        Some(s) => { parse_date(&s)? },
        None => { defaults.end_date }
    };
    let verbose = match overrides.verbose {
        Some(v) => { parse_verbose(&v)? },
        None => { true }
    };

    let window = QueryWindow::new(start_date, end_date);
    debug!("resolved query window {} writing to {}", window, output_file);

    Ok(RunConfig {
        url: range_url(&api.root, &api.token, &window),
        window,
        output_file: PathBuf::from(output_file),
        verbose,
    })
}

/// Reads the `[leads]` table of the secret config. A missing file is not an error,
/// the token may still come from the environment.
pub fn read_secret_config(path: &Path) -> Result<LeadsSecret, ExportError> {
    let contents = match fs::read_to_string(path) {
        Ok(s) => { s },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no secret config at {}", path.display());
            return Ok(LeadsSecret::default())
        },
        Err(e) => {
            return Err(ExportError::Config(format!("Failed to read secret config {}: {}", path.display(), e)))
        }
    };

    let mut parsed: HashMap<String, LeadsSecret> = match toml::from_str(&contents) {
        Ok(c) => { c },
        Err(e) => {
            return Err(ExportError::Config(format!("Secret configuration exists yet failed to process as a TOML file: {}", e)))
        }
    };

    Ok(parsed.remove("leads").unwrap_or_default())
}

fn parse_timeout(value: Option<&str>, name: &str) -> Result<Option<u64>, ExportError> {
    match value {
        Some(v) => {
            match v.parse::<u64>() {
                Ok(ms) => { Ok(Some(ms)) },
                Err(_) => { Err(ExportError::Config(format!("Invalid {} specified: {}", name, v))) }
            }
        },
        None => { Ok(None) }
    }
}

/// Resolves where and how to reach the API. The token comes from the environment
/// first, then the secret config; the root from the command line, then the secret
/// config, then the built-in default.
pub fn load_api_settings(
    secret: LeadsSecret,
    env_token: Option<String>,
    root_override: Option<&str>,
    connect_timeout: Option<&str>,
    receive_timeout: Option<&str>
) -> Result<ApiSettings, ExportError> {
    let token = match env_token.filter(|t| !t.is_empty()).or(secret.token) {
        Some(t) if !t.is_empty() => { t },
        _ => { return Err(ExportError::MissingToken) }
    };

    let root = match (root_override, secret.root) {
        (Some(r), _) => { r.to_owned() },
        (None, Some(r)) => { r },
        (None, None) => { leads::API_ROOT.to_owned() }
    };

    let timeouts = HttpTimeouts {
        connect_ms: parse_timeout(connect_timeout, "http connect timeout")?,
        read_ms: parse_timeout(receive_timeout, "http receive timeout")?,
    };

    Ok(ApiSettings { root, token, timeouts })
}
