pub mod avhdata;

use log::debug;
use serde_json::Value;

use crate::common::HttpTimeouts;
use crate::errors::ExportError;

pub const API_ROOT: &str = "https://leads.theonenet.work/api/api.cfm";
pub const USER_AGENT: &str = concat!("avhdata-export/", env!("CARGO_PKG_VERSION"));

/// Issues a single GET and parses the body as JSON. Only a 200 counts as success;
/// the body is returned as-is, without looking inside it.
pub fn fetch(url: &str, timeouts: &HttpTimeouts) -> Result<Value, ExportError> {
    let mut request = ureq::get(url);
    request.set("User-Agent", USER_AGENT);

    if let Some(ms) = timeouts.connect_ms {
        request.timeout_connect(ms);
    }
    if let Some(ms) = timeouts.read_ms {
        request.timeout_read(ms);
    }

    let response = request.call();

    // url carries the token, report the error alone
    if let Some(error) = response.synthetic_error() {
        return Err(ExportError::ApiRequestFailed(error.to_string()));
    }

    debug!("leads API responded with status {}", response.status());

    if response.status() != 200 {
        return Err(ExportError::ApiRequestFailed(format!("server responded with {} {}", response.status(), response.status_text())));
    }

    match response.into_json_deserialize::<Value>() {
        Ok(v) => { Ok(v) },
        Err(e) => {
            Err(ExportError::MalformedResponse(format!("response body is not valid JSON: {}", e)))
        }
    }
}
