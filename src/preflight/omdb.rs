//! OMDb API preflight check.

use super::CheckResult;
use crate::services::omdb::OmdbClient;

/// Check if OMDb API is accessible.
pub async fn check() -> CheckResult {
    match OmdbClient::from_env() {
        Ok(client) => match client.verify_api_key().await {
            Ok(true) => CheckResult::ok("OMDb API", "connected"),
            Ok(false) => CheckResult::fail(
                "OMDb API",
                "invalid API key",
                "Check your OMDB_API_KEY environment variable",
            ),
            Err(_) => CheckResult::fail(
                "OMDb API",
                "connection failed",
                "Check your network connection",
            ),
        },
        Err(_) => CheckResult::fail(
            "OMDb API",
            "API key not configured",
            "Set OMDB_API_KEY environment variable",
        ),
    }
}
