use crate::{
    command::{CommandRunner, ProbeInvocationError},
    types::NOT_AVAILABLE,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;

lazy_static! {
    static ref STATUS_LINE: Regex = Regex::new(r"Status:[ \t]*(\S.*)").unwrap();
}

/// Registry status of `domain`, or `N/A` when the response carries none.
pub async fn whois_status(
    runner: &dyn CommandRunner,
    whois: &str,
    domain: &str,
    timeout: Duration,
) -> Result<String, ProbeInvocationError> {
    let output = runner
        .run(whois, &["--", domain], timeout)
        .await?
        .require_success(whois)?;
    Ok(extract_status(&output.stdout))
}

pub fn extract_status(response: &str) -> String {
    STATUS_LINE
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
