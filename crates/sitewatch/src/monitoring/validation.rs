use url::Url;

use crate::error::AddError;

/// Shortest accepted check interval
pub const MIN_INTERVAL_SECS: u64 = 10;

/// Longest accepted check interval (365 days); keeps timer deadlines in range
pub const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

fn invalid(reason: impl Into<String>) -> AddError {
    AddError::InvalidInput(reason.into())
}

/// Accept only absolute http/https URLs with a host
pub fn validate_target(target: &str) -> Result<Url, AddError> {
    if target.trim().is_empty() {
        return Err(invalid("URL cannot be empty"));
    }

    let url = Url::parse(target).map_err(|e| {
        if target.contains("://") {
            invalid(format!("Invalid URL: {e}"))
        } else {
            invalid("URL must include scheme (http:// or https://)")
        }
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("Unsupported scheme '{}', use http or https", url.scheme())));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL must have a host"));
    }

    Ok(url)
}

/// Check interval in seconds, bounded by [`MIN_INTERVAL_SECS`] and [`MAX_INTERVAL_SECS`]
pub fn validate_interval(interval: u64) -> Result<(), AddError> {
    match interval {
        i if i < MIN_INTERVAL_SECS => {
            Err(invalid(format!("Interval must be at least {MIN_INTERVAL_SECS} seconds")))
        }
        i if i > MAX_INTERVAL_SECS => {
            Err(invalid(format!("Interval must be at most {MAX_INTERVAL_SECS} seconds")))
        }
        _ => Ok(()),
    }
}
