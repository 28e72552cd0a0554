use regex::Regex;

/// Correlation ids embedded in internal server error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GackIds {
    pub gack_id: String,
    pub stacktrace_id: String,
}

/// Pull `error number: <gack> (<stacktrace>)` out of an error message
pub fn extract_gack(message: &str) -> Option<GackIds> {
    let re =
        Regex::new(r"error number: (?P<gack_id>[\d-]+) \((?P<stacktrace_id>[\d-]+)\)").ok()?;
    let caps = re.captures(message)?;
    Some(GackIds {
        gack_id: caps["gack_id"].to_string(),
        stacktrace_id: caps["stacktrace_id"].to_string(),
    })
}
