use crate::core::types::ProbeResult;

/// Sort results by platform name, case-insensitively.
pub fn order_results(mut results: Vec<ProbeResult>) -> Vec<ProbeResult> {
    results.sort_by_cached_key(|r| r.platform.to_lowercase());
    results
}
