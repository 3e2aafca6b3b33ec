use metrics::counter;

pub const CACHE_HITS: &str = "parameter_store_cache_hits_total";
pub const CACHE_MISSES: &str = "parameter_store_cache_misses_total";
pub const REMOTE_LOOKUPS: &str = "parameter_store_remote_lookups_total";
pub const REMOTE_ERRORS: &str = "parameter_store_remote_errors_total";

/// Counters for the lookup path.
pub struct LookupTelemetry;

impl LookupTelemetry {
    pub fn record_cache_hit() {
        counter!(CACHE_HITS).increment(1);
    }

    pub fn record_cache_miss() {
        counter!(CACHE_MISSES).increment(1);
    }

    pub fn record_remote_lookup(found: bool) {
        let outcome = if found { "hit" } else { "miss" };
        counter!(REMOTE_LOOKUPS, "outcome" => outcome).increment(1);
    }

    pub fn record_remote_error() {
        counter!(REMOTE_ERRORS).increment(1);
    }
}
