//! Metric emission for index lookups and invalidations.

use metrics::counter;

pub const HIT_TOTAL: &str = "lectern_cache_hit_total";
pub const MISS_TOTAL: &str = "lectern_cache_miss_total";
pub const INVALIDATION_TOTAL: &str = "lectern_cache_invalidations_total";

pub(crate) fn record_lookup(index: &'static str, hit: bool) {
    if hit {
        counter!(HIT_TOTAL, "index" => index).increment(1);
    } else {
        counter!(MISS_TOTAL, "index" => index).increment(1);
    }
}

pub(crate) fn record_invalidation(index: &'static str) {
    counter!(INVALIDATION_TOTAL, "index" => index).increment(1);
}
