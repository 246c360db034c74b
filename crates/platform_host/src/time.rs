//! Time helpers shared across host contracts, adapters and runtime deadlines.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Returns the absolute deadline `timeout_ms` after `now_ms`, saturating at `u64::MAX`.
pub const fn deadline_after(now_ms: u64, timeout_ms: u64) -> u64 {
    now_ms.saturating_add(timeout_ms)
}

/// Returns whether `now_ms` has reached `deadline_ms`.
pub const fn is_past_deadline(now_ms: u64, deadline_ms: u64) -> bool {
    now_ms >= deadline_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_is_inclusive_and_saturating() {
        let deadline = deadline_after(1_000, 200);
        assert!(!is_past_deadline(1_199, deadline));
        assert!(is_past_deadline(1_200, deadline));
        assert_eq!(deadline_after(u64::MAX - 1, 10), u64::MAX);
    }
}
