//! Frame-driven animators. Each takes the frame's `now` (seconds) explicitly
//! and never reads the clock itself.

pub mod countdown;
pub mod reveal;
pub mod ticker;
pub mod typing;

use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock seconds since the epoch.
pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Square wave at `hz`: on during the first half of every period.
pub fn blink_on(now: f64, hz: f64) -> bool {
    ((now * hz).floor() as i64).rem_euclid(2) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_on_2hz() {
        assert!(blink_on(10.0, 2.0));
        assert!(blink_on(10.49, 2.0));
        assert!(!blink_on(10.5, 2.0));
        assert!(blink_on(11.0, 2.0));
    }

    #[test]
    fn test_blink_on_4hz() {
        assert!(blink_on(0.0, 4.0));
        assert!(!blink_on(0.25, 4.0));
        assert!(blink_on(0.5, 4.0));
    }
}
