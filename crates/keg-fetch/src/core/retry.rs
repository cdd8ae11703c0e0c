use std::time::Duration;

/// Delay before a retry using capped exponential backoff.
///
/// The delay is `base * 2^retry_count`, never more than `cap`.
///
/// ```
/// use std::time::Duration;
/// use keg_fetch::retry_delay;
///
/// let base = Duration::from_millis(500);
/// let cap = Duration::from_secs(5);
/// assert_eq!(retry_delay(0, base, cap), Duration::from_millis(500));
/// assert_eq!(retry_delay(2, base, cap), Duration::from_secs(2));
/// assert_eq!(retry_delay(10, base, cap), cap);
/// ```
pub fn retry_delay(retry_count: u32, base: Duration, cap: Duration) -> Duration {
    let multiplier = 2_u32.saturating_pow(retry_count);
    base.saturating_mul(multiplier).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: Duration = Duration::from_secs(5);

    #[test]
    fn default_schedule() {
        let base = Duration::from_millis(500);
        let delays: Vec<_> = (0..6).map(|i| retry_delay(i, base, CAP)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                CAP,
                CAP,
            ]
        );
    }

    #[test]
    fn zero_base_stays_zero() {
        let base = Duration::ZERO;
        assert_eq!(retry_delay(0, base, CAP), Duration::ZERO);
        assert_eq!(retry_delay(10, base, CAP), Duration::ZERO);
    }

    #[test]
    fn overflow_is_capped() {
        let base = Duration::from_secs(u64::MAX / 2);
        assert_eq!(retry_delay(40, base, CAP), CAP);
    }

    #[test]
    fn exponential_growth_below_cap() {
        let base = Duration::from_millis(10);
        let delays: Vec<Duration> = (0..5).map(|i| retry_delay(i, base, CAP)).collect();
        for i in 1..delays.len() {
            assert_eq!(delays[i], delays[i - 1] * 2);
        }
    }
}
