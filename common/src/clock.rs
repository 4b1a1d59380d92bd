use chrono::Utc;

/// Seconds since the Unix epoch, with sub-second precision.
///
/// Event timestamps and cooldown stamps are all expressed in this unit so
/// records written by one process compare directly against the clock of
/// the other.
pub fn epoch_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_secs_is_recent() {
        // Jan 1 2024 in epoch seconds; anything earlier means a broken clock
        // source, not a flaky test.
        assert!(epoch_secs() > 1_704_067_200.0);
    }
}
