/// Monotonically increasing change counter for cheap staleness checks.
///
/// A component embeds one `ChangeTicker` and clicks it from its own setters
/// whenever observable numeric state actually changes. External cache layers
/// compare ticker values instead of comparing component state field by field.
///
/// The counter is 64-bit and is never reset or decremented; wraparound is not
/// handled because it is unreachable at realistic mutation rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeTicker {
    counter: u64,
}

impl ChangeTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one state change.
    #[inline]
    pub fn click(&mut self) {
        self.counter += 1;
    }

    /// Returns the current change count.
    #[inline]
    pub fn value(&self) -> u64 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ticker_starts_at_zero() {
        let ticker = ChangeTicker::new();
        assert_eq!(ticker.value(), 0);
    }

    #[test]
    fn click_increments_by_one() {
        let mut ticker = ChangeTicker::new();
        ticker.click();
        assert_eq!(ticker.value(), 1);
        ticker.click();
        assert_eq!(ticker.value(), 2);
    }

    #[test]
    fn value_is_stable_between_clicks() {
        let mut ticker = ChangeTicker::new();
        ticker.click();
        assert_eq!(ticker.value(), 1);
        assert_eq!(ticker.value(), 1);
    }

    #[test]
    fn clone_does_not_share_state() {
        let mut ticker = ChangeTicker::new();
        ticker.click();
        let mut copy = ticker;
        copy.click();
        assert_eq!(ticker.value(), 1);
        assert_eq!(copy.value(), 2);
    }
}
