use crate::engine::EngineError;
use crate::limits::MAX_CONFIRMATION;
use crate::model::ConfirmationNumber;

/// Issues confirmation numbers for one directory.
///
/// The counter always sits one past the highest number it has seen, wrapping
/// to zero after `999999`. Every reservation-building call site receives it by
/// `&mut`, so a failed attempt can put it back with [`restore`](Self::restore).
///
/// Numbers are unique only until the counter wraps; numbers still held by
/// live leases are not skipped.
#[derive(Debug, Default)]
pub struct ConfirmationCounter {
    next: u32,
}

/// Counter value captured before a candidate reservation is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterMark(u32);

impl ConfirmationCounter {
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// The number the next `issue` call would hand out.
    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn issue(&mut self) -> ConfirmationNumber {
        let number = self.next_number();
        self.observe(number);
        number
    }

    /// Advance past `number` if it is at or above the current position.
    pub fn observe(&mut self, number: ConfirmationNumber) {
        let n = number.get();
        if n >= self.next {
            self.next = if n == MAX_CONFIRMATION { 0 } else { n + 1 };
        }
    }

    pub fn reset(&mut self, value: u32) -> Result<(), EngineError> {
        if value > MAX_CONFIRMATION {
            return Err(EngineError::InvalidRequest("confirmation number out of range"));
        }
        self.next = value;
        Ok(())
    }

    pub fn mark(&self) -> CounterMark {
        CounterMark(self.next)
    }

    pub fn restore(&mut self, mark: CounterMark) {
        self.next = mark.0;
    }

    fn next_number(&self) -> ConfirmationNumber {
        // `next` never leaves 0..=MAX_CONFIRMATION
        ConfirmationNumber::new(self.next).unwrap_or(ConfirmationNumber::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(n: u32) -> ConfirmationNumber {
        ConfirmationNumber::new(n).unwrap()
    }

    #[test]
    fn issues_strictly_increasing() {
        let mut counter = ConfirmationCounter::new();
        let issued: Vec<u32> = (0..5).map(|_| counter.issue().get()).collect();
        assert_eq!(issued, vec![0, 1, 2, 3, 4]);
        assert_eq!(counter.peek(), 5);
    }

    #[test]
    fn wraps_after_max() {
        let mut counter = ConfirmationCounter::new();
        counter.reset(MAX_CONFIRMATION).unwrap();
        assert_eq!(counter.issue(), ConfirmationNumber::MAX);
        assert_eq!(counter.issue().get(), 0);
        assert_eq!(counter.issue().get(), 1);
    }

    #[test]
    fn observe_only_moves_forward() {
        let mut counter = ConfirmationCounter::new();
        counter.observe(conf(41));
        assert_eq!(counter.peek(), 42);
        counter.observe(conf(7));
        assert_eq!(counter.peek(), 42);
        counter.observe(ConfirmationNumber::MAX);
        assert_eq!(counter.peek(), 0);
    }

    #[test]
    fn reset_rejects_out_of_range() {
        let mut counter = ConfirmationCounter::new();
        assert!(counter.reset(MAX_CONFIRMATION + 1).is_err());
        assert_eq!(counter.peek(), 0);
        counter.reset(500).unwrap();
        assert_eq!(counter.issue().get(), 500);
    }

    #[test]
    fn restore_undoes_issue() {
        let mut counter = ConfirmationCounter::new();
        counter.issue();
        let mark = counter.mark();
        assert_eq!(counter.issue().get(), 1);
        counter.restore(mark);
        assert_eq!(counter.issue().get(), 1);
    }
}
