/// Custom actions for User entities.
///
/// Both change the score balance relative to its current value, unlike
/// `UserUpdate` which overwrites it.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// Adds to the score. No upper bound beyond the integer range.
    ChargeScore(u64),
    /// Subtracts from the score.
    ///
    /// # Errors
    /// Fails if the amount exceeds the current score.
    DebitScore(u64),
}
