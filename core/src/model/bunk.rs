use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BunkrError;

/// Allowance reported by the closed form for a ledger with no history,
/// where the attendance ratio is undefined.
pub const FRESH_LEDGER_ALLOWANCE: u32 = 10;

/// An attendance threshold in whole percent, always within `1..=100`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct TargetPercent(u8);

impl TargetPercent {
    pub const SAFE: TargetPercent = TargetPercent(75);
    pub const MINIMUM: TargetPercent = TargetPercent(50);

    pub fn new(value: i64) -> Result<Self, BunkrError> {
        if (1..=100).contains(&value) {
            Ok(TargetPercent(value as u8))
        } else {
            Err(BunkrError::InvalidTarget(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for TargetPercent {
    type Error = BunkrError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TargetPercent::new(i64::from(value))
    }
}

impl From<TargetPercent> for u8 {
    fn from(target: TargetPercent) -> u8 {
        target.0
    }
}

impl fmt::Display for TargetPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Exact-ratio check: `attended / total * 100 >= target`, without floats.
pub fn ratio_meets(attended: u64, total: u64, target: TargetPercent) -> bool {
    if total == 0 {
        return true;
    }
    attended * 100 >= u64::from(target.get()) * total
}

/// Reference semantics: add one absence at a time and count how many the
/// ratio survives. Linear in the answer, so it only backs the tests that
/// pin [`allowance_closed_form`] down.
#[cfg(test)]
pub(crate) fn allowance_iterative(attended: u32, missed: u32, target: TargetPercent) -> u32 {
    let attended = u64::from(attended);
    let base = attended + u64::from(missed);
    let mut extra: u64 = 0;

    while ratio_meets(attended, base + extra + 1, target) {
        extra += 1;
    }

    extra.min(u64::from(u32::MAX)) as u32
}

/// Largest number of extra absences that keeps the exact ratio at or above
/// `target`, in constant time.
/// Returns [`FRESH_LEDGER_ALLOWANCE`] when nothing has been recorded yet.
pub fn allowance_closed_form(attended: u32, missed: u32, target: TargetPercent) -> u32 {
    let attended = u64::from(attended);
    let total = attended + u64::from(missed);
    if total == 0 {
        return FRESH_LEDGER_ALLOWANCE;
    }

    let max_total = attended * 100 / u64::from(target.get());
    max_total
        .saturating_sub(total)
        .min(u64::from(u32::MAX)) as u32
}
