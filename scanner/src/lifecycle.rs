//! Confirmation gating and the transition tables of the deposit lifecycle.
//!
//! All functions here are pure. The scanner asks two questions per record:
//! has its block enough confirmations under the reconciled height, and
//! which transition chain applies. Transition chains come back as slices
//! because acceptance and collection are one atomic step in this engine,
//! not two asynchronous ones.

use nxgate_types::DepositStatus;

/// Confirmation depth of a block under the reconciled height.
pub fn confirmations(reconciled_height: u64, block_number: u64) -> u64 {
    reconciled_height.saturating_sub(block_number)
}

/// Whether a block is buried deeply enough.
pub fn meets_threshold(reconciled_height: u64, block_number: u64, min_confirmations: u64) -> bool {
    confirmations(reconciled_height, block_number) >= min_confirmations
}

/// Transition chain for a deposit whose block has just met the threshold.
/// Phased deposits park in `Pending` for the approval verdict; everything
/// else clears straight through. Empty when the status says nothing should
/// move.
pub fn on_confirmation(status: DepositStatus, phased: bool) -> &'static [DepositStatus] {
    match (status, phased) {
        (DepositStatus::Unconfirmed, true) => &[DepositStatus::Pending],
        (DepositStatus::Unconfirmed, false) => {
            &[DepositStatus::Accepted, DepositStatus::Collected]
        }
        _ => &[],
    }
}

/// Transition chain for a pending deposit given an approval verdict.
/// An undecided verdict (`None`) moves nothing; the deposit is polled
/// again next cycle.
pub fn on_phasing_verdict(
    status: DepositStatus,
    approved: Option<bool>,
) -> &'static [DepositStatus] {
    match (status, approved) {
        (DepositStatus::Pending, Some(true)) => {
            &[DepositStatus::Accepted, DepositStatus::Collected]
        }
        (DepositStatus::Pending, Some(false)) => &[DepositStatus::Rejected],
        _ => &[],
    }
}
