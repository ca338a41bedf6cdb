use nxgate_types::{AccountId, CurrencyCode};

use crate::error::StoreError;

/// Lookup over the payment addresses the system hands out to depositors.
///
/// Address generation and ownership live outside this engine; the scanner
/// only needs membership: is this recipient one of ours, for this currency?
/// Callers pass addresses in canonical (normalized) form.
pub trait AddressBook: Send + Sync {
    fn is_payment_address(
        &self,
        currency: &CurrencyCode,
        address: &AccountId,
    ) -> Result<bool, StoreError>;
}
