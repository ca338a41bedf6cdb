//! In-memory backend for all four storage traits.
//!
//! Backs the test suites and light single-process deployments. State is
//! lost on restart; with a durable backend unavailable the next run simply
//! rescans from height zero and the upsert idempotence absorbs the overlap.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use nxgate_types::{
    AccountId, ChainId, CurrencyCode, DepositRecord, DepositStatus, TxId, WithdrawalRecord,
    WithdrawalStatus,
};
use rust_decimal::Decimal;

use crate::address::AddressBook;
use crate::cursor::CursorStore;
use crate::deposit::{DepositStore, NewDeposit, UpsertOutcome};
use crate::error::StoreError;
use crate::withdrawal::WithdrawalStore;

#[derive(Debug, Default)]
struct Inner {
    deposits: HashMap<(CurrencyCode, TxId), DepositRecord>,
    withdrawals: HashMap<(CurrencyCode, TxId), WithdrawalRecord>,
    addresses: HashSet<(CurrencyCode, AccountId)>,
    cursors: HashMap<ChainId, u64>,
}

/// One map per record family behind a single lock. The `(currency, txid)`
/// map keys make the deposit uniqueness invariant structural rather than
/// checked.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Registers a payment address for a currency. Used by tests and by
    /// embedders that preload the book at startup. Addresses are expected
    /// in canonical form.
    pub fn register_address(
        &self,
        currency: CurrencyCode,
        address: AccountId,
    ) -> Result<(), StoreError> {
        self.lock()?.addresses.insert((currency, address));
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

impl DepositStore for MemoryStore {
    fn upsert(&self, new: NewDeposit) -> Result<UpsertOutcome, StoreError> {
        let mut inner = self.lock()?;
        let key = (new.currency.clone(), new.txid.clone());
        if let Some(record) = inner.deposits.get_mut(&key) {
            // A pool re-sighting carries no block number and must not erase
            // the one a previous block sighting recorded.
            if new.block_number.is_some() {
                record.block_number = new.block_number;
            }
            record.phased = new.phased;
            return Ok(UpsertOutcome {
                record: record.clone(),
                created: false,
            });
        }
        let record = DepositRecord {
            txid: new.txid,
            address: new.address,
            currency: new.currency,
            amount: new.amount,
            block_number: new.block_number,
            phased: new.phased,
            status: DepositStatus::Unconfirmed,
        };
        inner.deposits.insert(key, record.clone());
        Ok(UpsertOutcome {
            record,
            created: true,
        })
    }

    fn get(
        &self,
        currency: &CurrencyCode,
        txid: &TxId,
    ) -> Result<Option<DepositRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .deposits
            .get(&(currency.clone(), txid.clone()))
            .cloned())
    }

    fn with_status(&self, status: DepositStatus) -> Result<Vec<DepositRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .deposits
            .values()
            .filter(|record| record.status == status)
            .cloned()
            .collect())
    }

    fn transition(
        &self,
        currency: &CurrencyCode,
        txid: &TxId,
        to: DepositStatus,
    ) -> Result<DepositRecord, StoreError> {
        let mut inner = self.lock()?;
        let record = inner
            .deposits
            .get_mut(&(currency.clone(), txid.clone()))
            .ok_or_else(|| StoreError::NotFound(format!("deposit {currency}/{txid}")))?;
        if !record.status.can_transition_to(to) {
            return Err(StoreError::InvalidTransition {
                from: record.status,
                to,
            });
        }
        record.status = to;
        Ok(record.clone())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.deposits.len())
    }
}

impl WithdrawalStore for MemoryStore {
    fn insert(&self, record: WithdrawalRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let key = (record.currency.clone(), record.txid.clone());
        match inner.withdrawals.entry(key) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(format!(
                "withdrawal {}/{}",
                record.currency, record.txid
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    fn find_confirming(
        &self,
        currency: &CurrencyCode,
        txid: &TxId,
    ) -> Result<Option<WithdrawalRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .withdrawals
            .get(&(currency.clone(), txid.clone()))
            .filter(|record| record.status == WithdrawalStatus::Confirming)
            .cloned())
    }

    fn confirming(&self) -> Result<Vec<WithdrawalRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .withdrawals
            .values()
            .filter(|record| record.status == WithdrawalStatus::Confirming)
            .cloned()
            .collect())
    }

    fn attach_confirmation(
        &self,
        currency: &CurrencyCode,
        txid: &TxId,
        block_number: u64,
        amount: Decimal,
        recipient: AccountId,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let record = inner
            .withdrawals
            .get_mut(&(currency.clone(), txid.clone()))
            .ok_or_else(|| StoreError::NotFound(format!("withdrawal {currency}/{txid}")))?;
        // Re-sighting a withdrawal that already succeeded (block rescan
        // after a crash) is a no-op, not an error.
        if record.status.is_terminal() {
            return Ok(());
        }
        record.block_number = Some(block_number);
        record.amount = Some(amount);
        record.recipient = Some(recipient);
        Ok(())
    }

    fn mark_succeeded(&self, currency: &CurrencyCode, txid: &TxId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let record = inner
            .withdrawals
            .get_mut(&(currency.clone(), txid.clone()))
            .ok_or_else(|| StoreError::NotFound(format!("withdrawal {currency}/{txid}")))?;
        record.status = WithdrawalStatus::Succeeded;
        Ok(())
    }
}

impl AddressBook for MemoryStore {
    fn is_payment_address(
        &self,
        currency: &CurrencyCode,
        address: &AccountId,
    ) -> Result<bool, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .addresses
            .contains(&(currency.clone(), address.clone())))
    }
}

impl CursorStore for MemoryStore {
    fn load(&self, chain: &ChainId) -> Result<Option<u64>, StoreError> {
        Ok(self.lock()?.cursors.get(chain).copied())
    }

    fn save(&self, chain: &ChainId, height: u64) -> Result<(), StoreError> {
        self.lock()?.cursors.insert(chain.clone(), height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nxt() -> CurrencyCode {
        CurrencyCode::new("nxt")
    }

    fn sighting(txid: &str, block: Option<u64>) -> NewDeposit {
        NewDeposit {
            txid: TxId::normalized(txid),
            address: AccountId::normalized("NXT-ABCD-EFGH-IJKL-MNOPQ"),
            currency: nxt(),
            amount: Decimal::new(15, 1),
            block_number: block,
            phased: false,
        }
    }

    #[test]
    fn upsert_creates_unconfirmed() {
        let store = MemoryStore::new();
        let outcome = store.upsert(sighting("1", Some(96))).unwrap();
        assert!(outcome.created);
        assert_eq!(outcome.record.status, DepositStatus::Unconfirmed);
        assert_eq!(outcome.record.block_number, Some(96));
    }

    #[test]
    fn upsert_is_idempotent_on_currency_txid() {
        let store = MemoryStore::new();
        assert!(store.upsert(sighting("1", Some(96))).unwrap().created);
        assert!(!store.upsert(sighting("1", Some(96))).unwrap().created);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn same_txid_under_another_currency_is_a_distinct_record() {
        let store = MemoryStore::new();
        store.upsert(sighting("1", Some(96))).unwrap();
        let mut other = sighting("1", Some(96));
        other.currency = CurrencyCode::new("beta");
        store.upsert(other).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn pool_resighting_keeps_block_number() {
        let store = MemoryStore::new();
        store.upsert(sighting("1", Some(96))).unwrap();
        let outcome = store.upsert(sighting("1", None)).unwrap();
        assert_eq!(outcome.record.block_number, Some(96));
    }

    #[test]
    fn block_sighting_fills_in_block_number() {
        let store = MemoryStore::new();
        store.upsert(sighting("1", None)).unwrap();
        let outcome = store.upsert(sighting("1", Some(97))).unwrap();
        assert_eq!(outcome.record.block_number, Some(97));
    }

    #[test]
    fn upsert_never_touches_status() {
        let store = MemoryStore::new();
        store.upsert(sighting("1", Some(96))).unwrap();
        store
            .transition(&nxt(), &TxId::normalized("1"), DepositStatus::Accepted)
            .unwrap();
        let outcome = store.upsert(sighting("1", Some(96))).unwrap();
        assert_eq!(outcome.record.status, DepositStatus::Accepted);
    }

    #[test]
    fn transition_walks_the_state_machine() {
        let store = MemoryStore::new();
        store.upsert(sighting("1", Some(96))).unwrap();
        let txid = TxId::normalized("1");
        store
            .transition(&nxt(), &txid, DepositStatus::Accepted)
            .unwrap();
        let record = store
            .transition(&nxt(), &txid, DepositStatus::Collected)
            .unwrap();
        assert_eq!(record.status, DepositStatus::Collected);
    }

    #[test]
    fn illegal_transition_is_refused() {
        let store = MemoryStore::new();
        store.upsert(sighting("1", Some(96))).unwrap();
        let err = store
            .transition(&nxt(), &TxId::normalized("1"), DepositStatus::Collected)
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidTransition {
                from: DepositStatus::Unconfirmed,
                to: DepositStatus::Collected,
            }
        );
    }

    #[test]
    fn terminal_record_cannot_move() {
        let store = MemoryStore::new();
        store.upsert(sighting("1", Some(96))).unwrap();
        let txid = TxId::normalized("1");
        store
            .transition(&nxt(), &txid, DepositStatus::Pending)
            .unwrap();
        store
            .transition(&nxt(), &txid, DepositStatus::Rejected)
            .unwrap();
        assert!(matches!(
            store.transition(&nxt(), &txid, DepositStatus::Accepted),
            Err(StoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn transition_of_unknown_deposit_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.transition(&nxt(), &TxId::normalized("404"), DepositStatus::Accepted),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn with_status_filters() {
        let store = MemoryStore::new();
        store.upsert(sighting("1", Some(96))).unwrap();
        store.upsert(sighting("2", Some(96))).unwrap();
        store
            .transition(&nxt(), &TxId::normalized("2"), DepositStatus::Pending)
            .unwrap();
        let unconfirmed = store.with_status(DepositStatus::Unconfirmed).unwrap();
        assert_eq!(unconfirmed.len(), 1);
        assert_eq!(unconfirmed[0].txid, TxId::normalized("1"));
    }

    #[test]
    fn address_book_membership_is_per_currency() {
        let store = MemoryStore::new();
        let address = AccountId::normalized("NXT-AAAA");
        store.register_address(nxt(), address.clone()).unwrap();
        assert!(store.is_payment_address(&nxt(), &address).unwrap());
        assert!(!store
            .is_payment_address(&CurrencyCode::new("beta"), &address)
            .unwrap());
        assert!(!store
            .is_payment_address(&nxt(), &AccountId::normalized("NXT-BBBB"))
            .unwrap());
    }

    #[test]
    fn withdrawal_insert_refuses_duplicates() {
        let store = MemoryStore::new();
        let record = WithdrawalRecord::confirming(TxId::normalized("9"), nxt());
        store.insert(record.clone()).unwrap();
        assert!(matches!(
            store.insert(record),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn attach_confirmation_sets_chain_metadata() {
        let store = MemoryStore::new();
        let txid = TxId::normalized("9");
        store
            .insert(WithdrawalRecord::confirming(txid.clone(), nxt()))
            .unwrap();
        store
            .attach_confirmation(
                &nxt(),
                &txid,
                96,
                Decimal::new(15, 1),
                AccountId::normalized("NXT-RECIPIENT"),
            )
            .unwrap();
        let record = store.find_confirming(&nxt(), &txid).unwrap().unwrap();
        assert_eq!(record.block_number, Some(96));
        assert_eq!(record.amount, Some(Decimal::new(15, 1)));
    }

    #[test]
    fn attach_after_success_is_a_noop() {
        let store = MemoryStore::new();
        let txid = TxId::normalized("9");
        store
            .insert(WithdrawalRecord::confirming(txid.clone(), nxt()))
            .unwrap();
        store.mark_succeeded(&nxt(), &txid).unwrap();
        store
            .attach_confirmation(
                &nxt(),
                &txid,
                200,
                Decimal::ONE,
                AccountId::normalized("NXT-LATE"),
            )
            .unwrap();
        assert!(store.find_confirming(&nxt(), &txid).unwrap().is_none());
        assert!(store.confirming().unwrap().is_empty());
    }

    #[test]
    fn cursor_round_trips_per_chain() {
        let store = MemoryStore::new();
        let chain = ChainId::new("nxt-mainnet");
        assert_eq!(store.load(&chain).unwrap(), None);
        store.save(&chain, 96).unwrap();
        store.save(&chain, 99).unwrap();
        assert_eq!(store.load(&chain).unwrap(), Some(99));
        assert_eq!(store.load(&ChainId::new("other")).unwrap(), None);
    }
}
