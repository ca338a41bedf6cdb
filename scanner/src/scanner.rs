//! The cycle orchestrator.
//!
//! One [`BlockScanner`] owns one chain: its cursor, its seen-set, its
//! height cache and its view of the stores. A cycle walks new blocks in
//! strictly ascending order, credits deposits and withdrawal confirmations,
//! re-evaluates confirmation gating as the cursor advances, polls approval
//! verdicts for pending deposits and finishes with a pass over the
//! unconfirmed pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, TryLockError};
use std::time::Instant;

use nxgate_store::{AddressBook, CursorStore, DepositStore, NewDeposit, WithdrawalStore};
use nxgate_types::{
    Block, CandidateDeposit, ChainCursor, ChainId, CurrencyCode, CurrencyProfile, DepositStatus,
    RawTransaction, TxId, WithdrawalMatch,
};
use tracing::{debug, error, info, info_span, warn};

use crate::classifier::classify_batch;
use crate::config::ScannerConfig;
use crate::deposits::extract_deposits;
use crate::error::ScanError;
use crate::facade::LedgerFacade;
use crate::height_cache::HeightCache;
use crate::lifecycle::{meets_threshold, on_confirmation, on_phasing_verdict};
use crate::mempool::MempoolSeenSet;
use crate::metrics::ScannerMetrics;
use crate::withdrawals::match_withdrawals;

/// Blocks reconciled per cycle when the caller does not say otherwise;
/// roughly one hour of NXT block production.
pub const DEFAULT_BLOCKS_PER_CYCLE: u64 = 6;

/// The storage collaborators of one scanner.
#[derive(Clone)]
pub struct StoreSet {
    pub deposits: Arc<dyn DepositStore>,
    pub withdrawals: Arc<dyn WithdrawalStore>,
    pub addresses: Arc<dyn AddressBook>,
    pub cursors: Arc<dyn CursorStore>,
}

impl StoreSet {
    /// Wires every role to one backend, the common case for the in-memory
    /// store.
    pub fn single<S>(store: Arc<S>) -> Self
    where
        S: DepositStore + WithdrawalStore + AddressBook + CursorStore + 'static,
    {
        StoreSet {
            deposits: store.clone(),
            withdrawals: store.clone(),
            addresses: store.clone(),
            cursors: store,
        }
    }
}

/// Tallies of one cycle, logged on completion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    pub blocks_scanned: u64,
    pub deposits_created: u64,
    pub withdrawals_matched: u64,
    pub pool_candidates: u64,
}

pub struct BlockScanner {
    chain: ChainId,
    min_confirmations: u64,
    profiles: Vec<CurrencyProfile>,
    facade: Arc<dyn LedgerFacade>,
    stores: StoreSet,
    metrics: Arc<ScannerMetrics>,
    cursor: ChainCursor,
    seen: MempoolSeenSet,
    height_cache: HeightCache,
    stop: Arc<AtomicBool>,
}

impl BlockScanner {
    /// Builds a scanner from validated configuration, resuming from the
    /// durable cursor when one exists.
    pub fn new(
        config: &ScannerConfig,
        facade: Arc<dyn LedgerFacade>,
        stores: StoreSet,
        metrics: Arc<ScannerMetrics>,
    ) -> Result<Self, ScanError> {
        config.validate()?;
        let profiles = config.profiles()?;
        let chain = config.chain();
        let start = stores.cursors.load(&chain)?.unwrap_or(0);
        metrics.cursor_height.set(start as i64);
        Ok(BlockScanner {
            chain,
            min_confirmations: config.min_confirmations,
            profiles,
            facade,
            stores,
            metrics,
            cursor: ChainCursor::new(start),
            seen: MempoolSeenSet::new(config.mempool_capacity),
            height_cache: HeightCache::new(config.height_ttl()),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn chain(&self) -> &ChainId {
        &self.chain
    }

    pub fn cursor_height(&self) -> u64 {
        self.cursor.height()
    }

    /// Cloneable flag that ends the block loop at the next boundary.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Runs one reconciliation cycle. Never raises: failures are reported
    /// to the log and the error counter, and the next cycle resumes from
    /// the last durable cursor.
    pub fn run_cycle(&mut self, blocks_per_cycle: u64, force: bool) {
        let span = info_span!("scan_cycle", chain = %self.chain);
        let _guard = span.enter();
        let started = Instant::now();
        match self.cycle(blocks_per_cycle, force) {
            Ok(stats) => {
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                self.metrics.cycle_duration_ms.observe(elapsed_ms);
                info!(
                    blocks = stats.blocks_scanned,
                    deposits = stats.deposits_created,
                    withdrawals = stats.withdrawals_matched,
                    pool = stats.pool_candidates,
                    cursor = self.cursor.height(),
                    "scan cycle finished"
                );
            }
            Err(err) => {
                self.metrics.cycle_errors.inc();
                error!(error = %err, cursor = self.cursor.height(), "scan cycle failed");
            }
        }
    }

    fn cycle(&mut self, blocks_per_cycle: u64, force: bool) -> Result<CycleStats, ScanError> {
        let mut stats = CycleStats::default();
        let latest = self.latest_height()?;
        self.metrics.chain_height.set(latest as i64);

        // No block the scanner could reach would be deeply buried enough to
        // matter, so spare the node the block queries.
        if self.cursor.height().saturating_add(self.min_confirmations) >= latest && !force {
            info!(
                cursor = self.cursor.height(),
                latest, "no newly finalized blocks, running pool pass only"
            );
            self.metrics.cycles_skipped.inc();
            self.pool_pass(&mut stats)?;
            return Ok(stats);
        }

        let to_block = latest.min(self.cursor.height().saturating_add(blocks_per_cycle));
        let mut height = self.cursor.height();
        while height <= to_block {
            if self.stop.load(Ordering::Relaxed) {
                info!(height, "stop requested, ending cycle at block boundary");
                return Ok(stats);
            }
            self.scan_block(height, &mut stats)?;
            height += 1;
        }

        self.phasing_pass()?;
        self.pool_pass(&mut stats)?;
        Ok(stats)
    }

    fn latest_height(&mut self) -> Result<u64, ScanError> {
        let now = Instant::now();
        if let Some(height) = self.height_cache.get(now) {
            return Ok(height);
        }
        let height = self.facade.latest_height()?;
        self.height_cache.put(height, now);
        Ok(height)
    }

    /// Reconciles one height. Fetch problems skip the height (the node may
    /// be transiently behind); everything after a successful fetch is
    /// cycle-fatal so the cursor never advances past unpersisted work.
    fn scan_block(&mut self, height: u64, stats: &mut CycleStats) -> Result<(), ScanError> {
        let span = info_span!("scan_block", chain = %self.chain, height);
        let _guard = span.enter();

        let Some(block) = self.fetch_block(height) else {
            self.metrics.block_fetch_failures.inc();
            return Ok(());
        };

        let batch = classify_batch(&block.transactions);
        self.metrics.malformed_transactions.inc_by(batch.malformed);

        let extracted = extract_deposits(
            &batch.transfers,
            Some(height),
            &self.profiles,
            self.stores.addresses.as_ref(),
        )?;
        self.metrics
            .deposits_below_minimum
            .inc_by(extracted.below_minimum);
        for candidate in extracted.candidates {
            if self.apply_candidate(candidate)? {
                stats.deposits_created += 1;
            }
        }

        let matches = match_withdrawals(
            &batch.transfers,
            height,
            &self.profiles,
            self.stores.withdrawals.as_ref(),
        )?;
        for matched in matches {
            self.apply_withdrawal(matched)?;
            stats.withdrawals_matched += 1;
        }

        // Durable cursor first: the in-memory position must never run
        // ahead of what a restart would resume from.
        self.stores.cursors.save(&self.chain, height)?;
        self.cursor.advance_to(height);
        self.metrics.cursor_height.set(height as i64);
        self.metrics.blocks_scanned.inc();
        stats.blocks_scanned += 1;

        self.confirmation_pass(height)?;
        Ok(())
    }

    fn fetch_block(&self, height: u64) -> Option<Block> {
        let id = match self.facade.block_hash_at(height) {
            Ok(Some(id)) if !id.is_empty() => id,
            Ok(_) => {
                debug!(height, "no block id at height yet, skipping");
                return None;
            }
            Err(err) => {
                warn!(height, error = %err, "block id fetch failed, skipping height");
                return None;
            }
        };
        match self.facade.block_by_hash(&id) {
            Ok(Some(block)) => Some(block),
            Ok(None) => {
                debug!(height, block = %id, "empty block response, skipping height");
                None
            }
            Err(err) => {
                warn!(height, block = %id, error = %err, "block fetch failed, skipping height");
                None
            }
        }
    }

    /// Persists one candidate deposit. Returns whether a record was
    /// created (as opposed to refreshed).
    fn apply_candidate(&self, candidate: CandidateDeposit) -> Result<bool, ScanError> {
        let profile = self.profile(&candidate.currency)?;
        let amount = candidate.amount.to_decimal(profile.scale)?;
        let outcome = self.stores.deposits.upsert(NewDeposit {
            txid: candidate.txid.clone(),
            address: candidate.address,
            currency: candidate.currency.clone(),
            amount,
            block_number: candidate.block_number,
            phased: candidate.phased,
        })?;
        if outcome.created {
            self.metrics.deposits_created.inc();
            info!(
                txid = %candidate.txid,
                currency = %candidate.currency,
                amount = %amount,
                block = ?candidate.block_number,
                phased = candidate.phased,
                "deposit sighted"
            );
        }
        Ok(outcome.created)
    }

    fn apply_withdrawal(&self, matched: WithdrawalMatch) -> Result<(), ScanError> {
        let profile = self.profile(&matched.currency)?;
        let amount = matched.amount.to_decimal(profile.scale)?;
        self.stores.withdrawals.attach_confirmation(
            &matched.currency,
            &matched.txid,
            matched.block_number,
            amount,
            matched.recipient.clone(),
        )?;
        info!(
            txid = %matched.txid,
            currency = %matched.currency,
            amount = %amount,
            block = matched.block_number,
            "withdrawal sighted on-chain"
        );
        Ok(())
    }

    /// Re-evaluates confirmation gating for everything non-terminal now
    /// that `height` is reconciled. This is what eventually moves a deposit
    /// sighted blocks ago: gating is measured against the reconciled
    /// height, never the unverified tip.
    fn confirmation_pass(&self, height: u64) -> Result<(), ScanError> {
        for deposit in self.stores.deposits.with_status(DepositStatus::Unconfirmed)? {
            let Some(block) = deposit.block_number else {
                continue;
            };
            if !meets_threshold(height, block, self.min_confirmations) {
                continue;
            }
            for &next in on_confirmation(deposit.status, deposit.phased) {
                self.stores
                    .deposits
                    .transition(&deposit.currency, &deposit.txid, next)?;
            }
            if deposit.phased {
                info!(
                    txid = %deposit.txid,
                    currency = %deposit.currency,
                    "deposit confirmed, awaiting approval verdict"
                );
            } else {
                self.metrics.deposits_collected.inc();
                info!(
                    txid = %deposit.txid,
                    currency = %deposit.currency,
                    "deposit confirmed and collected"
                );
            }
        }

        for withdrawal in self.stores.withdrawals.confirming()? {
            let Some(block) = withdrawal.block_number else {
                continue;
            };
            if !meets_threshold(height, block, self.min_confirmations) {
                continue;
            }
            self.stores
                .withdrawals
                .mark_succeeded(&withdrawal.currency, &withdrawal.txid)?;
            self.metrics.withdrawals_confirmed.inc();
            info!(
                txid = %withdrawal.txid,
                currency = %withdrawal.currency,
                "withdrawal confirmed"
            );
        }
        Ok(())
    }

    /// Polls approval verdicts for deposits parked in `Pending`.
    fn phasing_pass(&self) -> Result<(), ScanError> {
        for deposit in self.stores.deposits.with_status(DepositStatus::Pending)? {
            let verdict = self.facade.phasing_status(&deposit.txid)?;
            for &next in on_phasing_verdict(deposit.status, verdict) {
                self.stores
                    .deposits
                    .transition(&deposit.currency, &deposit.txid, next)?;
            }
            match verdict {
                Some(true) => {
                    self.metrics.deposits_collected.inc();
                    info!(
                        txid = %deposit.txid,
                        currency = %deposit.currency,
                        "phased deposit approved and collected"
                    );
                }
                Some(false) => {
                    self.metrics.deposits_rejected.inc();
                    info!(
                        txid = %deposit.txid,
                        currency = %deposit.currency,
                        "phased deposit rejected"
                    );
                }
                None => {
                    debug!(txid = %deposit.txid, "approval still undecided");
                }
            }
        }
        Ok(())
    }

    /// Applies fresh unconfirmed-pool transactions eagerly (deposits become
    /// visible before their first confirmation), then replaces the seen-set
    /// with the full current pool.
    fn pool_pass(&mut self, stats: &mut CycleStats) -> Result<(), ScanError> {
        let pool = self.facade.unconfirmed_transactions()?;
        let fresh: Vec<&RawTransaction> = pool
            .iter()
            .filter(|tx| !self.seen.contains(&TxId::normalized(&tx.id)))
            .collect();
        let batch = classify_batch(fresh.iter().copied());
        self.metrics.malformed_transactions.inc_by(batch.malformed);

        let extracted = extract_deposits(
            &batch.transfers,
            None,
            &self.profiles,
            self.stores.addresses.as_ref(),
        )?;
        self.metrics
            .deposits_below_minimum
            .inc_by(extracted.below_minimum);
        for candidate in extracted.candidates {
            stats.pool_candidates += 1;
            if self.apply_candidate(candidate)? {
                stats.deposits_created += 1;
            }
        }

        self.seen
            .replace(pool.iter().map(|tx| TxId::normalized(&tx.id)));
        self.metrics.mempool_seen.set(self.seen.len() as i64);
        Ok(())
    }

    fn profile(&self, code: &CurrencyCode) -> Result<&CurrencyProfile, ScanError> {
        self.profiles
            .iter()
            .find(|profile| &profile.code == code)
            .ok_or_else(|| ScanError::Config(format!("no profile for currency {code}")))
    }
}

/// Shared handle enforcing at most one cycle in flight per chain.
#[derive(Clone)]
pub struct ScanHandle {
    inner: Arc<Mutex<BlockScanner>>,
}

impl ScanHandle {
    pub fn new(scanner: BlockScanner) -> Self {
        ScanHandle {
            inner: Arc::new(Mutex::new(scanner)),
        }
    }

    /// Runs a cycle unless one is already in flight. Returns whether this
    /// trigger ran.
    pub fn try_run_cycle(&self, blocks_per_cycle: u64, force: bool) -> bool {
        match self.inner.try_lock() {
            Ok(mut scanner) => {
                scanner.run_cycle(blocks_per_cycle, force);
                true
            }
            Err(TryLockError::WouldBlock) => {
                warn!("scan cycle already in flight, skipping trigger");
                false
            }
            Err(TryLockError::Poisoned(_)) => {
                error!("scanner lock poisoned, skipping trigger");
                false
            }
        }
    }
}
