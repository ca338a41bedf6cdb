//! Prometheus metrics for the scanning engine.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Histogram, HistogramOpts, IntCounter, IntGauge, Opts,
    Registry,
};

/// All engine metrics, registered on one registry the embedding service can
/// expose for scraping.
pub struct ScannerMetrics {
    pub registry: Registry,

    pub blocks_scanned: IntCounter,
    pub block_fetch_failures: IntCounter,
    pub deposits_created: IntCounter,
    pub deposits_collected: IntCounter,
    pub deposits_rejected: IntCounter,
    pub deposits_below_minimum: IntCounter,
    pub malformed_transactions: IntCounter,
    pub withdrawals_confirmed: IntCounter,
    pub cycle_errors: IntCounter,
    pub cycles_skipped: IntCounter,

    pub chain_height: IntGauge,
    pub cursor_height: IntGauge,
    pub mempool_seen: IntGauge,

    pub cycle_duration_ms: Histogram,
}

impl ScannerMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let blocks_scanned = register_int_counter_with_registry!(
            Opts::new("nxgate_blocks_scanned_total", "Blocks fully reconciled"),
            registry
        )
        .expect("failed to register nxgate_blocks_scanned_total");

        let block_fetch_failures = register_int_counter_with_registry!(
            Opts::new(
                "nxgate_block_fetch_failures_total",
                "Heights skipped because the block id or body could not be fetched"
            ),
            registry
        )
        .expect("failed to register nxgate_block_fetch_failures_total");

        let deposits_created = register_int_counter_with_registry!(
            Opts::new("nxgate_deposits_created_total", "Deposit records created"),
            registry
        )
        .expect("failed to register nxgate_deposits_created_total");

        let deposits_collected = register_int_counter_with_registry!(
            Opts::new(
                "nxgate_deposits_collected_total",
                "Deposits that reached collected status"
            ),
            registry
        )
        .expect("failed to register nxgate_deposits_collected_total");

        let deposits_rejected = register_int_counter_with_registry!(
            Opts::new(
                "nxgate_deposits_rejected_total",
                "Phased deposits rejected by their approval verdict"
            ),
            registry
        )
        .expect("failed to register nxgate_deposits_rejected_total");

        let deposits_below_minimum = register_int_counter_with_registry!(
            Opts::new(
                "nxgate_deposits_below_minimum_total",
                "Candidate deposits dropped at or below the currency minimum"
            ),
            registry
        )
        .expect("failed to register nxgate_deposits_below_minimum_total");

        let malformed_transactions = register_int_counter_with_registry!(
            Opts::new(
                "nxgate_malformed_transactions_total",
                "Transactions dropped because a recognized shape had broken fields"
            ),
            registry
        )
        .expect("failed to register nxgate_malformed_transactions_total");

        let withdrawals_confirmed = register_int_counter_with_registry!(
            Opts::new(
                "nxgate_withdrawals_confirmed_total",
                "Withdrawals promoted to succeeded"
            ),
            registry
        )
        .expect("failed to register nxgate_withdrawals_confirmed_total");

        let cycle_errors = register_int_counter_with_registry!(
            Opts::new("nxgate_cycle_errors_total", "Scan cycles that failed"),
            registry
        )
        .expect("failed to register nxgate_cycle_errors_total");

        let cycles_skipped = register_int_counter_with_registry!(
            Opts::new(
                "nxgate_cycles_skipped_total",
                "Cycles that ran only the pool pass because no newly finalized blocks existed"
            ),
            registry
        )
        .expect("failed to register nxgate_cycles_skipped_total");

        let chain_height = register_int_gauge_with_registry!(
            Opts::new("nxgate_chain_height", "Tip height last reported by the node"),
            registry
        )
        .expect("failed to register nxgate_chain_height");

        let cursor_height = register_int_gauge_with_registry!(
            Opts::new("nxgate_cursor_height", "Height reconciled through"),
            registry
        )
        .expect("failed to register nxgate_cursor_height");

        let mempool_seen = register_int_gauge_with_registry!(
            Opts::new(
                "nxgate_mempool_seen",
                "Size of the unconfirmed-pool seen-set after the last pass"
            ),
            registry
        )
        .expect("failed to register nxgate_mempool_seen");

        let cycle_duration_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "nxgate_cycle_duration_ms",
                "Wall time of one scan cycle in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(1.0, 2.0, 14).expect("valid buckets")),
            registry
        )
        .expect("failed to register nxgate_cycle_duration_ms");

        ScannerMetrics {
            registry,
            blocks_scanned,
            block_fetch_failures,
            deposits_created,
            deposits_collected,
            deposits_rejected,
            deposits_below_minimum,
            malformed_transactions,
            withdrawals_confirmed,
            cycle_errors,
            cycles_skipped,
            chain_height,
            cursor_height,
            mempool_seen,
            cycle_duration_ms,
        }
    }
}

impl Default for ScannerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_metric_family() {
        let metrics = ScannerMetrics::new();
        metrics.blocks_scanned.inc();
        metrics.chain_height.set(100);
        metrics.cycle_duration_ms.observe(12.0);
        assert_eq!(metrics.registry.gather().len(), 14);
    }

    #[test]
    fn counters_accumulate() {
        let metrics = ScannerMetrics::new();
        metrics.deposits_created.inc();
        metrics.deposits_created.inc();
        assert_eq!(metrics.deposits_created.get(), 2);
    }
}
