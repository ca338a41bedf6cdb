//! Engine configuration, loaded from TOML.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use nxgate_types::{AssetVariant, ChainId, CurrencyCode, CurrencyProfile, NativeAmount, MAX_SCALE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Scanner configuration for one chain. Every field has a default, so an
/// empty file yields a working single-currency NXT setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Identifier of the chain this scanner owns.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    /// Confirmations required before a deposit or withdrawal is final.
    #[serde(default = "default_min_confirmations")]
    pub min_confirmations: u64,
    /// Blocks reconciled per cycle.
    #[serde(default = "default_blocks_per_cycle")]
    pub blocks_per_cycle: u64,
    /// Upper bound on the unconfirmed-pool seen-set.
    #[serde(default = "default_mempool_capacity")]
    pub mempool_capacity: usize,
    /// Seconds the node's reported tip height stays cached.
    #[serde(default = "default_height_ttl_secs")]
    pub height_ttl_secs: u64,
    /// Log output format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Default log level; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Currencies credited from this chain.
    #[serde(default = "default_currencies")]
    pub currencies: Vec<CurrencySettings>,
}

/// One `[[currencies]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    pub code: String,
    /// Decimal places of one whole unit.
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Whole-unit amount; deposits at or below it are ignored.
    #[serde(default = "default_min_deposit")]
    pub min_deposit: Decimal,
    #[serde(default)]
    pub variant: AssetVariant,
}

// ── Serde default helpers ───────────────────────────────────────────────────

fn default_chain_id() -> String {
    "nxt-mainnet".to_string()
}

fn default_min_confirmations() -> u64 {
    6
}

fn default_blocks_per_cycle() -> u64 {
    6
}

fn default_mempool_capacity() -> usize {
    10_000
}

fn default_height_ttl_secs() -> u64 {
    5
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scale() -> u32 {
    8
}

fn default_min_deposit() -> Decimal {
    Decimal::ZERO
}

fn default_currencies() -> Vec<CurrencySettings> {
    vec![CurrencySettings {
        code: "nxt".to_string(),
        scale: default_scale(),
        min_deposit: default_min_deposit(),
        variant: AssetVariant::PlainCoin,
    }]
}

// ── Impl ────────────────────────────────────────────────────────────────────

impl ScannerConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ScanError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ScanError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, ScanError> {
        let config: ScannerConfig = toml::from_str(raw)
            .map_err(|err| ScanError::Config(format!("invalid config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("config always serializes")
    }

    /// Sanity of the loaded settings. `from_toml_*` call this; embedders
    /// building a config in code should too.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.currencies.is_empty() {
            return Err(ScanError::Config(
                "at least one [[currencies]] entry is required".to_string(),
            ));
        }
        let mut codes = HashSet::new();
        let mut variants = HashSet::new();
        for currency in &self.currencies {
            if currency.scale > MAX_SCALE {
                return Err(ScanError::Config(format!(
                    "currency {}: scale {} exceeds the supported maximum {MAX_SCALE}",
                    currency.code, currency.scale
                )));
            }
            if currency.min_deposit.is_sign_negative() {
                return Err(ScanError::Config(format!(
                    "currency {}: min_deposit must not be negative",
                    currency.code
                )));
            }
            if !codes.insert(CurrencyCode::new(currency.code.as_str())) {
                return Err(ScanError::Config(format!(
                    "duplicate currency code {}",
                    currency.code
                )));
            }
            if !variants.insert(currency.variant.clone()) {
                return Err(ScanError::Config(format!(
                    "currency {}: variant {} is already mapped to another currency",
                    currency.code, currency.variant
                )));
            }
        }
        match self.log_format.as_str() {
            "human" | "json" => {}
            other => {
                return Err(ScanError::Config(format!(
                    "unknown log_format {other:?}, expected \"human\" or \"json\""
                )))
            }
        }
        Ok(())
    }

    /// Resolves the currency entries into minor-unit profiles.
    pub fn profiles(&self) -> Result<Vec<CurrencyProfile>, ScanError> {
        self.currencies
            .iter()
            .map(|currency| {
                let min = NativeAmount::from_decimal(currency.min_deposit, currency.scale)
                    .map_err(|err| {
                        ScanError::Config(format!(
                            "currency {}: min_deposit: {err}",
                            currency.code
                        ))
                    })?;
                Ok(CurrencyProfile::new(
                    currency.code.as_str(),
                    currency.variant.clone(),
                    currency.scale,
                    min,
                ))
            })
            .collect()
    }

    pub fn chain(&self) -> ChainId {
        ChainId::new(self.chain_id.as_str())
    }

    pub fn height_ttl(&self) -> Duration {
        Duration::from_secs(self.height_ttl_secs)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            chain_id: default_chain_id(),
            min_confirmations: default_min_confirmations(),
            blocks_per_cycle: default_blocks_per_cycle(),
            mempool_capacity: default_mempool_capacity(),
            height_ttl_secs: default_height_ttl_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            currencies: default_currencies(),
        }
    }
}
