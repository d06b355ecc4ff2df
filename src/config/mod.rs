mod file_config;

pub use file_config::{AccessCacheConfig, FileConfig};

use crate::access_cache::RemoteCacheTtl;
use anyhow::{bail, Result};
use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_L1_CAPACITY: usize = 1024;
const DEFAULT_L2_TTL_SEC: u64 = 300;
const DEFAULT_L2_JITTER_SEC: u64 = 60;

/// Programmatic overrides supplied by the embedding application.
/// This struct mirrors the settings that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CacheOverrides {
    pub l1_capacity: Option<usize>,
    pub l2_ttl_sec: Option<u64>,
    pub l2_jitter_sec: Option<u64>,
}

/// Resolved sizing and expiry settings for the access-cache tiers.
#[derive(Debug, Clone, Copy)]
pub struct AccessCacheSettings {
    /// Capacity of the in-process tier; None means the tier is disabled.
    pub l1_capacity: Option<NonZeroUsize>,
    pub l2_ttl: RemoteCacheTtl,
}

impl AccessCacheSettings {
    /// Resolve settings from programmatic overrides and optional TOML file
    /// config. TOML values override programmatic values where present.
    pub fn resolve(overrides: &CacheOverrides, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config
            .unwrap_or_default()
            .access_cache
            .unwrap_or_default();

        let l1_capacity = file
            .l1_capacity
            .or(overrides.l1_capacity)
            .unwrap_or(DEFAULT_L1_CAPACITY);

        let l2_ttl_sec = file
            .l2_ttl_sec
            .or(overrides.l2_ttl_sec)
            .unwrap_or(DEFAULT_L2_TTL_SEC);
        if l2_ttl_sec == 0 {
            bail!("l2_ttl_sec must be greater than zero");
        }

        let l2_jitter_sec = file
            .l2_jitter_sec
            .or(overrides.l2_jitter_sec)
            .unwrap_or(DEFAULT_L2_JITTER_SEC);

        Ok(Self {
            l1_capacity: NonZeroUsize::new(l1_capacity),
            l2_ttl: RemoteCacheTtl {
                base: Duration::from_secs(l2_ttl_sec),
                jitter: Duration::from_secs(l2_jitter_sec),
            },
        })
    }
}
