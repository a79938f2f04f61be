//! Test fixtures.
//!
//! [`TEST_PRIVATE_KEY`] is the first well-known Anvil/Hardhat development
//! key, never use it for real funds. [`reference_order`] is the order of the
//! golden signing vectors in `./tests/signing.rs`.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use alloy::primitives::{Address, address};

use crate::{
    Chain,
    signing::{PrivateKey, RecoveryIdFormat, SigningContext, SigningDomain},
    types::{Order, Outcome, Side},
};

pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address of [`TEST_PRIVATE_KEY`].
pub const TEST_ADDRESS: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// 2023-11-14T22:13:20Z
pub const TEST_NOW_MS: u64 = 1_700_000_000_000;

pub fn test_key() -> PrivateKey {
    PrivateKey::from_hex(TEST_PRIVATE_KEY).expect("valid test key")
}

/// Testnet domain, `v` in {27, 28}.
pub fn test_context() -> SigningContext {
    SigningContext::new(
        SigningDomain::from(&Chain::testnet()),
        RecoveryIdFormat::Electrum,
    )
}

/// Buy 10 USDC of YES at 0.55 on market 1, valid for one hour from
/// [`TEST_NOW_MS`].
pub fn reference_order() -> Order {
    Order::new(
        TEST_ADDRESS,
        1,
        Side::Buy,
        Outcome::Yes,
        5500,
        10_000_000,
        TEST_NOW_MS,
        TEST_NOW_MS / 1000 + 3600,
    )
}

/// Scratch directory removed on drop.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let path = std::env::temp_dir().join(format!(
            "bjx-sdk-{prefix}-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path.join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
