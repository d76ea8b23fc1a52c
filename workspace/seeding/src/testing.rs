//! Shared helpers for the seeding tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::error::{Result, SeedError};
use crate::hasher::CredentialHasher;

/// Deterministic hasher so tests can assert on stored hashes.
pub struct FakeHasher;

impl CredentialHasher for FakeHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(format!("hashed:{plaintext}"))
    }
}

/// Hasher that always fails.
pub struct FailingHasher;

impl CredentialHasher for FailingHasher {
    fn hash(&self, _plaintext: &str) -> Result<String> {
        Err(SeedError::Hash("hasher unavailable".to_string()))
    }
}

/// Deterministic hasher that fails on exactly one call, counted from 1.
pub struct FlakyHasher {
    calls: AtomicUsize,
    fail_on: usize,
}

impl FlakyHasher {
    pub fn failing_on(call: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: call,
        }
    }
}

impl CredentialHasher for FlakyHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(SeedError::Hash("hasher unavailable".to_string()));
        }
        Ok(format!("hashed:{plaintext}"))
    }
}

/// Writes `contents` to a fixture file unique to this test process and `name`.
pub fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "conduit-seed-{}-{}.json",
        std::process::id(),
        name
    ));
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level comes from RUST_LOG, defaulting to WARN.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}
