//! Test helpers for writing entry files and stubbing the provider.

use super::*;
use crate::score::{ProviderBuilder, ScoreConfig};
use camino::{Utf8Path, Utf8PathBuf};
use sahasi_core::ProximityProvider;
use sahasi_core::test_support::StubProximityProvider;
use std::sync::Arc;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Hands out a shared stub provider and records the configuration it saw.
pub(super) struct StubProviderBuilder {
    pub(super) provider: Arc<StubProximityProvider>,
    pub(super) seen: std::cell::RefCell<Option<ScoreConfig>>,
}

impl StubProviderBuilder {
    pub(super) fn new(provider: StubProximityProvider) -> Self {
        Self {
            provider: Arc::new(provider),
            seen: std::cell::RefCell::new(None),
        }
    }
}

impl ProviderBuilder for StubProviderBuilder {
    fn build(&self, config: &ScoreConfig) -> Result<Box<dyn ProximityProvider>, CliError> {
        self.seen.replace(Some(config.clone()));
        Ok(Box::new(Arc::clone(&self.provider)))
    }
}
