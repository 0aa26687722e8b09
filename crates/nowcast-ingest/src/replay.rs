//! Replayed provider response for dry runs and testing

use crate::{parse_envelope, FetchResult, SeriesSource};
use nowcast_core::RawBundle;
use std::path::Path;

/// Source that returns the same bundle on every fetch
pub struct ReplaySource {
    bundle: RawBundle,
}

impl ReplaySource {
    pub fn new(bundle: RawBundle) -> Self {
        Self { bundle }
    }

    /// Load a saved forecast response body
    pub fn from_file<P: AsRef<Path>>(path: P) -> FetchResult<Self> {
        let body = std::fs::read(path)?;
        Ok(Self::new(parse_envelope(&body)?))
    }
}

#[async_trait::async_trait]
impl SeriesSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    async fn fetch(&self) -> FetchResult<RawBundle> {
        Ok(self.bundle.clone())
    }
}
