//! Minter builder

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use url::Url;

use tknz_common::chain::{ChainClient, WalletConnector};
use tknz_common::metadata::MetadataConnector;

use super::events::EventSink;
use super::{Error, HttpMetadataClient, Minter, MinterConfig};

/// Builder for a [`Minter`].
#[derive(Debug, Default)]
pub struct MinterBuilder {
    config: MinterConfig,
    chain: Option<Arc<dyn ChainClient>>,
    wallet: Option<Arc<dyn WalletConnector>>,
    metadata: Option<Arc<dyn MetadataConnector>>,
    backend: Option<Url>,
}

impl MinterBuilder {
    /// New builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn config(mut self, config: MinterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the chain client.
    pub fn chain(mut self, chain: Arc<dyn ChainClient>) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Set the wallet connector.
    pub fn wallet(mut self, wallet: Arc<dyn WalletConnector>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Set the metadata connector, overriding any backend URL.
    pub fn metadata(mut self, metadata: Arc<dyn MetadataConnector>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Use an [`HttpMetadataClient`] against this backend base URL.
    pub fn backend_url(mut self, backend: Url) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Build the [`Minter`].
    ///
    /// When `wake_on_start` is set (the default) this issues the best-effort
    /// backend wake ping, which requires a tokio runtime context.
    pub fn build(self) -> Result<Minter, Error> {
        let chain = self.chain.ok_or(Error::MissingChainClient)?;
        let wallet = self.wallet.ok_or(Error::MissingWalletConnector)?;
        let metadata: Arc<dyn MetadataConnector> = match (self.metadata, self.backend) {
            (Some(metadata), _) => metadata,
            (None, Some(backend)) => Arc::new(HttpMetadataClient::new(backend)?),
            (None, None) => return Err(Error::MissingMetadataConnector),
        };

        let minter = Minter {
            config: Arc::new(self.config),
            chain,
            wallet,
            metadata,
            http: reqwest::Client::new(),
            events: EventSink::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
        };

        if minter.config.wake_on_start {
            minter.metadata.wake();
        }

        Ok(minter)
    }
}
