use std::sync::Arc;

use debridify_core::debrid::MagnetResolver;
use debridify_core::metadata::MetadataProvider;
use debridify_core::pipeline::StreamSearch;
use debridify_core::{Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    metadata: Arc<dyn MetadataProvider>,
    search: StreamSearch,
    resolver: MagnetResolver,
}

impl AppState {
    pub fn new(
        config: Config,
        metadata: Arc<dyn MetadataProvider>,
        search: StreamSearch,
        resolver: MagnetResolver,
    ) -> Self {
        Self {
            config,
            metadata,
            search,
            resolver,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn metadata(&self) -> &dyn MetadataProvider {
        self.metadata.as_ref()
    }

    pub fn search(&self) -> &StreamSearch {
        &self.search
    }

    pub fn resolver(&self) -> &MagnetResolver {
        &self.resolver
    }

    /// Base URL used when building absolute stream links.
    pub fn public_base_url(&self) -> String {
        match self.config.server.public_base_url {
            Some(ref base) => base.trim_end_matches('/').to_string(),
            None => format!(
                "http://{}:{}",
                self.config.server.host, self.config.server.port
            ),
        }
    }
}
