use std::sync::Arc;

use tracing::warn;

use crate::catalog::Catalog;

use super::{InvalidConfigError, View, ViewConfig, assemble_view};

/// One viewer's state: a shared read-only catalog plus the config that last
/// passed validation.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    config: ViewConfig,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, config: ViewConfig) -> Result<Self, InvalidConfigError> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Applies a new config. On error the previous config stays active.
    pub fn reconfigure(&mut self, config: ViewConfig) -> Result<(), InvalidConfigError> {
        if let Err(err) = config.validate() {
            warn!(error = %err, "rejected view config change");
            return Err(err);
        }
        self.config = config;
        Ok(())
    }

    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) {
        self.catalog = catalog;
    }

    /// `config` is validated on every path that sets it, so this cannot fail.
    pub fn view(&self) -> View<'_> {
        assemble_view(&self.catalog, &self.config)
    }
}
