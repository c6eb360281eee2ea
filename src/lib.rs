pub mod catalog;
pub mod config;
pub mod logging;
pub mod render;
pub mod view;
pub mod watch;

pub use catalog::{Catalog, CatalogCache, CatalogError, ProjectRecord, load_catalog, parse_catalog};
pub use view::{InvalidConfigError, View, ViewConfig, build_view};
