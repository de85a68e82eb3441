//! Test doubles and fixtures shared by unit and integration tests.

pub mod fixtures;
mod mock_anime;
mod mock_debrid;
mod mock_metadata;
mod mock_searcher;

pub use mock_anime::MockAnimeCatalog;
pub use mock_debrid::MockDebridClient;
pub use mock_metadata::MockMetadataProvider;
pub use mock_searcher::MockSearcher;
