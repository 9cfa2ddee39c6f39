pub mod app;
pub mod domain;
pub mod infra;
pub mod routing;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::error::RepositoryError;
pub use app::material_service::{MaterialService, MATERIALS_COLLECTION};
pub use domain::material::{MaterialId, MaterialRecord};
pub use routing::{HashHistory, RouteTable};
pub use storage::document::{DocumentStore, FirestoreStore, MemoryStore, PostgresDocumentStore};
