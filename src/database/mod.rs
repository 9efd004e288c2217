// Schema bootstrap and the shared repository helpers used by the
// per-resource model modules.

pub mod repository;
pub mod schema;

pub use repository::Table;
