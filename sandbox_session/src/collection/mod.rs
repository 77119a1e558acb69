mod errors;
mod postgres;
mod sqlite;
mod store;
mod types;

pub use errors::CollectionError;
pub use store::DocumentCollection;
pub use types::DocumentPool;
