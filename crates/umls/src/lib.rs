pub mod client;
pub mod error;
pub mod relation;
pub mod schema;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::{UmlsClient, UmlsEndpoints, DEFAULT_BASE_URL, DEFAULT_VERSION};
pub use error::{Call, UmlsError, UmlsResult};
pub use relation::RelationType;
pub use schema::{source_code_from_atoms, Atom, SNOMEDCT_US};
