pub mod loader;
pub mod types;

pub use loader::{load_institutions, read_institutions, DataError, ID_COLUMN, NAME_COLUMN};
pub use types::Institution;
