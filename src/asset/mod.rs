pub mod loader;
pub mod types;

pub use loader::{LoadResult, Source, spawn_load};
pub use types::LoadedAsset;
