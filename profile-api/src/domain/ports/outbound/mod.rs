mod blob_store;
mod image_codec;
mod profile_repository;

pub use blob_store::*;
pub use image_codec::*;
pub use profile_repository::*;
