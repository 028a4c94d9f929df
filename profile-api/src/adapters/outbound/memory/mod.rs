mod blob_store;
mod profile_repository;

pub use blob_store::MemoryBlobStore;
pub use profile_repository::MemoryProfileRepository;
