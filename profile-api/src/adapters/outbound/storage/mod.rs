mod local;

pub use local::LocalDiskBlobStore;
