pub mod media;
pub mod postgres;
pub mod storage;

#[cfg(test)]
pub mod memory;
