use crate::domain::AvatarError;

/// Image decoding, resizing and encoding.
///
/// Implementations are CPU-bound and are called from a blocking task.
pub trait ImageCodec: Send + Sync + 'static {
    /// Decoded in-memory pixel grid.
    type Raster: Send;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Raster, AvatarError>;

    /// Resizes to exactly `width` x `height`, ignoring the source aspect ratio.
    fn resize_exact(&self, raster: Self::Raster, width: u32, height: u32) -> Self::Raster;

    fn encode_jpeg(&self, raster: &Self::Raster, quality: u8) -> Result<Vec<u8>, AvatarError>;
}
