use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage};

use crate::domain::{ports::outbound::ImageCodec, AvatarError};

/// [`ImageCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct DynamicImageCodec {
    filter: FilterType,
}

impl DynamicImageCodec {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for DynamicImageCodec {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl ImageCodec for DynamicImageCodec {
    type Raster = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, AvatarError> {
        image::load_from_memory(bytes).map_err(|err| AvatarError::Decode(err.to_string()))
    }

    fn resize_exact(&self, raster: DynamicImage, width: u32, height: u32) -> DynamicImage {
        raster.resize_exact(width, height, self.filter)
    }

    fn encode_jpeg(&self, raster: &DynamicImage, quality: u8) -> Result<Vec<u8>, AvatarError> {
        // JPEG has no alpha channel.
        let rgb = raster.to_rgb8();

        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality)
            .encode_image(&rgb)
            .map_err(|err| AvatarError::Encode(err.to_string()))?;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, ImageFormat};

    use super::*;
    use crate::test_support::{encoded_image, png_bytes};

    #[test]
    fn resize_ignores_aspect_ratio() {
        let codec = DynamicImageCodec::default();
        let raster = codec.decode(&png_bytes(300, 90)).unwrap();

        let resized = codec.resize_exact(raster, 150, 150);

        assert_eq!(resized.dimensions(), (150, 150));
    }

    #[test]
    fn encodes_decodable_jpeg() {
        let codec = DynamicImageCodec::default();
        let raster = codec.decode(&png_bytes(20, 10)).unwrap();

        let jpeg = codec.encode_jpeg(&raster, 90).unwrap();

        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
        assert_eq!(image::load_from_memory(&jpeg).unwrap().dimensions(), (20, 10));
    }

    #[test]
    fn decodes_gif_input() {
        let codec = DynamicImageCodec::default();

        let raster = codec.decode(&encoded_image(12, 8, ImageFormat::Gif)).unwrap();

        assert_eq!(raster.dimensions(), (12, 8));
    }

    #[test]
    fn rejects_garbage() {
        let codec = DynamicImageCodec::default();

        assert!(matches!(
            codec.decode(b"definitely not pixels"),
            Err(AvatarError::Decode(_))
        ));
    }

    #[test]
    fn svg_is_not_decodable() {
        let codec = DynamicImageCodec::default();
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#;

        assert!(matches!(codec.decode(svg), Err(AvatarError::Decode(_))));
    }
}
