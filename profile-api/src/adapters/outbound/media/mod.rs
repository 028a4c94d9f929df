mod image_codec;

pub use image_codec::DynamicImageCodec;
