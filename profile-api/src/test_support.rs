//! Fixtures shared by unit tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use crate::domain::models::{UserId, UserProfile};

/// Encodes a solid-colour `width` x `height` image in `format`.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = match format {
        ImageFormat::Gif | ImageFormat::Png => {
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255])))
        }
        _ => DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 120, 200]))),
    };

    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, format)
        .expect("fixture image should encode");
    out.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded_image(width, height, ImageFormat::Png)
}

pub fn profile_fixture(id: i32, username: &str) -> UserProfile {
    UserProfile {
        id: UserId::new(id),
        email: format!("user{id}@example.com"),
        username: username.to_string(),
        bio: None,
        avatar: None,
        following_count: 0,
        followers_count: 0,
        bookmarks_count: 0,
    }
}
