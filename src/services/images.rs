use base64::Engine;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// An uploaded photo after base64 decoding.
#[derive(Debug)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Decode a base64 image payload, with or without a `data:image/...;base64,`
/// prefix, and read its header.
pub fn decode_payload(payload: &str) -> Result<DecodedImage, ImageError> {
    let encoded = match payload.strip_prefix("data:image") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or(ImageError::MalformedDataUrl)?,
        None => payload,
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(ImageError::Base64)?;

    let reader = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|_| ImageError::UnknownFormat)?;
    let format = reader.format().ok_or(ImageError::UnknownFormat)?;
    let (width, height) = reader.into_dimensions().map_err(ImageError::Header)?;

    Ok(DecodedImage {
        bytes,
        format,
        width,
        height,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Data URL has no payload")]
    MalformedDataUrl,

    #[error("Invalid base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Unrecognized image format")]
    UnknownFormat,

    #[error("Unreadable image header: {0}")]
    Header(#[from] image::ImageError),
}
