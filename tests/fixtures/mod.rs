//! Request fixtures shared by the integration tests

#![allow(dead_code)]

use base64::Engine;
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;
use virtual_tryon::models::tryon::{Measurements, TryOnRequest};

pub const ARTIFACT_URL: &str = "https://fal.media/files/tryon/result.png";

/// A solid-colour PNG as a `data:` URL, like the web client uploads.
pub fn png_data_url(width: u32, height: u32, color: [u8; 3]) -> String {
    let mut buf = Vec::new();
    RgbImage::from_pixel(width, height, Rgb(color))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("Failed to encode PNG");
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buf)
    )
}

pub fn sample_measurements() -> Measurements {
    Measurements {
        height: "170".to_string(),
        weight: "65".to_string(),
        chest: "90".to_string(),
        waist: "75".to_string(),
        hips: "95".to_string(),
    }
}

/// The canonical "Test User" request: 200x200 user photo, 200x300 garment.
pub fn sample_request() -> TryOnRequest {
    TryOnRequest {
        user_image: png_data_url(200, 200, [0, 0, 255]),
        clothing_image: png_data_url(200, 300, [0, 128, 0]),
        name: "Test User".to_string(),
        measurements: sample_measurements(),
        style: "casual".to_string(),
    }
}

/// Same request as JSON, for the HTTP tests.
pub fn sample_request_json() -> Value {
    let request = sample_request();
    json!({
        "name": request.name,
        "user_image": request.user_image,
        "clothing_image": request.clothing_image,
        "measurements": {
            "height": "170",
            "weight": "65",
            "chest": "90",
            "waist": "75",
            "hips": "95"
        },
        "style": "casual"
    })
}
