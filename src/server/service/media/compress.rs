//! Upload validation and image compression.
//!
//! Everything here is synchronous and CPU bound, callers run [`process_upload`] on the blocking
//! thread pool.

use std::io::Cursor;

use image::{
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
    imageops::FilterType,
    DynamicImage, ImageFormat, ImageReader,
};

use crate::server::error::media::MediaError;

/// Longest edge allowed for stored images
pub const MAX_DIMENSION: u32 = 1920;
pub const JPEG_QUALITY: u8 = 80;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_WEBP: &str = "image/webp";

/// An image ready to be stored
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

fn normalize_mime(declared: &str) -> Result<&'static str, MediaError> {
    let essence = declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpeg" | "image/jpg" => Ok(MIME_JPEG),
        "image/png" => Ok(MIME_PNG),
        "image/webp" => Ok(MIME_WEBP),
        _ => Err(MediaError::UnsupportedType(declared.to_string())),
    }
}

/// Detects the image type from the leading bytes of the file
pub fn sniff(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => Some(MIME_JPEG),
        ImageFormat::Png => Some(MIME_PNG),
        ImageFormat::WebP => Some(MIME_WEBP),
        _ => None,
    }
}

/// Checks size, declared type and sniffed type of an upload.
///
/// # Returns
/// - `Ok(&'static str)` - Canonical MIME type of the upload
/// - `Err(MediaError::Empty)` - No bytes were uploaded
/// - `Err(MediaError::TooLarge)` - Upload exceeds `max_bytes`
/// - `Err(MediaError::UnsupportedType)` - Declared type is not an accepted image type
/// - `Err(MediaError::TypeMismatch)` - Content does not match the declared type
pub fn validate_upload(
    declared: &str,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<&'static str, MediaError> {
    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }

    if bytes.len() > max_bytes {
        return Err(MediaError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    let mime = normalize_mime(declared)?;
    let detected = sniff(bytes);

    if detected != Some(mime) {
        return Err(MediaError::TypeMismatch {
            declared: mime.to_string(),
            detected: detected.unwrap_or("unknown").to_string(),
        });
    }

    Ok(mime)
}

fn extension(mime: &'static str) -> &'static str {
    match mime {
        MIME_PNG => "png",
        MIME_WEBP => "webp",
        _ => "jpg",
    }
}

fn encode(image: &DynamicImage, mime: &'static str) -> Result<Vec<u8>, MediaError> {
    let mut buf = Vec::new();

    if mime == MIME_PNG {
        let encoder = PngEncoder::new(&mut buf);
        image.write_with_encoder(encoder).map_err(MediaError::Encode)?;
    } else {
        let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
        DynamicImage::ImageRgb8(image.to_rgb8())
            .write_with_encoder(encoder)
            .map_err(MediaError::Encode)?;
    }

    Ok(buf)
}

/// Compresses an image whose type was already validated.
///
/// JPEG and PNG images are downscaled to fit within [`MAX_DIMENSION`] and re-encoded in their
/// own format. For images already within bounds the original bytes are kept when re-encoding
/// does not make the file smaller.
/// WebP images are stored unchanged.
pub fn compress(bytes: Vec<u8>, mime: &'static str) -> Result<ProcessedImage, MediaError> {
    let format = match mime {
        MIME_PNG => ImageFormat::Png,
        MIME_WEBP => ImageFormat::WebP,
        _ => ImageFormat::Jpeg,
    };

    if format == ImageFormat::WebP {
        let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(MediaError::Decode)?;

        return Ok(ProcessedImage {
            bytes,
            mime_type: mime,
            extension: extension(mime),
            width,
            height,
        });
    }

    let image = image::load_from_memory_with_format(&bytes, format).map_err(MediaError::Decode)?;
    let (original_width, original_height) = (image.width(), image.height());

    let oversized = original_width > MAX_DIMENSION || original_height > MAX_DIMENSION;
    let resized = if oversized {
        image.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        image
    };

    let encoded = encode(&resized, mime)?;

    // Oversized images always take the downscaled encoding
    let processed = if oversized || encoded.len() < bytes.len() {
        ProcessedImage {
            bytes: encoded,
            mime_type: mime,
            extension: extension(mime),
            width: resized.width(),
            height: resized.height(),
        }
    } else {
        ProcessedImage {
            bytes,
            mime_type: mime,
            extension: extension(mime),
            width: original_width,
            height: original_height,
        }
    };

    Ok(processed)
}

/// Validates then compresses an upload
pub fn process_upload(
    declared: &str,
    bytes: Vec<u8>,
    max_bytes: usize,
) -> Result<ProcessedImage, MediaError> {
    let mime = validate_upload(declared, &bytes, max_bytes)?;

    compress(bytes, mime)
}
