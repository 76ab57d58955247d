use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use glowlens_contracts::{AnalysisDomain, ImageAngle, ImageData, ImageInput};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};

use crate::error::AnalysisError;
use crate::prompts::multi_angle_guidance;

/// Longest edge sent to the provider.
pub const MAX_IMAGE_DIM: u32 = 1536;
const JPEG_QUALITY: u8 = 90;

#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    /// Standard base64, no data-URL prefix.
    pub data: String,
    pub angle: Option<ImageAngle>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("data", &format_args!("<{} base64 chars>", self.data.len()))
            .field("angle", &self.angle)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Text(String),
    Image(EncodedImage),
}

/// Provider-agnostic multimodal request: the instruction text first, then the
/// primary image, then auxiliary images in caller order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub domain: AnalysisDomain,
    pub model: String,
    pub parts: Vec<RequestPart>,
}

impl ProviderRequest {
    pub fn instruction(&self) -> &str {
        self.parts
            .iter()
            .find_map(|part| match part {
                RequestPart::Text(text) => Some(text.as_str()),
                RequestPart::Image(_) => None,
            })
            .unwrap_or("")
    }

    pub fn images(&self) -> impl Iterator<Item = &EncodedImage> {
        self.parts.iter().filter_map(|part| match part {
            RequestPart::Image(image) => Some(image),
            RequestPart::Text(_) => None,
        })
    }
}

pub struct MultimodalRequestBuilder;

impl MultimodalRequestBuilder {
    /// Assembles one request. Auxiliary images extend the instruction with
    /// per-angle guidance; without a primary image the request is text-only
    /// and auxiliary images are ignored.
    pub fn build(
        domain: AnalysisDomain,
        model: &str,
        instruction: String,
        primary: Option<&ImageInput>,
        auxiliary: &[ImageInput],
    ) -> Result<ProviderRequest, AnalysisError> {
        let mut images = Vec::new();
        let mut text = instruction;
        if let Some(primary) = primary {
            images.push(normalize_image(primary)?);
            for extra in auxiliary {
                images.push(normalize_image(extra)?);
            }
            let angles = auxiliary.iter().map(ImageInput::angle).collect::<Vec<_>>();
            if let Some(guidance) = multi_angle_guidance(domain, &angles) {
                text.push_str("\n\n");
                text.push_str(&guidance);
            }
        }

        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(RequestPart::Text(text));
        parts.extend(images.into_iter().map(RequestPart::Image));
        Ok(ProviderRequest {
            domain,
            model: model.to_string(),
            parts,
        })
    }
}

/// Decodes, flattens alpha onto white, bounds the longest edge and re-encodes
/// as JPEG.
pub fn normalize_image(input: &ImageInput) -> Result<EncodedImage, AnalysisError> {
    let raw = match input.data() {
        ImageData::Bytes(bytes) => bytes.clone(),
        ImageData::Base64(text) => decode_base64_payload(text)?,
    };
    if raw.is_empty() {
        return Err(AnalysisError::InvalidImageEncoding(
            "image payload is empty".to_string(),
        ));
    }
    let decoded = image::load_from_memory(&raw)
        .map_err(|err| AnalysisError::InvalidImageEncoding(format!("undecodable image: {err}")))?;

    let flattened = flatten_onto_white(&decoded);
    let bounded = if flattened.width().max(flattened.height()) > MAX_IMAGE_DIM {
        DynamicImage::ImageRgb8(flattened)
            .resize(MAX_IMAGE_DIM, MAX_IMAGE_DIM, FilterType::Triangle)
            .to_rgb8()
    } else {
        flattened
    };

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder
        .encode_image(&bounded)
        .map_err(|err| AnalysisError::InvalidImageEncoding(format!("jpeg encode failed: {err}")))?;

    Ok(EncodedImage {
        mime_type: "image/jpeg".to_string(),
        data: BASE64.encode(&bytes),
        angle: input.angle(),
        width: bounded.width(),
        height: bounded.height(),
    })
}

fn decode_base64_payload(text: &str) -> Result<Vec<u8>, AnalysisError> {
    let trimmed = text.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| {
                AnalysisError::InvalidImageEncoding("data URL has no payload".to_string())
            })?,
        None => trimmed,
    };
    let compact = payload
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect::<String>();
    BASE64
        .decode(compact.as_bytes())
        .map_err(|err| AnalysisError::InvalidImageEncoding(format!("invalid base64: {err}")))
}

fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut flattened = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u16::from(pixel[3]);
        let blend =
            |channel: u8| -> u8 { (((u16::from(channel) * alpha) + (255 * (255 - alpha))) / 255) as u8 };
        flattened.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    flattened
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use glowlens_contracts::{AnalysisDomain, ImageAngle, ImageInput};

    use super::{normalize_image, MultimodalRequestBuilder, RequestPart, MAX_IMAGE_DIM};
    use crate::error::AnalysisError;
    use crate::test_support::{png_bytes, transparent_png_bytes};

    #[test]
    fn base64_and_data_url_inputs_decode_to_jpeg() -> anyhow::Result<()> {
        let png = png_bytes(8, 6);
        let plain = normalize_image(&ImageInput::from_base64(BASE64.encode(&png)))?;
        let data_url = normalize_image(&ImageInput::from_base64(format!(
            "data:image/png;base64,{}",
            BASE64.encode(&png)
        )))?;
        assert_eq!(plain.mime_type, "image/jpeg");
        assert_eq!((plain.width, plain.height), (8, 6));
        assert_eq!(plain.data, data_url.data);
        Ok(())
    }

    #[test]
    fn oversized_image_is_bounded() -> anyhow::Result<()> {
        let encoded = normalize_image(&ImageInput::from_bytes(png_bytes(MAX_IMAGE_DIM * 2, 100)))?;
        assert_eq!(encoded.width, MAX_IMAGE_DIM);
        assert!(encoded.height <= 100);
        Ok(())
    }

    #[test]
    fn transparent_pixels_flatten_to_white() -> anyhow::Result<()> {
        let encoded = normalize_image(&ImageInput::from_bytes(transparent_png_bytes(4, 4)))?;
        let jpeg = BASE64.decode(encoded.data.as_bytes())?;
        let decoded = image::load_from_memory(&jpeg)?.to_rgb8();
        let pixel = decoded.get_pixel(1, 1);
        assert!(pixel[0] > 240 && pixel[1] > 240 && pixel[2] > 240);
        Ok(())
    }

    #[test]
    fn garbage_is_invalid_image_encoding() {
        let err = normalize_image(&ImageInput::from_base64("not base64 at all!!")).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImageEncoding(_)));
        let err = normalize_image(&ImageInput::from_bytes(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImageEncoding(_)));
        let err = normalize_image(&ImageInput::from_bytes(Vec::new())).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImageEncoding(_)));
    }

    #[test]
    fn build_orders_text_primary_then_auxiliary() -> anyhow::Result<()> {
        let primary = ImageInput::from_bytes(png_bytes(10, 10));
        let wrist = ImageInput::from_bytes(png_bytes(6, 6)).with_angle(ImageAngle::Wrist);
        let request = MultimodalRequestBuilder::build(
            AnalysisDomain::PersonalColor,
            "gemini-test",
            "BASE PROMPT".to_string(),
            Some(&primary),
            &[wrist],
        )?;
        assert_eq!(request.parts.len(), 3);
        assert!(matches!(request.parts[0], RequestPart::Text(_)));
        assert!(request.instruction().starts_with("BASE PROMPT"));
        assert!(request.instruction().contains("VEIN COLOR CHECK"));
        let angles = request.images().map(|image| image.angle).collect::<Vec<_>>();
        assert_eq!(angles, vec![None, Some(ImageAngle::Wrist)]);
        assert_eq!(request.model, "gemini-test");
        Ok(())
    }

    #[test]
    fn text_only_request_has_no_guidance() -> anyhow::Result<()> {
        let request = MultimodalRequestBuilder::build(
            AnalysisDomain::WorkoutType,
            "gemini-test",
            "PLAN".to_string(),
            None,
            &[],
        )?;
        assert_eq!(request.parts, vec![RequestPart::Text("PLAN".to_string())]);
        assert_eq!(request.images().count(), 0);
        Ok(())
    }

    #[test]
    fn single_image_request_has_no_guidance() -> anyhow::Result<()> {
        let primary = ImageInput::from_bytes(png_bytes(4, 4));
        let request = MultimodalRequestBuilder::build(
            AnalysisDomain::Skin,
            "gemini-test",
            "SKIN".to_string(),
            Some(&primary),
            &[],
        )?;
        assert_eq!(request.instruction(), "SKIN");
        assert_eq!(request.images().count(), 1);
        Ok(())
    }
}
