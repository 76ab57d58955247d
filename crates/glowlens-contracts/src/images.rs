use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which part of the body, or which side, an image shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageAngle {
    Front,
    Left,
    Right,
    Side,
    Back,
    Wrist,
}

impl ImageAngle {
    pub const ALL: [ImageAngle; 6] = [
        ImageAngle::Front,
        ImageAngle::Left,
        ImageAngle::Right,
        ImageAngle::Side,
        ImageAngle::Back,
        ImageAngle::Wrist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageAngle::Front => "front",
            ImageAngle::Left => "left",
            ImageAngle::Right => "right",
            ImageAngle::Side => "side",
            ImageAngle::Back => "back",
            ImageAngle::Wrist => "wrist",
        }
    }
}

impl fmt::Display for ImageAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageAngle {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        ImageAngle::ALL
            .into_iter()
            .find(|angle| angle.as_str() == normalized)
            .ok_or_else(|| format!("Unknown image angle '{}'.", raw.trim()))
    }
}

/// Encoded image payload as handed over by the caller.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageData {
    /// Raw file bytes (PNG, JPEG, WebP, ...).
    Bytes(Vec<u8>),
    /// Plain base64 or a `data:<mime>;base64,` URL.
    Base64(String),
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageData::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            ImageData::Base64(text) => write!(f, "Base64({} chars)", text.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    data: ImageData,
    angle: Option<ImageAngle>,
}

impl ImageInput {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: ImageData::Bytes(bytes.into()),
            angle: None,
        }
    }

    pub fn from_base64(encoded: impl Into<String>) -> Self {
        Self {
            data: ImageData::Base64(encoded.into()),
            angle: None,
        }
    }

    pub fn with_angle(mut self, angle: ImageAngle) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn data(&self) -> &ImageData {
        &self.data
    }

    pub fn angle(&self) -> Option<ImageAngle> {
        self.angle
    }
}
