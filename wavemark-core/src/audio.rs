//! Data-URL transport encoding for audio payloads.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// A decoded `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioPayloadError {
    /// Missing the `data:` scheme or the `,` separating header and payload.
    NotDataUrl,
    /// The header does not declare `;base64`.
    NotBase64,
    Decode(base64::DecodeError),
}

impl fmt::Display for AudioPayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioPayloadError::NotDataUrl => write!(f, "audio payload is not a data URL"),
            AudioPayloadError::NotBase64 => write!(f, "audio data URL is not base64 encoded"),
            AudioPayloadError::Decode(e) => write!(f, "audio payload base64 error: {}", e),
        }
    }
}

impl std::error::Error for AudioPayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AudioPayloadError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<base64::DecodeError> for AudioPayloadError {
    fn from(e: base64::DecodeError) -> Self {
        AudioPayloadError::Decode(e)
    }
}

impl AudioPayload {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Wrap raw WAV file bytes.
    pub fn from_wav_bytes(bytes: Vec<u8>) -> Self {
        Self::new("audio/x-wav", bytes)
    }

    pub fn parse(url: &str) -> Result<Self, AudioPayloadError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or(AudioPayloadError::NotDataUrl)?;
        let (header, data) = rest.split_once(',').ok_or(AudioPayloadError::NotDataUrl)?;
        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default();
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(AudioPayloadError::NotBase64);
        }
        let bytes = STANDARD.decode(data.trim())?;
        let mime = if mime.is_empty() {
            "application/octet-stream"
        } else {
            mime
        };
        Ok(Self::new(mime, bytes))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}
