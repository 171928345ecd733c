use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchitectError {
    #[error("กรุณาตั้งค่า Gemini API Key ของคุณก่อน (API key not configured for {provider})")]
    MissingApiKey { provider: String },

    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("Unusable auto-fill response: {0}")]
    InvalidResponse(String),

    #[error("สามารถอัปโหลดได้สูงสุด {max} รูปภาพเท่านั้น ({count} requested)")]
    TooManyImages { count: usize, max: usize },

    #[error("Not an image file: {path} ({mime_type})")]
    UnsupportedImageType { path: String, mime_type: String },

    #[error("Unknown genre: {0}")]
    UnknownGenre(String),

    #[error("Unsupported duration: {0}s (expected 15, 30 or 45)")]
    InvalidDuration(u32),

    #[error("Character not found: {0}")]
    CharacterNotFound(u64),

    #[error("Cannot remove the last character")]
    LastCharacter,

    #[error("Reference image not found: {0}")]
    ImageNotFound(u64),

    #[error("Cameo not found in registry: {0}")]
    CameoNotFound(String),

    #[error("Cameo already saved or identifier blank: {0}")]
    CameoRejected(String),

    #[error("Invalid beat position: {0} (parts start at 1)")]
    InvalidBeat(u32),

    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Error code for JSON output
impl ArchitectError {
    pub fn code(&self) -> &'static str {
        match self {
            ArchitectError::MissingApiKey { .. } => "MISSING_API_KEY",
            ArchitectError::ApiError(_) => "API_ERROR",
            ArchitectError::InvalidResponse(_) => "INVALID_RESPONSE",
            ArchitectError::TooManyImages { .. } => "TOO_MANY_IMAGES",
            ArchitectError::UnsupportedImageType { .. } => "UNSUPPORTED_IMAGE_TYPE",
            ArchitectError::UnknownGenre(_) => "UNKNOWN_GENRE",
            ArchitectError::InvalidDuration(_) => "INVALID_DURATION",
            ArchitectError::CharacterNotFound(_) => "CHARACTER_NOT_FOUND",
            ArchitectError::LastCharacter => "LAST_CHARACTER",
            ArchitectError::ImageNotFound(_) => "IMAGE_NOT_FOUND",
            ArchitectError::CameoNotFound(_) => "CAMEO_NOT_FOUND",
            ArchitectError::CameoRejected(_) => "CAMEO_REJECTED",
            ArchitectError::InvalidBeat(_) => "INVALID_BEAT",
            ArchitectError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ArchitectError::InvalidDuration(20).code(), "INVALID_DURATION");
        assert_eq!(
            ArchitectError::TooManyImages { count: 4, max: 3 }.code(),
            "TOO_MANY_IMAGES"
        );
    }

    #[test]
    fn missing_key_message_is_localized() {
        let err = ArchitectError::MissingApiKey {
            provider: "gemini".to_string(),
        };
        assert!(err.to_string().starts_with("กรุณาตั้งค่า Gemini API Key"));
    }
}
