use depot_core::AppError;

/// Reasons an upload is refused before any byte is stored.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Empty file")]
    EmptyPayload,

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    UnsupportedMediaType {
        content_type: String,
        allowed: Vec<String>,
    },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyPayload => AppError::EmptyPayload,
            ValidationError::UnsupportedMediaType { content_type, .. } => {
                AppError::UnsupportedMediaType(content_type)
            }
        }
    }
}

/// Upload validator
///
/// Pure check against the configured allow-list; it never touches storage.
/// Content types are compared verbatim, so case variants and parameters
/// (`; charset=...`) are not on the list.
#[derive(Clone, Debug)]
pub struct MediaValidator {
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(allowed_content_types: Vec<String>) -> Self {
        Self {
            allowed_content_types,
        }
    }

    /// Validate an upload's declared content type and size.
    ///
    /// Emptiness is checked first, so an empty payload is `EmptyPayload`
    /// whatever its declared type.
    pub fn validate(&self, content_type: &str, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyPayload);
        }

        if !self.allowed_content_types.iter().any(|ct| ct == content_type) {
            return Err(ValidationError::UnsupportedMediaType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::UploadConfig;

    fn validator() -> MediaValidator {
        MediaValidator::new(UploadConfig::default().allowed_content_types)
    }

    #[test]
    fn test_accepts_allowed_types() {
        let v = validator();
        for ct in depot_core::constants::DEFAULT_ALLOWED_CONTENT_TYPES {
            assert_eq!(v.validate(ct, 10), Ok(()), "{} should be allowed", ct);
        }
    }

    #[test]
    fn test_variants_of_allowed_types_are_rejected() {
        let v = validator();
        for ct in [
            "IMAGE/PNG",
            "Text/Plain",
            "text/csv; charset=utf-8",
            "  Application/PDF ;x=y",
            " image/jpeg",
            "image/jpeg ",
        ] {
            assert!(
                matches!(
                    v.validate(ct, 10),
                    Err(ValidationError::UnsupportedMediaType { ref content_type, .. }) if content_type == ct
                ),
                "{:?} should be rejected",
                ct
            );
        }
    }

    #[test]
    fn test_rejects_unlisted_type() {
        let err = validator().validate("application/zip", 10).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedMediaType { .. }));
        assert!(matches!(
            AppError::from(err),
            AppError::UnsupportedMediaType(ct) if ct == "application/zip"
        ));
    }

    #[test]
    fn test_empty_payload_wins_over_type() {
        let v = validator();
        assert_eq!(v.validate("image/png", 0), Err(ValidationError::EmptyPayload));
        assert_eq!(
            v.validate("application/zip", 0),
            Err(ValidationError::EmptyPayload)
        );
    }
}
