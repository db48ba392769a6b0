use crate::error::{AppError, Result};

/// Validates a model-supplied name that becomes a single path component.
///
/// Rejects empty names, `.`/`..`, path separators, null bytes and control
/// characters. Casing and inner whitespace are left alone.
pub fn validate_path_segment(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Classification {
            message: format!("'{}' is empty", field),
        });
    }

    if value == "." || value == ".." {
        return Err(AppError::Classification {
            message: format!("'{}' cannot be '{}'", field, value),
        });
    }

    if value.contains('/') || value.contains('\\') {
        return Err(AppError::Classification {
            message: format!("'{}' contains a path separator: {}", field, value),
        });
    }

    if value.chars().any(|c| c == '\0' || c.is_control()) {
        return Err(AppError::Classification {
            message: format!("'{}' contains control characters", field),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_regular_names() {
        for name in ["Finances", "Factures EDF", "santé", "facture-xyz_2023-05-01", "finances "] {
            assert!(validate_path_segment("group", name).is_ok(), "rejected {}", name);
        }
    }

    #[test]
    fn test_rejects_traversal_and_separators() {
        for name in ["", "   ", ".", "..", "a/b", "..\\x", "tab\there", "nul\0"] {
            let err = validate_path_segment("group", name).unwrap_err();
            assert_eq!(err.error_type(), "CLASSIFICATION_ERROR", "accepted {:?}", name);
        }
    }
}
