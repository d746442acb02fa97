use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Revit family categories offered by the analysis form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FamilyCategory {
    #[default]
    #[serde(rename = "Furniture")]
    Furniture,
    #[serde(rename = "Lighting Fixtures")]
    Lighting,
    #[serde(rename = "Plumbing Fixtures")]
    Plumbing,
    #[serde(rename = "Specialty Equipment")]
    Specialty,
    #[serde(rename = "Doors")]
    Door,
    #[serde(rename = "Windows")]
    Window,
    #[serde(rename = "Generic Models")]
    Generic,
    #[serde(rename = "Mechanical Equipment")]
    Mechanical,
}

impl FamilyCategory {
    pub const ALL: [FamilyCategory; 8] = [
        FamilyCategory::Furniture,
        FamilyCategory::Lighting,
        FamilyCategory::Plumbing,
        FamilyCategory::Specialty,
        FamilyCategory::Door,
        FamilyCategory::Window,
        FamilyCategory::Generic,
        FamilyCategory::Mechanical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FamilyCategory::Furniture => "Furniture",
            FamilyCategory::Lighting => "Lighting Fixtures",
            FamilyCategory::Plumbing => "Plumbing Fixtures",
            FamilyCategory::Specialty => "Specialty Equipment",
            FamilyCategory::Door => "Doors",
            FamilyCategory::Window => "Windows",
            FamilyCategory::Generic => "Generic Models",
            FamilyCategory::Mechanical => "Mechanical Equipment",
        }
    }

    /// Short name accepted on the command line.
    pub fn key(self) -> &'static str {
        match self {
            FamilyCategory::Furniture => "furniture",
            FamilyCategory::Lighting => "lighting",
            FamilyCategory::Plumbing => "plumbing",
            FamilyCategory::Specialty => "specialty",
            FamilyCategory::Door => "door",
            FamilyCategory::Window => "window",
            FamilyCategory::Generic => "generic",
            FamilyCategory::Mechanical => "mechanical",
        }
    }
}

impl fmt::Display for FamilyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FamilyCategory {
    type Err = InputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        if normalized.is_empty() {
            return Err(InputError::UnknownCategory(raw.to_string()));
        }
        FamilyCategory::ALL
            .into_iter()
            .find(|category| {
                normalized == category.label().to_ascii_lowercase()
                    || normalized == category.key()
                    || normalized == format!("{}s", category.key())
            })
            .ok_or_else(|| InputError::UnknownCategory(raw.to_string()))
    }
}

/// A self-contained encoded image, normally a `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn from_data_url(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Mime type declared by the data URL prefix, if there is one.
    pub fn declared_mime(&self) -> Option<&str> {
        let header = self.0.strip_prefix("data:")?.split(',').next()?;
        let mime = header.split(';').next()?.trim();
        if mime.is_empty() {
            None
        } else {
            Some(mime)
        }
    }

    /// Base64 payload with any `data:...base64,` prefix removed.
    pub fn payload(&self) -> &str {
        match self.0.split_once(',') {
            Some((_, data)) => data,
            None => &self.0,
        }
    }
}

/// One submission of the analysis form.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput {
    pub category: FamilyCategory,
    pub file_size_mb: f64,
    pub image: Option<EncodedImage>,
    pub additional_context: String,
}

impl AnalysisInput {
    pub fn new(
        category: FamilyCategory,
        file_size_mb: f64,
        image: Option<EncodedImage>,
        additional_context: impl Into<String>,
    ) -> Result<Self, InputError> {
        if !file_size_mb.is_finite() || file_size_mb <= 0.0 {
            return Err(InputError::InvalidFileSize(file_size_mb.to_string()));
        }
        Ok(Self {
            category,
            file_size_mb,
            image,
            additional_context: additional_context.into(),
        })
    }
}

/// Parses the free-text file size field.
pub fn parse_file_size_mb(raw: &str) -> Result<f64, InputError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| InputError::InvalidFileSize(raw.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(InputError::InvalidFileSize(raw.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_parse_from_labels_and_keys() -> anyhow::Result<()> {
        assert_eq!(
            "Lighting Fixtures".parse::<FamilyCategory>()?,
            FamilyCategory::Lighting
        );
        assert_eq!("doors".parse::<FamilyCategory>()?, FamilyCategory::Door);
        assert_eq!("DOOR".parse::<FamilyCategory>()?, FamilyCategory::Door);
        assert_eq!(
            "generic_models".parse::<FamilyCategory>()?,
            FamilyCategory::Generic
        );
        assert!("roofs".parse::<FamilyCategory>().is_err());
        assert!("".parse::<FamilyCategory>().is_err());
        Ok(())
    }

    #[test]
    fn category_serializes_as_label() -> anyhow::Result<()> {
        let encoded = serde_json::to_string(&FamilyCategory::Mechanical)?;
        assert_eq!(encoded, "\"Mechanical Equipment\"");
        assert_eq!(FamilyCategory::ALL.len(), 8);
        Ok(())
    }

    #[test]
    fn payload_strips_data_url_prefix() {
        let image = EncodedImage::from_data_url("data:image/jpeg;base64,QUJD");
        assert_eq!(image.payload(), "QUJD");
        assert_eq!(image.declared_mime(), Some("image/jpeg"));

        let bare = EncodedImage::from_data_url("QUJD");
        assert_eq!(bare.payload(), "QUJD");
        assert_eq!(bare.declared_mime(), None);
    }

    #[test]
    fn file_size_must_be_positive() {
        assert_eq!(parse_file_size_mb(" 2.5 ").ok(), Some(2.5));
        assert!(parse_file_size_mb("0").is_err());
        assert!(parse_file_size_mb("-1").is_err());
        assert!(parse_file_size_mb("abc").is_err());
        assert!(parse_file_size_mb("NaN").is_err());
        assert!(AnalysisInput::new(FamilyCategory::Door, f64::INFINITY, None, "").is_err());
    }
}
