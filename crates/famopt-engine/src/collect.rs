use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use famopt_contracts::analysis::{parse_file_size_mb, AnalysisInput, EncodedImage, FamilyCategory};
use famopt_contracts::error::InputError;
use image::ImageFormat;

pub const DEFAULT_FILE_SIZE_MB: &str = "0.5";

/// Editable form state. Turned into an `AnalysisInput` on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub category: FamilyCategory,
    pub file_size_mb: String,
    pub image: Option<EncodedImage>,
    pub image_source: Option<String>,
    pub additional_context: String,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            category: FamilyCategory::default(),
            file_size_mb: DEFAULT_FILE_SIZE_MB.to_string(),
            image: None,
            image_source: None,
            additional_context: String::new(),
        }
    }
}

impl FormDraft {
    pub fn set_category(&mut self, raw: &str) -> Result<FamilyCategory, InputError> {
        let category = raw.parse::<FamilyCategory>()?;
        self.category = category;
        Ok(category)
    }

    pub fn set_file_size(&mut self, raw: &str) -> Result<f64, InputError> {
        let value = parse_file_size_mb(raw)?;
        self.file_size_mb = raw.trim().to_string();
        Ok(value)
    }

    pub fn set_context(&mut self, text: &str) {
        self.additional_context = text.trim().to_string();
    }

    pub fn set_image_path(&mut self, path: &Path) -> Result<(), InputError> {
        let encoded = load_image_data_url(path)?;
        self.image = Some(encoded);
        self.image_source = Some(path.display().to_string());
        Ok(())
    }

    pub fn set_image_data_url(&mut self, data_url: impl Into<String>) {
        self.image = Some(EncodedImage::from_data_url(data_url));
        self.image_source = Some("inline data".to_string());
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn to_input(&self) -> Result<AnalysisInput, InputError> {
        let file_size_mb = parse_file_size_mb(&self.file_size_mb)?;
        AnalysisInput::new(
            self.category,
            file_size_mb,
            self.image.clone(),
            self.additional_context.clone(),
        )
    }
}

/// Reads an image file into a `data:<mime>;base64,<payload>` string.
pub fn load_image_data_url(path: &Path) -> Result<EncodedImage, InputError> {
    let bytes = fs::read(path).map_err(|source| InputError::ImageRead {
        path: path.display().to_string(),
        source,
    })?;
    let mime = detect_image_mime(path, &bytes)
        .ok_or_else(|| InputError::NotAnImage(path.display().to_string()))?;
    Ok(EncodedImage::from_data_url(format!(
        "data:{mime};base64,{}",
        BASE64.encode(bytes)
    )))
}

fn detect_image_mime(path: &Path, bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type());
    }
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    ImageFormat::from_extension(ext.as_str())
        .filter(|_| !bytes.is_empty())
        .map(|format| format.to_mime_type())
}
