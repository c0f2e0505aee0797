use std::path::Path;
use thiserror::Error;

/// Largest accepted upload: 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("image is {size} bytes; the limit is 5 MB")]
    ImageTooLarge { size: usize },

    #[error("unsupported image type ({0}); use JPEG, PNG or GIF")]
    UnsupportedImageType(String),

    #[error("invalid date '{0}'; expected YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
        }
    }

    /// Magic-byte sniffing.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageKind::Jpeg)
        } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageKind::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageKind::Gif)
        } else {
            None
        }
    }

    pub fn from_extension(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }
}

/// An image that passed the client-side checks. Only [`validate_image`]
/// builds one, so services can take it without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    kind: ImageKind,
    bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_part(&self) -> reqwest::Result<reqwest::multipart::Part> {
        reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(self.kind.mime())
    }
}

/// Size first, then type. The content decides the type when it is
/// recognisable; otherwise the extension does.
pub fn validate_image(file_name: &str, bytes: Vec<u8>) -> Result<ImageUpload, ValidationError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::ImageTooLarge { size: bytes.len() });
    }
    let kind = ImageKind::sniff(&bytes)
        .or_else(|| ImageKind::from_extension(file_name))
        .ok_or_else(|| {
            ValidationError::UnsupportedImageType(
                Path::new(file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase())
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        })?;
    Ok(ImageUpload {
        file_name: file_name.to_string(),
        kind,
        bytes,
    })
}

/// Image picker state: a rejected file leaves the previous selection alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSelection {
    selected: Option<ImageUpload>,
    error: Option<String>,
}

impl ImageSelection {
    pub fn select(&mut self, file_name: &str, bytes: Vec<u8>) -> bool {
        match validate_image(file_name, bytes) {
            Ok(upload) => {
                self.selected = Some(upload);
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.error = None;
    }

    pub fn selected(&self) -> Option<&ImageUpload> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// `"a, b ,c,"` becomes `["a", "b", "c"]`.
pub fn normalize_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed)
    }
}

/// Parses a publish date typed by an admin. Blank input is `Ok(None)`.
pub fn parse_publish_date(
    input: &str,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, ValidationError> {
    use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(input) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(Some(Utc.from_utc_datetime(&naive)));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(Utc.from_utc_datetime(&naive)));
        }
    }
    Err(ValidationError::InvalidDate(input.to_string()))
}
