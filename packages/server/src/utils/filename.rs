/// Longest filename accepted, in bytes.
pub const MAX_FILENAME_LEN: usize = 255;

/// Reasons an uploaded filename is refused.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    Empty,
    TooLong,
    /// Contains `/` or `\`, or is `..`.
    PathComponent,
    /// Contains NUL, CR, LF or another control character.
    ControlCharacter,
}

impl FilenameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::TooLong => "Filename must be at most 255 bytes",
            Self::PathComponent => "Filename must not contain path components",
            Self::ControlCharacter => "Filename must not contain control characters",
        }
    }
}

/// Validate the name a student gave their upload and return it trimmed.
///
/// The name is only stored and echoed back in `Content-Disposition`; it never
/// touches the filesystem, but header injection still has to be ruled out.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }
    if trimmed.len() > MAX_FILENAME_LEN {
        return Err(FilenameError::TooLong);
    }
    if trimmed.chars().any(char::is_control) {
        return Err(FilenameError::ControlCharacter);
    }
    if trimmed.contains(['/', '\\']) || trimmed == ".." {
        return Err(FilenameError::PathComponent);
    }

    Ok(trimmed)
}

/// Build a download `Content-Disposition` value with an ASCII fallback and an
/// RFC 5987 `filename*` for the exact name.
pub fn attachment_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let fallback = if fallback.is_empty() {
        "download".to_string()
    } else {
        fallback
    };

    let encoded: String = filename
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
