//! Gravatar URL derivation

use sha2::{Digest, Sha256};

/// Public Gravatar host used when no override is configured
pub const DEFAULT_GRAVATAR_BASE_URL: &str = "https://www.gravatar.com";

/// Avatar size requested when the caller gives none or an unusable one
pub const DEFAULT_AVATAR_SIZE: u32 = 80;

/// Trim and lowercase an email the way Gravatar expects before hashing.
///
/// U+FEFF counts as whitespace here, matching browser-side `trim()`.
pub fn normalize_email(email: &str) -> String {
    email
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_lowercase()
}

/// Hex encoded SHA-256 of the normalized email
pub fn email_hash(email: &str) -> String {
    let digest = Sha256::digest(normalize_email(email).as_bytes());
    hex::encode(digest)
}

/// Parse the `size` query parameter.
///
/// Parsing is lenient: leading whitespace is skipped and trailing garbage
/// after the leading digits is ignored, so `"120px"` yields 120. Anything
/// without leading digits, zero, negative values and values that overflow
/// fall back to [`DEFAULT_AVATAR_SIZE`].
pub fn parse_size(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_AVATAR_SIZE;
    };

    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    match unsigned[..digits_end].parse::<u32>() {
        Ok(size) if size > 0 => size,
        _ => DEFAULT_AVATAR_SIZE,
    }
}

/// Builds identicon-backed avatar URLs against a Gravatar-compatible host
#[derive(Clone, Debug)]
pub struct GravatarUrlBuilder {
    base_url: String,
}

impl Default for GravatarUrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVATAR_BASE_URL)
    }
}

impl GravatarUrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/avatar/<sha256(email)>?s=<size>&d=identicon`
    pub fn avatar_url(&self, email: &str, size: u32) -> String {
        format!(
            "{}/avatar/{}?s={}&d=identicon",
            self.base_url,
            email_hash(email),
            size
        )
    }
}
