//! The supported MIME type set and per-type conversion table.
//!
//! A fragment's Content-Type must have a base type (the part before any
//! `; charset=...` parameter) in the closed set below. Matching is an
//! exact, case-insensitive comparison of the base type; a candidate like
//! `text/plain-custom` is rejected even though it contains a known type.

use std::fmt;

/// A MIME type in the closed set of supported fragment types.
///
/// `application/x-yaml` is accepted on input and normalized to
/// [`FragmentType::Yaml`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentType {
    Plain,
    Markdown,
    Html,
    Csv,
    Json,
    Yaml,
    Png,
    Jpeg,
    Webp,
    Gif,
    Avif,
}

impl FragmentType {
    /// Every supported type, in table order.
    pub const ALL: [FragmentType; 11] = [
        FragmentType::Plain,
        FragmentType::Markdown,
        FragmentType::Html,
        FragmentType::Csv,
        FragmentType::Json,
        FragmentType::Yaml,
        FragmentType::Png,
        FragmentType::Jpeg,
        FragmentType::Webp,
        FragmentType::Gif,
        FragmentType::Avif,
    ];

    /// Parses a Content-Type value, ignoring parameters.
    ///
    /// Returns `None` when the base type is outside the supported set.
    pub fn parse(value: &str) -> Option<Self> {
        let base = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match base.as_str() {
            "text/plain" => Some(Self::Plain),
            "text/markdown" => Some(Self::Markdown),
            "text/html" => Some(Self::Html),
            "text/csv" => Some(Self::Csv),
            "application/json" => Some(Self::Json),
            "application/yaml" | "application/x-yaml" => Some(Self::Yaml),
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            "image/gif" => Some(Self::Gif),
            "image/avif" => Some(Self::Avif),
            _ => None,
        }
    }

    /// Returns true if the base type of `value` is in the supported set.
    #[must_use]
    pub fn is_supported(value: &str) -> bool {
        Self::parse(value).is_some()
    }

    /// The canonical base MIME type.
    #[must_use]
    pub const fn mime(&self) -> &'static str {
        match self {
            Self::Plain => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Html => "text/html",
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Yaml => "application/yaml",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::Avif => "image/avif",
        }
    }

    /// The MIME types this type's payload can be served as.
    ///
    /// Every list includes the type itself, so an identity conversion is
    /// always legal.
    #[must_use]
    pub const fn formats(&self) -> &'static [&'static str] {
        match self {
            Self::Plain => &["text/plain"],
            Self::Markdown => &["text/markdown", "text/html", "text/plain"],
            Self::Html => &["text/html", "text/plain"],
            Self::Csv => &["text/csv", "text/plain", "application/json"],
            Self::Json => &[
                "application/json",
                "text/plain",
                "application/yaml",
                "application/x-yaml",
            ],
            Self::Yaml => &["application/yaml", "text/plain"],
            Self::Png | Self::Jpeg | Self::Webp | Self::Gif | Self::Avif => {
                &["image/gif", "image/png", "image/jpeg", "image/webp", "image/avif"]
            }
        }
    }

    /// Returns true for `text/*` types.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Plain | Self::Markdown | Self::Html | Self::Csv)
    }

    /// Returns true for `image/*` types.
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Webp | Self::Gif | Self::Avif)
    }
}

impl fmt::Display for FragmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// The extension vocabulary accepted by conversion requests.
///
/// Callers resolve a requested suffix (e.g. the `.html` in
/// `GET /fragments/:id.html`) to a `TargetFormat` before invoking the
/// conversion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Txt,
    Md,
    Html,
    Json,
    Yaml,
    Csv,
    Png,
    Jpg,
    Gif,
    Webp,
    Avif,
}

impl TargetFormat {
    /// Resolves a file extension (without the dot, any case).
    ///
    /// `yml` is an alias of `yaml` and `jpeg` of `jpg`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "md" => Some(Self::Md),
            "html" => Some(Self::Html),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "csv" => Some(Self::Csv),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            "avif" => Some(Self::Avif),
            _ => None,
        }
    }

    /// The MIME type a conversion to this format produces.
    ///
    /// `application/x-yaml` requests normalize to `application/yaml` here.
    #[must_use]
    pub const fn mime(&self) -> &'static str {
        match self {
            Self::Txt => "text/plain",
            Self::Md => "text/markdown",
            Self::Html => "text/html",
            Self::Json => "application/json",
            Self::Yaml => "application/yaml",
            Self::Csv => "text/csv",
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Avif => "image/avif",
        }
    }

    /// The canonical extension string.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Md => "md",
            Self::Html => "html",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Avif => "avif",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
