//! Absolute asset URLs for provider image paths.

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/";
pub const PLACEHOLDER_ASSET: &str = "assets/images/dummy-img.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    Standard,
    Medium,
    High,
}

impl ImageSize {
    pub fn token(&self) -> &'static str {
        match self {
            ImageSize::Standard => "w500",
            ImageSize::Medium => "w1280",
            ImageSize::High => "original",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageUrls {
    placeholder: String,
}

impl ImageUrls {
    /// `app_url` is the public origin the placeholder asset is served from.
    pub fn new(app_url: &str) -> Self {
        Self {
            placeholder: format!("{}/{PLACEHOLDER_ASSET}", app_url.trim_end_matches('/')),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn format(&self, path: Option<&str>, size: ImageSize) -> String {
        match path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => format!("{IMAGE_BASE}{}{p}", size.token()),
            None => self.placeholder.clone(),
        }
    }
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new("http://localhost")
    }
}

/// Recovers the raw provider path (`/abc.jpg`) from a formatted URL.
/// Placeholder and foreign URLs yield `None`.
pub fn provider_path(url: &str) -> Option<String> {
    let rest = url.strip_prefix(IMAGE_BASE)?;
    let slash = rest.find('/')?;
    let path = &rest[slash..];
    (path.len() > 1).then(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_tier() {
        let urls = ImageUrls::default();
        assert_eq!(
            urls.format(Some("/x.jpg"), ImageSize::Standard),
            "https://image.tmdb.org/t/p/w500/x.jpg"
        );
        assert_eq!(
            urls.format(Some("/x.jpg"), ImageSize::Medium),
            "https://image.tmdb.org/t/p/w1280/x.jpg"
        );
        assert_eq!(
            urls.format(Some("/x.jpg"), ImageSize::High),
            "https://image.tmdb.org/t/p/original/x.jpg"
        );
    }

    #[test]
    fn missing_or_blank_path_uses_placeholder() {
        let urls = ImageUrls::new("https://cinedex.example/");
        let expected = "https://cinedex.example/assets/images/dummy-img.png";
        assert_eq!(urls.format(None, ImageSize::High), expected);
        assert_eq!(urls.format(Some(""), ImageSize::Standard), expected);
        assert_eq!(urls.format(Some("  "), ImageSize::Medium), expected);
    }

    #[test]
    fn recovers_provider_path() {
        assert_eq!(
            provider_path("https://image.tmdb.org/t/p/w500/x.jpg").as_deref(),
            Some("/x.jpg")
        );
        assert_eq!(provider_path(ImageUrls::default().placeholder()), None);
    }
}
