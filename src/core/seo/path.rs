use once_cell::sync::Lazy;
use regex::Regex;

/// `/google<token>.html` request paths.
static VERIFICATION_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/google([A-Za-z0-9_-]+)\.html$").expect("valid regex"));

/// `google<token>.html` file names as issued by Google.
static VERIFICATION_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^google([A-Za-z0-9_-]+)\.html$").expect("valid regex"));

pub const SITEMAP_PATH: &str = "/sitemap.xml";
pub const ROBOTS_PATH: &str = "/robots.txt";

/// Well-known SEO file a request path refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeoPath {
    Sitemap,
    Robots,
    /// A Google HTML verification file.
    VerificationFile {
        /// File name without the leading slash, e.g. `googleABC123.html`.
        file_name: String,
        /// Lookup key, e.g. `ABC123`.
        token: String,
    },
    /// Anything this layer does not serve.
    Other,
}

impl SeoPath {
    /// Classifies a request path. Matching is exact; query strings must already be stripped.
    pub fn classify(path: &str) -> Self {
        match path {
            SITEMAP_PATH => Self::Sitemap,
            ROBOTS_PATH => Self::Robots,
            _ => match VERIFICATION_PATH_RE.captures(path) {
                Some(caps) => Self::VerificationFile {
                    file_name: path[1..].to_string(),
                    token: caps[1].to_string(),
                },
                None => Self::Other,
            },
        }
    }
}

/// Extracts the lookup key from an issued verification file name.
///
/// The `google` prefix and `.html` suffix are stripped: `googleABC123.html`
/// → `ABC123`. This is the same key [`SeoPath::classify`] extracts from
/// `/googleABC123.html`, so issuance and serving always agree.
pub fn token_from_file_name(file_name: &str) -> Option<String> {
    VERIFICATION_FILE_RE
        .captures(file_name)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sitemap_and_robots() {
        assert_eq!(SeoPath::classify("/sitemap.xml"), SeoPath::Sitemap);
        assert_eq!(SeoPath::classify("/robots.txt"), SeoPath::Robots);
    }

    #[test]
    fn test_classify_exact_match_only() {
        assert_eq!(SeoPath::classify("/sitemap.xml/"), SeoPath::Other);
        assert_eq!(SeoPath::classify("/blog/sitemap.xml"), SeoPath::Other);
        assert_eq!(SeoPath::classify("/ROBOTS.TXT"), SeoPath::Other);
    }

    #[test]
    fn test_classify_verification_file() {
        assert_eq!(
            SeoPath::classify("/google5f84cf98cef09ae3.html"),
            SeoPath::VerificationFile {
                file_name: "google5f84cf98cef09ae3.html".to_string(),
                token: "5f84cf98cef09ae3".to_string(),
            }
        );
        assert_eq!(
            SeoPath::classify("/googleA_b-9.html"),
            SeoPath::VerificationFile {
                file_name: "googleA_b-9.html".to_string(),
                token: "A_b-9".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_rejects_malformed_verification_paths() {
        assert_eq!(SeoPath::classify("/google.html"), SeoPath::Other);
        assert_eq!(SeoPath::classify("/google..%2f.html"), SeoPath::Other);
        assert_eq!(SeoPath::classify("/nested/googleABC.html"), SeoPath::Other);
        assert_eq!(SeoPath::classify("/googleABC.htm"), SeoPath::Other);
        assert_eq!(SeoPath::classify("/"), SeoPath::Other);
    }

    #[test]
    fn test_token_from_file_name() {
        assert_eq!(
            token_from_file_name("googleABC123.html"),
            Some("ABC123".to_string())
        );
        assert_eq!(token_from_file_name("ABC123.html"), None);
        assert_eq!(token_from_file_name("googleABC123"), None);
        assert_eq!(token_from_file_name("google.html"), None);
    }

    #[test]
    fn test_issuance_and_serving_agree() {
        let file_name = "googleXyZ-42.html";
        let token = token_from_file_name(file_name).unwrap();
        match SeoPath::classify(&format!("/{file_name}")) {
            SeoPath::VerificationFile { token: served, .. } => assert_eq!(served, token),
            other => panic!("Expected VerificationFile, got {other:?}"),
        }
    }
}
