//! Social intent URLs and the duplicate-open guard

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;

/// `application/x-www-form-urlencoded` escape set: everything except
/// alphanumerics and `*-._` is escaped, and spaces become `+`
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    X,
    Facebook,
    Line,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 3] = [
        SocialPlatform::X,
        SocialPlatform::Facebook,
        SocialPlatform::Line,
    ];
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocialPlatform::X => write!(f, "x"),
            SocialPlatform::Facebook => write!(f, "facebook"),
            SocialPlatform::Line => write!(f, "line"),
        }
    }
}

impl FromStr for SocialPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" | "twitter" => Ok(SocialPlatform::X),
            "facebook" | "fb" => Ok(SocialPlatform::Facebook),
            "line" => Ok(SocialPlatform::Line),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

fn form_encode(value: &str) -> String {
    utf8_percent_encode(value, FORM)
        .to_string()
        .replace("%20", "+")
}

fn query(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Prefilled share URL for `platform`.
///
/// - X: `text` plus comma-joined `hashtags`
/// - Facebook: only `link` is shared (empty when absent)
/// - LINE: `text`, followed by `link` when present
pub fn build_social_intent_url<S: AsRef<str>>(
    platform: SocialPlatform,
    text: &str,
    hashtags: &[S],
    link: Option<&str>,
) -> String {
    match platform {
        SocialPlatform::X => {
            let tags = hashtags
                .iter()
                .map(|t| t.as_ref())
                .collect::<Vec<_>>()
                .join(",");
            format!(
                "https://x.com/intent/post?{}",
                query(&[("text", text), ("hashtags", &tags)])
            )
        }
        SocialPlatform::Facebook => format!(
            "https://www.facebook.com/sharer/sharer.php?{}",
            query(&[("u", link.unwrap_or_default())])
        ),
        SocialPlatform::Line => {
            let body = match link {
                Some(link) => format!("{text} {link}"),
                None => text.to_string(),
            };
            format!(
                "https://social-plugins.line.me/lineit/share?{}",
                query(&[("text", &body)])
            )
        }
    }
}

/// Rejects repeated acquisitions inside a fixed window.
///
/// The guard releases on its own once the window has passed since the
/// last successful acquisition; nothing needs to reset it.
#[derive(Debug)]
pub struct IntentGuard {
    window: Duration,
    last: Option<Instant>,
}

impl IntentGuard {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        if let Some(last) = self.last {
            if now.duration_since(last) < self.window {
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    /// Drop the hold so the next call is accepted immediately
    pub fn release(&mut self) {
        self.last = None;
    }

    pub fn is_held(&self) -> bool {
        self.last
            .is_some_and(|last| last.elapsed() < self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NO_TAGS: [&str; 0] = [];

    #[test]
    fn test_x_url_encodes_text_and_tags() {
        let url = build_social_intent_url(SocialPlatform::X, "テスト", &["A", "B"], None);
        assert!(url.starts_with("https://x.com/intent/post?"));
        assert!(url.contains("text=%E3%83%86%E3%82%B9%E3%83%88"));
        assert!(url.contains("hashtags=A%2CB"));
    }

    #[test]
    fn test_form_encoding_rules() {
        let url = build_social_intent_url(SocialPlatform::Line, "a b&c=d*-._~\n", &NO_TAGS, None);
        assert_eq!(
            url,
            "https://social-plugins.line.me/lineit/share?text=a+b%26c%3Dd*-._%7E%0A"
        );
    }

    #[test]
    fn test_facebook_shares_link() {
        let url = build_social_intent_url(
            SocialPlatform::Facebook,
            "ignored",
            &NO_TAGS,
            Some("https://example.com/team?id=1"),
        );
        assert_eq!(
            url,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com%2Fteam%3Fid%3D1"
        );
    }

    #[test]
    fn test_line_appends_link() {
        let url = build_social_intent_url(SocialPlatform::Line, "hi", &NO_TAGS, Some("https://e.x"));
        assert_eq!(
            url,
            "https://social-plugins.line.me/lineit/share?text=hi+https%3A%2F%2Fe.x"
        );
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!("twitter".parse(), Ok(SocialPlatform::X));
        assert_eq!("LINE".parse(), Ok(SocialPlatform::Line));
        assert!("myspace".parse::<SocialPlatform>().is_err());
        for platform in SocialPlatform::ALL {
            assert_eq!(platform.to_string().parse(), Ok(platform));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_window() {
        let mut guard = IntentGuard::new(Duration::from_millis(800));

        assert!(guard.try_acquire());
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!guard.try_acquire());
        assert!(guard.is_held());

        tokio::time::advance(Duration::from_millis(800)).await;
        assert!(!guard.is_held());
        assert!(guard.try_acquire());
    }
}
