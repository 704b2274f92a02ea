//! Desktop browser profile.
//!
//! Cinema and title sites serve reduced or bot-specific markup to unknown
//! clients, so every request (and the headless renderer) presents one
//! consistent desktop Chrome identity.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT,
};
use tracing::warn;

/// Chrome release presented by [`BrowserProfile::desktop_chrome`].
const CHROME_MAJOR: &str = "123";

/// Desktop Chrome on macOS.
pub const DESKTOP_CHROME_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Request identity sent with every page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub accept_encoding: String,
    pub sec_ch_ua: String,
    pub sec_ch_ua_mobile: String,
    pub sec_ch_ua_platform: String,
}

impl BrowserProfile {
    #[must_use]
    pub fn desktop_chrome() -> Self {
        Self {
            user_agent: DESKTOP_CHROME_UA.to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            accept_encoding: "gzip, deflate, br, zstd".to_string(),
            sec_ch_ua: format!(
                "\"Google Chrome\";v=\"{CHROME_MAJOR}\", \"Chromium\";v=\"{CHROME_MAJOR}\", \"Not_A Brand\";v=\"24\""
            ),
            sec_ch_ua_mobile: "?0".to_string(),
            sec_ch_ua_platform: "\"macOS\"".to_string(),
        }
    }

    /// Convert profile to reqwest `HeaderMap`.
    ///
    /// Values that are not valid header text are skipped with a warning.
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let pairs = [
            (USER_AGENT, &self.user_agent),
            (ACCEPT, &self.accept),
            (ACCEPT_LANGUAGE, &self.accept_language),
            (ACCEPT_ENCODING, &self.accept_encoding),
            (HeaderName::from_static("sec-ch-ua"), &self.sec_ch_ua),
            (HeaderName::from_static("sec-ch-ua-mobile"), &self.sec_ch_ua_mobile),
            (HeaderName::from_static("sec-ch-ua-platform"), &self.sec_ch_ua_platform),
        ];

        for (name, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(_) => warn!(header = %name, "skipping invalid header value"),
            }
        }

        headers.insert(
            HeaderName::from_static("upgrade-insecure-requests"),
            HeaderValue::from_static("1"),
        );

        headers
    }
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self::desktop_chrome()
    }
}
