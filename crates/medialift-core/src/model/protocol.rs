// ── Site protocol ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// URL scheme used to reach a site.
///
/// Older installs stored the scheme as a free-form string; anything that
/// isn't recognizably `https` is treated as plain `http` on decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SiteProtocol {
    #[default]
    Http,
    Https,
}

impl SiteProtocol {
    /// Lenient parse for legacy free-form scheme strings.
    pub fn from_legacy(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("https") {
            Self::Https
        } else {
            Self::Http
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_lowercase() {
        assert_eq!(SiteProtocol::Https.to_string(), "https");
        assert_eq!(SiteProtocol::Http.to_string(), "http");
    }

    #[test]
    fn legacy_parse_is_lenient() {
        assert_eq!(SiteProtocol::from_legacy("HTTPS"), SiteProtocol::Https);
        assert_eq!(SiteProtocol::from_legacy(" https "), SiteProtocol::Https);
        assert_eq!(SiteProtocol::from_legacy("http"), SiteProtocol::Http);
        assert_eq!(SiteProtocol::from_legacy("gopher"), SiteProtocol::Http);
        assert_eq!(SiteProtocol::from_legacy(""), SiteProtocol::Http);
    }
}
