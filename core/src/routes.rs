//! URL construction for the Smartwaiver v4 routes.
//!
//! Pure string building: no I/O and no validation of ids beyond
//! percent-encoding them into the path.

pub const TEMPLATES_PATH: &str = "/v4/templates";
pub const WAIVERS_PATH: &str = "/v4/waivers";
pub const WEBHOOKS_PATH: &str = "/v4/webhooks/configure";

/// Default page size of the waiver list query, same as the API's.
pub const DEFAULT_WAIVER_LIMIT: u32 = 20;

/// Filters for the waiver summary list query.
///
/// `limit` is always sent. Every other filter is only appended when set,
/// in the order `verified`, `templateId`, `fromDts`, `toDts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaiverQuery {
    pub limit: u32,
    /// `Some(true)` for email-verified waivers only, `Some(false)` for
    /// unverified only, `None` for both.
    pub verified: Option<bool>,
    pub template_id: Option<String>,
    /// ISO 8601 lower bound on the signing date.
    pub from_dts: Option<String>,
    /// ISO 8601 upper bound on the signing date.
    pub to_dts: Option<String>,
}

impl Default for WaiverQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_WAIVER_LIMIT,
            verified: None,
            template_id: None,
            from_dts: None,
            to_dts: None,
        }
    }
}

impl WaiverQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    #[must_use]
    pub fn template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    #[must_use]
    pub fn from_dts(mut self, from_dts: impl Into<String>) -> Self {
        self.from_dts = Some(from_dts.into());
        self
    }

    #[must_use]
    pub fn to_dts(mut self, to_dts: impl Into<String>) -> Self {
        self.to_dts = Some(to_dts.into());
        self
    }

    /// Renders the query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut params = vec![format!("limit={}", self.limit)];

        if let Some(verified) = self.verified {
            params.push(format!("verified={verified}"));
        }
        let optional = [
            ("templateId", &self.template_id),
            ("fromDts", &self.from_dts),
            ("toDts", &self.to_dts),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                params.push(format!("{name}={}", urlencoding::encode(value)));
            }
        }

        params.join("&")
    }
}

/// Builds absolute URLs against a fixed base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    base_url: String,
}

impl Routes {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn templates(&self) -> String {
        format!("{}{TEMPLATES_PATH}", self.base_url)
    }

    pub fn template(&self, template_id: &str) -> String {
        format!(
            "{}{TEMPLATES_PATH}/{}",
            self.base_url,
            urlencoding::encode(template_id)
        )
    }

    pub fn waivers(&self, query: &WaiverQuery) -> String {
        format!("{}{WAIVERS_PATH}?{}", self.base_url, query.to_query_string())
    }

    /// The `pdf` flag is always sent, lower-cased.
    pub fn waiver(&self, waiver_id: &str, pdf: bool) -> String {
        format!(
            "{}{WAIVERS_PATH}/{}?pdf={pdf}",
            self.base_url,
            urlencoding::encode(waiver_id)
        )
    }

    /// Used for both reading and writing the webhook configuration.
    pub fn webhook_config(&self) -> String {
        format!("{}{WEBHOOKS_PATH}", self.base_url)
    }
}
