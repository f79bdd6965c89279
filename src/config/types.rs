use serde::Deserialize;

/// Main configuration structure for Evv-Harvest
///
/// Every section is optional; missing sections fall back to the values
/// used against the live site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub headers: HeadersConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the listings live
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site origin, e.g. `https://www.evv.az`
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path of the paginated listings index
    #[serde(rename = "index-path", default = "default_index_path")]
    pub index_path: String,

    /// Path of the AJAX endpoint that reveals a listing's phone number
    #[serde(rename = "phone-path", default = "default_phone_path")]
    pub phone_path: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of requests in flight across the whole run
    #[serde(
        rename = "max-concurrent-requests",
        default = "default_max_concurrent_requests"
    )]
    pub max_concurrent_requests: u32,

    /// Listings per index page; pagination offsets are multiples of this
    #[serde(rename = "page-stride", default = "default_page_stride")]
    pub page_stride: u32,

    /// Total per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Pause before each phone lookup (milliseconds)
    #[serde(rename = "phone-delay-ms", default = "default_phone_delay")]
    pub phone_delay_ms: u64,

    /// Page count used when neither an explicit count nor auto-detect is requested
    #[serde(rename = "default-pages", default = "default_pages")]
    pub default_pages: u32,

    /// Idle connections kept per host by the HTTP client
    #[serde(rename = "max-idle-connections", default = "default_max_idle")]
    pub max_idle_connections: usize,
}

/// Static browser-like headers sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct HeadersConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept")]
    pub accept: String,

    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,

    #[serde(default = "default_dnt")]
    pub dnt: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the CSV file receiving the records
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            index_path: default_index_path(),
            phone_path: default_phone_path(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent_requests(),
            page_stride: default_page_stride(),
            request_timeout_secs: default_request_timeout(),
            phone_delay_ms: default_phone_delay(),
            default_pages: default_pages(),
            max_idle_connections: default_max_idle(),
        }
    }
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            dnt: default_dnt(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

fn default_origin() -> String {
    "https://www.evv.az".to_string()
}

fn default_index_path() -> String {
    "/dasinmaz-emlak-elanlari".to_string()
}

fn default_phone_path() -> String {
    "/evvaz/get_phone".to_string()
}

fn default_max_concurrent_requests() -> u32 {
    5
}

fn default_page_stride() -> u32 {
    24
}

fn default_request_timeout() -> u64 {
    60
}

fn default_phone_delay() -> u64 {
    300
}

fn default_pages() -> u32 {
    3
}

fn default_max_idle() -> usize {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string()
}

fn default_accept_language() -> String {
    "en-GB,en-US;q=0.9,en;q=0.8,ru;q=0.7,az;q=0.6".to_string()
}

fn default_dnt() -> String {
    "1".to_string()
}

fn default_csv_path() -> String {
    "output/evv_az_listings.csv".to_string()
}
