pub const DEFAULT_BASE_URL: &str = "https://www.geeksforgeeks.org";
pub const DEFAULT_SUBMISSIONS_API_URL: &str =
    "https://practiceapi.geeksforgeeks.org/api/v1/user/problems/submissions/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Upstream site root; profile pages live under `/profile/{username}`.
    pub gfg_base_url: String,
    pub submissions_api_url: String,
    pub profile_timeout_secs: u64,
    pub submissions_timeout_secs: u64,
    pub user_agent: String,
    pub analytics_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            gfg_base_url: DEFAULT_BASE_URL.to_string(),
            submissions_api_url: DEFAULT_SUBMISSIONS_API_URL.to_string(),
            profile_timeout_secs: 15,
            submissions_timeout_secs: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            analytics_enabled: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            gfg_base_url: std::env::var("GFG_BASE_URL")
                .unwrap_or(defaults.gfg_base_url)
                .trim_end_matches('/')
                .to_string(),
            submissions_api_url: std::env::var("GFG_SUBMISSIONS_API_URL")
                .unwrap_or(defaults.submissions_api_url),
            profile_timeout_secs: parse_timeout("PROFILE_TIMEOUT_SECS", defaults.profile_timeout_secs)?,
            submissions_timeout_secs: parse_timeout(
                "SUBMISSIONS_TIMEOUT_SECS",
                defaults.submissions_timeout_secs,
            )?,
            user_agent: std::env::var("GFG_USER_AGENT")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            analytics_enabled: analytics_enabled_from_env(),
        };

        validate_http_url("GFG_BASE_URL", &config.gfg_base_url)?;
        validate_http_url("GFG_SUBMISSIONS_API_URL", &config.submissions_api_url)?;

        // Log successful configuration load
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("GfG Base URL: {}", config.gfg_base_url);
        tracing::debug!("Submissions API URL: {}", config.submissions_api_url);
        tracing::debug!(
            "Timeouts: profile={}s submissions={}s",
            config.profile_timeout_secs,
            config.submissions_timeout_secs
        );
        tracing::debug!("Analytics enabled: {}", config.analytics_enabled);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Value sent as `Origin` to the submissions API: scheme and host of the site.
    pub fn upstream_origin(&self) -> String {
        match url::Url::parse(&self.gfg_base_url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => self.gfg_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn upstream_referer(&self) -> String {
        format!("{}/", self.upstream_origin())
    }
}

fn parse_timeout(var: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(var) {
        Ok(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("{} must be a whole number of seconds", var))?;
            if secs == 0 {
                anyhow::bail!("{} must be greater than zero", var);
            }
            Ok(secs)
        }
        Err(_) => Ok(default),
    }
}

fn validate_http_url(var: &str, value: &str) -> anyhow::Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", var);
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", var);
    }
    url::Url::parse(value).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", var, e))?;
    Ok(())
}

fn analytics_enabled_from_env() -> bool {
    if let Ok(flag) = std::env::var("ANALYTICS_ENABLED") {
        return matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
    }
    std::env::var("VERCEL_ENV").is_ok() || std::env::var("VERCEL").as_deref() == Ok("1")
}
