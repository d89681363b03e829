use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the public site; emailed links point here.
    pub public_site_url: String,
    /// How long approved-testimonial lists are served from memory.
    pub approved_cache_ttl_secs: u64,
    /// Issuer label shown by authenticator apps.
    pub mfa_issuer: String,
    /// Phone number used for course inquiry WhatsApp links, if any.
    pub contact_whatsapp_phone: Option<String>,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `PUBLIC_SITE_URL`         | `http://localhost:5173` |
    /// | `APPROVED_CACHE_TTL_SECS` | `60`                    |
    /// | `MFA_ISSUER`              | `Campus`                |
    /// | `CONTACT_WHATSAPP_PHONE`  | unset                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_site_url = std::env::var("PUBLIC_SITE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let approved_cache_ttl_secs: u64 = std::env::var("APPROVED_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("APPROVED_CACHE_TTL_SECS must be a valid u64");

        let mfa_issuer = std::env::var("MFA_ISSUER").unwrap_or_else(|_| "Campus".into());

        let contact_whatsapp_phone = std::env::var("CONTACT_WHATSAPP_PHONE")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_site_url,
            approved_cache_ttl_secs,
            mfa_issuer,
            contact_whatsapp_phone,
            jwt,
        }
    }
}
