/// Default region when `STORAGE_REGION` is not set.
const DEFAULT_REGION: &str = "us-east-1";

/// Default public base when `STORAGE_PUBLIC_URL` is not set (local MinIO).
const DEFAULT_PUBLIC_URL: &str = "http://localhost:9000";

/// Connection settings for the S3-compatible object store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Custom endpoint (MinIO, R2, Supabase storage). `None` uses AWS.
    pub endpoint: Option<String>,
    pub region: String,
    /// Base URL objects are publicly served from: `<base>/<bucket>/<path>`.
    pub public_base_url: String,
    /// Path-style addressing, required by most self-hosted endpoints.
    pub force_path_style: bool,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// Credentials come from the standard AWS chain (`AWS_ACCESS_KEY_ID`,
    /// `AWS_SECRET_ACCESS_KEY`, profiles, ...).
    ///
    /// | Variable                   | Default                  |
    /// |----------------------------|--------------------------|
    /// | `STORAGE_ENDPOINT`         | AWS                      |
    /// | `STORAGE_REGION`           | `us-east-1`              |
    /// | `STORAGE_PUBLIC_URL`       | `http://localhost:9000`  |
    /// | `STORAGE_FORCE_PATH_STYLE` | `true`                   |
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("STORAGE_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            public_base_url: std::env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string()),
            force_path_style: std::env::var("STORAGE_FORCE_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}
