use std::env;

#[derive(Debug, Clone)]
pub struct ApiUrl(String);

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ApiUrl {
    /// Creates a new ApiUrl from the environment variable `FITLOG_API_URL`.
    pub fn from_env() -> Self {
        Self::new(env::var("FITLOG_API_URL").expect("FITLOG_API_URL must be set in env"))
    }

    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into().trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }
}
