use reqwest::Request;
use std::fmt::Debug;

/// Query parameter OpenWeather reads the API key from.
pub const API_KEY_PARAM: &str = "appid";

/// Hook run on every request a remote data source sends.
pub trait RequestInterceptor: Send + Sync + Debug {
    fn intercept(&self, request: Request) -> Request;
}

/// Appends the API key as a query parameter, leaving the rest of the request
/// untouched.
#[derive(Clone)]
pub struct AuthInterceptor {
    api_key: String,
}

impl AuthInterceptor {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }
}

impl Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor").field("api_key", &"<redacted>").finish()
    }
}

impl RequestInterceptor for AuthInterceptor {
    fn intercept(&self, mut request: Request) -> Request {
        request.url_mut().query_pairs_mut().append_pair(API_KEY_PARAM, &self.api_key);
        request
    }
}
