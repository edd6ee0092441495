use async_trait::async_trait;
use reqwest::{Client, Request, StatusCode, Url};
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

use super::{
    RemoteDataSource, RemoteDataSourceError, RemoteDataSourceResult,
    auth::{AuthInterceptor, RequestInterceptor},
};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Current-weather lookups against the OpenWeather REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherRemoteDataSource {
    http: Client,
    endpoint: Url,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl OpenWeatherRemoteDataSource {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint, interceptors: Vec::new() }
    }

    /// Source with its own client that signs every request with `api_key`.
    pub fn authenticated(
        api_key: String,
        endpoint: Url,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(http, endpoint).with_interceptor(Arc::new(AuthInterceptor::new(api_key))))
    }

    /// Interceptors run in the order they were added.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    fn build_request(&self, city_name: &str) -> Result<Request, RemoteDataSourceError> {
        let request = self
            .http
            .get(self.endpoint.clone())
            .query(&[("q", city_name)])
            .build()
            .map_err(|e| RemoteDataSourceError::InvalidRequest(e.to_string()))?;

        Ok(self.interceptors.iter().fold(request, |request, i| i.intercept(request)))
    }
}

#[async_trait]
impl RemoteDataSource for OpenWeatherRemoteDataSource {
    async fn find_weather_by_city(&self, city_name: &str) -> RemoteDataSourceResult {
        let request = self.build_request(city_name)?;
        debug!(city = city_name, "requesting current weather");

        let res = self.http.execute(request).await.map_err(map_transport_error)?;

        let status = res.status();
        let body = res.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| RemoteDataSourceError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

fn map_transport_error(error: reqwest::Error) -> RemoteDataSourceError {
    warn!(error = %error, "weather request failed before a response arrived");
    RemoteDataSourceError::NetworkError
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteDataSourceError {
    match status {
        StatusCode::UNAUTHORIZED => RemoteDataSourceError::Unauthorized,
        StatusCode::NOT_FOUND => RemoteDataSourceError::NotFound(error_message(body)),
        _ => RemoteDataSourceError::Http {
            status: status.as_u16(),
            message: error_message(body),
        },
    }
}

/// OpenWeather error bodies look like `{"cod":"404","message":"city not found"}`.
fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<OwErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => truncate_body(&String::from_utf8_lossy(body)),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    const LONDON_JSON: &str = r#"{"weather":[{"description":"clear sky"}],"main":{"temp":290.15,"feels_like":289.0,"humidity":60},"wind":{"speed":3.2},"dt":1700000000,"sys":{"country":"GB"},"name":"London"}"#;

    fn test_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    /// Answers a single HTTP request with a canned response and hands back the
    /// raw request text it received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        let url = Url::parse(&format!("http://{addr}/data/2.5/weather")).unwrap();
        (url, handle)
    }

    fn source(endpoint: Url) -> OpenWeatherRemoteDataSource {
        OpenWeatherRemoteDataSource::new(test_client(), endpoint)
            .with_interceptor(Arc::new(AuthInterceptor::new("KEY")))
    }

    #[test]
    fn built_request_carries_city_and_key() {
        let endpoint = Url::parse(DEFAULT_ENDPOINT).unwrap();
        let request = source(endpoint).build_request("São Paulo").unwrap();

        let pairs: Vec<(String, String)> =
            request.url().query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "São Paulo".to_string()),
                ("appid".to_string(), "KEY".to_string()),
            ]
        );
    }

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, br#"{"cod":401,"message":"Invalid API key"}"#, RemoteDataSourceError::Unauthorized)]
    #[case::not_found(StatusCode::NOT_FOUND, br#"{"cod":"404","message":"city not found"}"#, RemoteDataSourceError::NotFound("city not found".to_string()))]
    #[case::not_found_plain_body(StatusCode::NOT_FOUND, b"nothing here", RemoteDataSourceError::NotFound("nothing here".to_string()))]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, br#"{"cod":429,"message":"limit exceeded"}"#, RemoteDataSourceError::Http { status: 429, message: "limit exceeded".to_string() })]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, b"", RemoteDataSourceError::Http { status: 500, message: String::new() })]
    fn maps_http_statuses(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: RemoteDataSourceError,
    ) {
        assert_eq!(map_status_error(status, body), expected);
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let message = error_message(body.as_bytes());
        assert_eq!(message.len(), 203);
        assert!(message.ends_with("..."));
    }

    #[tokio::test]
    async fn decodes_successful_response_and_sends_key() {
        let (endpoint, server) = serve_once("200 OK", LONDON_JSON).await;

        let raw = source(endpoint).find_weather_by_city("London").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(raw.name, "London");
        assert_eq!(raw.main.temp, 290.15);
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /data/2.5/weather?q=London&appid=KEY "));
    }

    #[tokio::test]
    async fn not_found_response_becomes_not_found() {
        let (endpoint, server) =
            serve_once("404 Not Found", r#"{"cod":"404","message":"city not found"}"#).await;

        let err = source(endpoint).find_weather_by_city("Atlantis").await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err, RemoteDataSourceError::NotFound("city not found".to_string()));
    }

    #[tokio::test]
    async fn malformed_payload_becomes_decode_error() {
        let (endpoint, server) = serve_once("200 OK", r#"{"name":"London"}"#).await;

        let err = source(endpoint).find_weather_by_city("London").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, RemoteDataSourceError::Decode(_)));
    }

    #[tokio::test]
    async fn refused_connection_becomes_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = Url::parse(&format!("http://{addr}/weather")).unwrap();
        let err = source(endpoint).find_weather_by_city("London").await.unwrap_err();

        assert_eq!(err, RemoteDataSourceError::NetworkError);
    }
}
