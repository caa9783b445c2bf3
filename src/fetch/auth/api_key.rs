use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// The header is validated once at construction, so every request carries a
/// well-formed value.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .with_context(|| format!("invalid header name '{header_name}'"))?;
        let mut value = HeaderValue::from_str(key).context("API key is not a valid header value")?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name,
            value,
        })
    }

    /// `Authorization: Bearer <token>`, as issued by the dashboard's session login.
    pub fn bearer(inner: C, token: &str) -> Result<Self> {
        Self::new(inner, "Authorization", &format!("Bearer {token}"))
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopClient;

    #[async_trait]
    impl HttpClient for NoopClient {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            unreachable!("not called in these tests")
        }
    }

    #[test]
    fn test_bearer_formats_header() {
        let auth = ApiKey::bearer(NoopClient, "abc123").unwrap();
        assert_eq!(auth.header_name, reqwest::header::AUTHORIZATION);
        assert_eq!(auth.value.to_str().unwrap(), "Bearer abc123");
        assert!(auth.value.is_sensitive());
    }

    #[test]
    fn test_invalid_header_rejected() {
        assert!(ApiKey::new(NoopClient, "bad header", "k").is_err());
        assert!(ApiKey::bearer(NoopClient, "line\nbreak").is_err());
    }
}
