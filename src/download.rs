use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use simple_error::simple_error;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Default, Debug)]
pub struct Download {
    pub data: Bytes,
    pub content_type: Option<String>,
}
impl Download {
    pub fn new(data: Bytes, content_type: Option<String>) -> Download {
        Self { data, content_type }
    }
    pub fn looks_like_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(true, |ct| ct.starts_with("image/"))
    }
}

pub fn client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::ClientBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// GET a JSON document, failing on transport errors, non-2xx statuses and decode errors
pub async fn fetch_json<T>(client: &reqwest::Client, url: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("couldn't fetch `{url}`"))?
        .error_for_status()?;
    debug!("fetched `{url}` ({})", resp.status());

    resp.json().await.with_context(|| format!("couldn't decode JSON from `{url}`"))
}

/// Buffer the whole body behind `url` in memory
pub async fn download(client: &reqwest::Client, url: &str) -> Result<Download> {
    let resp = client.get(url).send().await?.error_for_status()?;
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let data = resp.bytes().await?;

    if data.is_empty() {
        return Err(simple_error!("empty response body").into());
    }

    let dl = Download::new(data, content_type);
    if !dl.looks_like_image() {
        warn!(
            "`{url}` answered with `{}`, uploading it anyway",
            dl.content_type.as_deref().unwrap_or_default()
        );
    }
    Ok(dl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00];

    fn test_client() -> reqwest::Client {
        client(Duration::from_secs(5)).unwrap()
    }

    #[derive(Debug, Deserialize)]
    struct Doc {
        value: u32,
    }

    #[test]
    fn content_type_check() {
        let png = Download::new(Bytes::from_static(PNG), Some("image/png".into()));
        let html = Download::new(Bytes::from_static(b"<html>"), Some("text/html".into()));
        let unknown = Download::new(Bytes::from_static(PNG), None);
        assert!(png.looks_like_image());
        assert!(!html.looks_like_image());
        assert!(unknown.looks_like_image());
    }

    #[tokio::test]
    async fn download_buffers_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.png"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PNG.to_vec(), "image/png"))
            .expect(1)
            .mount(&server)
            .await;

        let dl = download(&test_client(), &format!("{}/a.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(&dl.data[..], PNG);
        assert_eq!(dl.content_type.as_deref(), Some("image/png"));
        server.verify().await;
    }

    #[tokio::test]
    async fn download_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.png"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let result = download(&test_client(), &format!("{}/missing.png", server.uri())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn download_fails_on_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let result = download(&test_client(), &format!("{}/empty.png", server.uri())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fetch_json_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"value": 7}"#))
            .mount(&server)
            .await;

        let doc: Doc = fetch_json(&test_client(), &format!("{}/doc.json", server.uri()))
            .await
            .unwrap();
        assert_eq!(doc.value, 7);
    }

    #[tokio::test]
    async fn fetch_json_rejects_error_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"value": 7}"#))
            .mount(&server)
            .await;

        let url = format!("{}/doc.json", server.uri());
        let result: Result<Doc> = fetch_json(&test_client(), &url).await;
        assert!(result.is_err());
    }
}
