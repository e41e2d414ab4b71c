use bytes::Bytes;
use log::{debug, trace};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("couldn't decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Added,
    /// The workspace accepted the request but reported an error, e.g. `error_name_taken`
    Rejected(String),
}

/// `emoji.add` answers 200 with `ok` and `error` fields even when the upload failed
#[derive(Debug, Default, Deserialize)]
pub struct EmojiAddResponse {
    pub ok: Option<bool>,
    pub error: Option<String>,
}

/// Guess the image type from its magic bytes
pub fn sniff_mime(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [0xff, 0xd8, 0xff, ..] => "image/jpeg",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}

/// The four parts of an `emoji.add` request
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub file_name: String,
    pub mime: &'static str,
    pub image: Bytes,
    pub fields: [(&'static str, String); 3],
}

impl UploadForm {
    pub fn new(image: Bytes, name: &str, token: &str) -> UploadForm {
        Self {
            file_name: format!("{name}.png"),
            mime: sniff_mime(&image),
            image,
            fields: [
                ("mode", "data".to_string()),
                ("name", name.to_lowercase()),
                ("token", token.to_string()),
            ],
        }
    }

    pub fn emoji_name(&self) -> &str {
        &self.fields[1].1
    }

    pub fn into_multipart(self) -> Result<Form, reqwest::Error> {
        let image = Part::bytes(self.image.to_vec())
            .file_name(self.file_name)
            .mime_str(self.mime)?;
        let form = self
            .fields
            .into_iter()
            .fold(Form::new().part("image", image), |form, (key, value)| {
                form.text(key, value)
            });
        Ok(form)
    }
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

pub async fn upload(
    client: &reqwest::Client,
    url: &str,
    form: UploadForm,
) -> Result<UploadOutcome, UploadError> {
    let name = form.emoji_name().to_string();
    debug!(
        "uploading emoji `{name}` ({}, {} bytes) to `{url}`",
        form.mime,
        form.image.len()
    );

    let resp = client
        .post(url)
        .multipart(form.into_multipart()?)
        .send()
        .await?;
    let status = resp.status();
    let body = resp.text().await?;
    trace!("`{url}` answered {status} for `{name}`: {body}");

    if !status.is_success() {
        return Err(UploadError::Status {
            status,
            body: truncate(&body, 200),
        });
    }

    let data: EmojiAddResponse = serde_json::from_str(&body)?;
    match (data.ok, data.error) {
        (_, Some(error)) => Ok(UploadOutcome::Rejected(error)),
        (Some(false), None) => Ok(UploadOutcome::Rejected("unknown_error".into())),
        _ => Ok(UploadOutcome::Added),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x01, 0x02];

    fn test_client() -> reqwest::Client {
        crate::download::client(std::time::Duration::from_secs(5)).unwrap()
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_mime(PNG), "image/png");
        assert_eq!(sniff_mime(b"GIF89a..."), "image/gif");
        assert_eq!(sniff_mime(&[0xff, 0xd8, 0xff, 0xe0]), "image/jpeg");
        assert_eq!(sniff_mime(b"RIFF\x10\x00\x00\x00WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"<html>"), "application/octet-stream");
        assert_eq!(sniff_mime(b""), "application/octet-stream");
    }

    #[test]
    fn form_fields() {
        let form = UploadForm::new(Bytes::from_static(PNG), "KappaPride", "xoxs-123");
        assert_eq!(form.file_name, "KappaPride.png");
        assert_eq!(form.mime, "image/png");
        assert_eq!(&form.image[..], PNG);
        assert_eq!(form.emoji_name(), "kappapride");
        assert_eq!(
            form.fields,
            [
                ("mode", "data".to_string()),
                ("name", "kappapride".to_string()),
                ("token", "xoxs-123".to_string()),
            ]
        );
    }

    #[test]
    fn truncates_long_bodies() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[tokio::test]
    async fn multipart_body_contract() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/emoji.add"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/api/emoji.add", server.uri());
        let form = UploadForm::new(Bytes::from_static(PNG), "Kappa", "xoxs-123");
        let outcome = upload(&test_client(), &url, form).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Added);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body = &requests[0].body;

        assert_eq!(count(body, b"name=\"image\"; filename=\"Kappa.png\""), 1);
        assert_eq!(count(body, b"Content-Disposition"), 4);
        assert_eq!(count(body, PNG), 1);
        assert_eq!(count(body, b"name=\"mode\"\r\n\r\ndata\r\n"), 1);
        assert_eq!(count(body, b"name=\"name\"\r\n\r\nkappa\r\n"), 1);
        assert_eq!(count(body, b"name=\"token\"\r\n\r\nxoxs-123\r\n"), 1);
        server.verify().await;
    }

    #[tokio::test]
    async fn error_field_is_a_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"ok":false,"error":"already_taken"}"#),
            )
            .mount(&server)
            .await;

        let url = format!("{}/api/emoji.add", server.uri());
        let form = UploadForm::new(Bytes::from_static(PNG), "Kappa", "t");
        let outcome = upload(&test_client(), &url, form).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Rejected("already_taken".into()));
    }

    #[tokio::test]
    async fn not_ok_without_error_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":false}"#))
            .mount(&server)
            .await;

        let url = format!("{}/api/emoji.add", server.uri());
        let form = UploadForm::new(Bytes::from_static(PNG), "Kappa", "t");
        let outcome = upload(&test_client(), &url, form).await.unwrap();
        assert_eq!(outcome, UploadOutcome::Rejected("unknown_error".into()));
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let url = format!("{}/api/emoji.add", server.uri());
        let form = UploadForm::new(Bytes::from_static(PNG), "Kappa", "t");
        match upload(&test_client(), &url, form).await {
            Err(UploadError::Status { status, body }) => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert!(body.contains("bad gateway"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_answer_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let url = format!("{}/api/emoji.add", server.uri());
        let form = UploadForm::new(Bytes::from_static(PNG), "Kappa", "t");
        assert!(matches!(
            upload(&test_client(), &url, form).await,
            Err(UploadError::Decode(_))
        ));
    }
}
