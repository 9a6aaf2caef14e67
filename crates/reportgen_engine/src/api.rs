use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reportgen_logging::report_debug;
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use url::Url;

use crate::filename::derive_output_filename;
use crate::{ApiError, FailureKind, GeneratedDocument, HealthReport, UploadFile, ValidationReport};

/// Multipart field carrying the spreadsheet.
pub const EXCEL_FIELD: &str = "excel_file";
const UNIT_NAME_FIELD: &str = "nombre_uds";
const HEADER_IMAGE_FIELD: &str = "encabezado";
const FOOTER_IMAGE_FIELD: &str = "pie";

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MIME: &str = "application/vnd.ms-excel";

/// Optional extras sent with every generate request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub unit_name: Option<String>,
    pub header_image: Option<ImageAttachment>,
    pub footer_image: Option<ImageAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content: Bytes,
    mime: &'static str,
}

impl ImageAttachment {
    /// Accepts png, jpg and jpeg images, the set the backend stores.
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Result<Self, ApiError> {
        let file_name = file_name.into();
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let mime = match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            _ => {
                return Err(ApiError::new(
                    FailureKind::InvalidAttachment,
                    format!("{file_name}: only png, jpg and jpeg images are accepted"),
                ))
            }
        };
        Ok(Self {
            file_name,
            content: content.into(),
            mime,
        })
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    base_url: Url,
    /// Unset means the network stack's default.
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
    pub options: ReportOptions,
}

impl ApiSettings {
    pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            connect_timeout: None,
            request_timeout: None,
            max_response_bytes: Self::DEFAULT_MAX_RESPONSE_BYTES,
            options: ReportOptions::default(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, name: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(name)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
pub trait ReportApi: Send + Sync {
    /// `GET /health`.
    async fn health(&self) -> Result<HealthReport, ApiError>;

    /// `POST /generate`: converts one spreadsheet into a report document.
    async fn generate(&self, file: &UploadFile) -> Result<GeneratedDocument, ApiError>;

    /// `POST /validate`: asks the backend to inspect a spreadsheet.
    async fn validate(&self, file: &UploadFile) -> Result<ValidationReport, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestReportApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestReportApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn spreadsheet_form(&self, file: &UploadFile) -> Result<Form, ApiError> {
        let mime = if file.name.to_ascii_lowercase().ends_with(".xls") {
            XLS_MIME
        } else {
            XLSX_MIME
        };
        let part = Part::bytes(file.content.to_vec())
            .file_name(file.name.clone())
            .mime_str(mime)
            .map_err(|err| ApiError::new(FailureKind::InvalidAttachment, err.to_string()))?;
        Ok(Form::new().part(EXCEL_FIELD, part))
    }

    fn generate_form(&self, file: &UploadFile) -> Result<Form, ApiError> {
        let options = &self.settings.options;
        let mut form = self.spreadsheet_form(file)?;
        if let Some(unit_name) = options.unit_name.as_ref().filter(|u| !u.is_empty()) {
            form = form.text(UNIT_NAME_FIELD, unit_name.clone());
        }
        for (field, image) in [
            (HEADER_IMAGE_FIELD, &options.header_image),
            (FOOTER_IMAGE_FIELD, &options.footer_image),
        ] {
            if let Some(image) = image {
                let part = Part::bytes(image.content.to_vec())
                    .file_name(image.file_name.clone())
                    .mime_str(image.mime)
                    .map_err(|err| {
                        ApiError::new(FailureKind::InvalidAttachment, err.to_string())
                    })?;
                form = form.part(field, part);
            }
        }
        Ok(form)
    }

    /// Reads the body in chunks, enforcing `max_response_bytes`.
    async fn read_body(&self, response: Response) -> Result<Bytes, ApiError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

#[async_trait::async_trait]
impl ReportApi for ReqwestReportApi {
    async fn health(&self) -> Result<HealthReport, ApiError> {
        let url = self.settings.endpoint("health")?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let body = self.read_body(response).await?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::MalformedBody, err.to_string()))
    }

    async fn generate(&self, file: &UploadFile) -> Result<GeneratedDocument, ApiError> {
        let url = self.settings.endpoint("generate")?;
        let form = self.generate_form(file)?;
        report_debug!(
            "POST {} file={} bytes={}",
            url,
            file.name,
            file.content.len()
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(response).await);
        }

        let disposition = header_text(&response, CONTENT_DISPOSITION.as_str());
        let content_type = header_text(&response, CONTENT_TYPE.as_str());
        let content = self.read_body(response).await?;

        Ok(GeneratedDocument {
            filename: derive_output_filename(disposition.as_deref(), &file.name),
            content,
            content_type,
        })
    }

    async fn validate(&self, file: &UploadFile) -> Result<ValidationReport, ApiError> {
        let url = self.settings.endpoint("validate")?;
        let form = self.spreadsheet_form(file)?;
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let body = self.read_body(response).await?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::MalformedBody, err.to_string()))
    }
}

fn header_text(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
        .map(str::to_owned)
}

/// Turns a non-success response into an error carrying the server's message.
async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();
    ApiError::new(
        FailureKind::HttpStatus(status.as_u16()),
        server_error_message(status, &body),
    )
}

/// `{"error": "..."}` when present; a generic text when the body is not JSON;
/// the status code when the JSON has no usable `error`.
pub(crate) fn server_error_message(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Err(_) => "Unknown error".to_string(),
        Ok(value) => value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP error {}", status.as_u16())),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() || err.is_body() {
        return ApiError::new(FailureKind::MalformedBody, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
