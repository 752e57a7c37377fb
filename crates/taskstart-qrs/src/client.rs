use crate::identity::CertificateBundle;
use reqwest::{Certificate, Client, Identity, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use taskstart_core::task::About;
use taskstart_core::{ApiResponse, Repository, TaskFilter, TaskId, TaskRecord, TaskStartError};
use tracing::{debug, info};

/// Connection settings for a QRS endpoint.
#[derive(Debug, Clone)]
pub struct QrsSettings {
    pub host_name: String,
    pub port: u16,
    pub certificate_path: PathBuf,
    pub user_directory: String,
    pub user_id: String,
    pub request_timeout: Duration,
    pub accept_invalid_certs: bool,
}

impl QrsSettings {
    pub fn base_url(&self) -> String {
        format!("https://{}:{}/qrs", self.host_name, self.port)
    }

    fn user_header(&self) -> String {
        format!(
            "UserDirectory={}; UserId={}",
            self.user_directory, self.user_id
        )
    }
}

/// Client for the Qlik Sense Repository Service, authenticated with the
/// exported client certificate. Built once and reused for every request.
pub struct QrsClient {
    http: Client,
    base_url: String,
    user_header: String,
}

impl QrsClient {
    pub fn connect(settings: &QrsSettings) -> Result<Self, TaskStartError> {
        let bundle = CertificateBundle::load(&settings.certificate_path)?;
        let identity = Identity::from_pem(&bundle.identity_pem)
            .map_err(|e| TaskStartError::Config(format!("invalid client certificate: {}", e)))?;

        let mut builder = Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .timeout(settings.request_timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs);

        if let Some(root) = &bundle.root_pem {
            let root = Certificate::from_pem(root)
                .map_err(|e| TaskStartError::Config(format!("invalid root certificate: {}", e)))?;
            builder = builder.add_root_certificate(root);
        }

        let http = builder
            .build()
            .map_err(|e| TaskStartError::Connection(e.to_string()))?;

        info!("QRS client configured for {}", settings.base_url());
        Ok(Self {
            http,
            base_url: settings.base_url(),
            user_header: settings.user_header(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let xrfkey = xrfkey();
        self.http
            .request(method, format!("{}/{}", self.base_url, path))
            .query(&[("xrfkey", xrfkey.as_str())])
            .header("X-Qlik-Xrfkey", xrfkey)
            .header("X-Qlik-User", &self.user_header)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, TaskStartError> {
        let response = request.send().await.map_err(transport_error)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(transport_error)?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn command(&self, path: &str) -> Result<ApiResponse, TaskStartError> {
        debug!("POST {}/{}", self.base_url, path);
        let response = self
            .request(Method::POST, path)
            .header(reqwest::header::CONTENT_LENGTH, "0")
            .send()
            .await
            .map_err(transport_error)?;
        Ok(api_response(response.status()))
    }
}

#[async_trait::async_trait]
impl Repository for QrsClient {
    async fn about(&self) -> Result<About, TaskStartError> {
        self.get_json(self.request(Method::GET, "about")).await
    }

    async fn list_tasks(
        &self,
        filter: Option<&TaskFilter>,
    ) -> Result<Vec<TaskRecord>, TaskStartError> {
        let mut request = self.request(Method::GET, "task/full");
        if let Some(filter) = filter {
            debug!("Listing tasks with filter '{}'", filter);
            request = request.query(&[("filter", filter.to_string())]);
        }
        self.get_json(request).await
    }

    async fn start_task(&self, task_id: &TaskId) -> Result<ApiResponse, TaskStartError> {
        self.command(&format!("task/{}/start", task_id)).await
    }

    async fn stop_task(&self, task_id: &TaskId) -> Result<ApiResponse, TaskStartError> {
        self.command(&format!("task/{}/stop", task_id)).await
    }
}

/// Cross-site request forgery key: 16 alphanumeric characters, sent both as
/// a query parameter and a header.
pub fn xrfkey() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..16].to_string()
}

fn api_response(status: StatusCode) -> ApiResponse {
    ApiResponse::new(status.as_u16(), status.canonical_reason().unwrap_or(""))
}

async fn ensure_success(response: Response) -> Result<Response, TaskStartError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TaskStartError::Api(format!(
        "{} {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
        body.trim()
    )))
}

fn transport_error(e: reqwest::Error) -> TaskStartError {
    if e.is_connect() || e.is_timeout() {
        TaskStartError::Connection(e.to_string())
    } else {
        TaskStartError::Api(e.to_string())
    }
}
