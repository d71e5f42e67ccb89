use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, multipart, Client, RequestBuilder, Response};
use tokio::sync::RwLock;
use url::Url;

use shared::error::ApiError;
use shared::protocol::{AuthToken, BillCreated, BillUpdate, RawBill};

use crate::{BillsService, FileUpload, RemoteStore, UsersService};

/// Remote Store Client over HTTP. One instance per portal session; the JWT
/// resolved by `login` is retained and attached as a Bearer header to the
/// bill calls that follow.
pub struct HttpRemoteStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    http: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl HttpRemoteStore {
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                http: Client::new(),
                base_url,
                token: RwLock::new(None),
            }),
        }
    }
}

impl StoreInner {
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path '{path}'"))
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Maps a non-2xx response into an error: the service's error envelope when
/// the body carries one, otherwise the bare "Erreur {status}" phrase.
async fn into_api_result(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if let Ok(envelope) = serde_json::from_str::<ApiError>(&body) {
        return Err(anyhow::Error::new(envelope));
    }
    Err(anyhow!("Erreur {}", status.as_u16()))
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    fn bills(&self) -> Arc<dyn BillsService> {
        Arc::new(HttpBills {
            inner: Arc::clone(&self.inner),
        })
    }

    fn users(&self) -> Arc<dyn UsersService> {
        Arc::new(HttpUsers {
            inner: Arc::clone(&self.inner),
        })
    }

    async fn login(&self, credentials_json: &str) -> Result<AuthToken> {
        let url = self.inner.endpoint("auth/login")?;
        let response = self
            .inner
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(credentials_json.to_owned())
            .send()
            .await
            .context("login request failed")?;
        let response = into_api_result(response).await?;
        let token: AuthToken = response.json().await.context("malformed login response")?;
        *self.inner.token.write().await = Some(token.jwt.clone());
        Ok(token)
    }
}

struct HttpBills {
    inner: Arc<StoreInner>,
}

#[async_trait]
impl BillsService for HttpBills {
    async fn list(&self) -> Result<Vec<RawBill>> {
        let url = self.inner.endpoint("bills")?;
        let request = self.inner.authorized(self.inner.http.get(url)).await;
        let response = request.send().await.context("bill list request failed")?;
        let response = into_api_result(response).await?;
        response.json().await.context("malformed bill list response")
    }

    async fn create(&self, upload: FileUpload) -> Result<BillCreated> {
        let url = self.inner.endpoint("bills")?;
        let mut part = multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(mime) = upload.mime_type.as_deref() {
            part = part.mime_str(mime).context("invalid mime type")?;
        }
        let form = multipart::Form::new()
            .part("file", part)
            .text("email", upload.email);
        let request = self
            .inner
            .authorized(self.inner.http.post(url).multipart(form))
            .await;
        let response = request.send().await.context("file upload request failed")?;
        let response = into_api_result(response).await?;
        response.json().await.context("malformed upload response")
    }

    async fn update(&self, update: BillUpdate) -> Result<()> {
        let url = self.inner.endpoint(&format!("bills/{}", update.selector))?;
        let request = self
            .inner
            .authorized(
                self.inner
                    .http
                    .patch(url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(update.data),
            )
            .await;
        let response = request.send().await.context("bill update request failed")?;
        into_api_result(response).await?;
        Ok(())
    }
}

struct HttpUsers {
    inner: Arc<StoreInner>,
}

#[async_trait]
impl UsersService for HttpUsers {
    async fn create(&self, payload_json: &str) -> Result<()> {
        let url = self.inner.endpoint("users")?;
        let response = self
            .inner
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload_json.to_owned())
            .send()
            .await
            .context("account creation request failed")?;
        into_api_result(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_store_tests.rs"]
mod tests;
