use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::error::ApiError;
use crate::api::models::{Contact, ContactDraft, Credentials, ErrorBody, LoginResponse, RegisteredUser};
use crate::api::ContactsApi;
use crate::session::Session;

/// HTTP client for the contacts backend. Cloning is cheap and shares the
/// connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_api: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Session) -> Result<Self, ApiError> {
        let base_api = crate::utils::base_api(base_url);
        Url::parse(&base_api)?;
        let http = HttpClient::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            http,
            base_api,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_api(&self) -> &str {
        &self.base_api
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_api, path)
    }

    fn with_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Turns a non-success response into [`ApiError::Rejected`], keeping a
    /// string `detail` from the body when there is one.
    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.json::<ErrorBody>().await.unwrap_or_default();
        let detail = body
            .detail
            .and_then(|d| d.as_str().map(str::to_string));
        warn!("HTTP {status}: {}", detail.as_deref().unwrap_or("no detail"));
        Err(ApiError::Rejected { status, detail })
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.with_auth(req).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json::<T>().await?)
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<RegisteredUser, ApiError> {
        debug!("POST /auth/register");
        let req = self.http.post(self.endpoint("/auth/register")).json(credentials);
        self.send_json(req).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        debug!("POST /auth/login");
        let req = self.http.post(self.endpoint("/auth/login")).json(credentials);
        self.send_json(req).await
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        debug!("GET /contacts");
        self.send_json(self.http.get(self.endpoint("/contacts"))).await
    }

    pub async fn get_contact(&self, id: i64) -> Result<Contact, ApiError> {
        debug!("GET /contacts/{id}");
        self.send_json(self.http.get(self.endpoint(&format!("/contacts/{id}"))))
            .await
    }

    pub async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact, ApiError> {
        debug!("POST /contacts");
        let req = self.http.post(self.endpoint("/contacts")).json(draft);
        self.send_json(req).await
    }

    pub async fn update_contact(&self, id: i64, draft: &ContactDraft) -> Result<Contact, ApiError> {
        debug!("PUT /contacts/{id}");
        let req = self
            .http
            .put(self.endpoint(&format!("/contacts/{id}")))
            .json(draft);
        self.send_json(req).await
    }

    pub async fn delete_contact(&self, id: i64) -> Result<(), ApiError> {
        debug!("DELETE /contacts/{id}");
        let req = self.http.delete(self.endpoint(&format!("/contacts/{id}")));
        let resp = self.with_auth(req).send().await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactsApi for ApiClient {
    async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        ApiClient::list_contacts(self).await
    }

    async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact, ApiError> {
        ApiClient::create_contact(self, draft).await
    }

    async fn update_contact(&self, id: i64, draft: &ContactDraft) -> Result<Contact, ApiError> {
        ApiClient::update_contact(self, id, draft).await
    }

    async fn delete_contact(&self, id: i64) -> Result<(), ApiError> {
        ApiClient::delete_contact(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hang_off_the_api_prefix() {
        let client = ApiClient::new("http://localhost:8000", Session::in_memory()).unwrap();
        assert_eq!(client.base_api(), "http://localhost:8000/api");
        assert_eq!(client.endpoint("/contacts/4"), "http://localhost:8000/api/contacts/4");
    }

    #[test]
    fn unparsable_base_url_is_rejected() {
        let err = ApiClient::new("http://exa mple.com", Session::in_memory()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }
}
