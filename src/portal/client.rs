use std::{
    sync::Arc,
    time::Duration,
};

use reqwest::{
    cookie::Jar,
    header::REFERER,
    Client,
    Url,
};
use serde::Serialize;

use super::roster::parse_roster;
use crate::core::{
    cookies::{
        csrf_token,
        CSRF_COOKIE,
        CSRF_HEADER,
    },
    http::{
        base_url,
        ensure_success,
        http_client,
    },
    ApiReply,
    DeleteStudent,
    NewStudent,
    PortalError,
    Roster,
    UpdateMarks,
};

const LOGIN_PATH: &str = "login/";
const LOGOUT_PATH: &str = "logout/";
const HOME_PATH: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalAction {
    UpdateMarks,
    DeleteStudent,
    AddStudent,
}

impl PortalAction {
    pub fn path(&self) -> &'static str {
        match self {
            PortalAction::UpdateMarks => "api/update-marks/",
            PortalAction::DeleteStudent => "api/delete-student/",
            PortalAction::AddStudent => "api/add-student/",
        }
    }

    /// Generic text shown when the call never produced a readable reply.
    pub fn failure_message(&self) -> &'static str {
        match self {
            PortalAction::UpdateMarks => "An error occurred while updating marks",
            PortalAction::DeleteStudent => "An error occurred while deleting student",
            PortalAction::AddStudent => "An error occurred while adding student",
        }
    }
}

#[derive(Debug)]
pub enum ActionOutcome {
    Succeeded(String),
    Rejected(String),
    Failed(PortalError),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded(_))
    }
}

impl From<ApiReply> for ActionOutcome {
    fn from(reply: ApiReply) -> Self {
        if reply.success {
            ActionOutcome::Succeeded(reply.message.unwrap_or_default())
        } else {
            ActionOutcome::Rejected(reply.error.unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}

/// Session-scoped access to the portal: one cookie jar, one HTTP client.
#[derive(Clone)]
pub struct PortalClient {
    http: Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl PortalClient {
    pub fn new(address: &str, timeout: Duration) -> Result<Self, PortalError> {
        let base_url = base_url(address)?;
        let jar = Arc::new(Jar::default());
        let http = http_client(jar.clone(), timeout)?;
        Ok(Self { http, jar, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, PortalError> {
        self.base_url.join(path).map_err(|e| PortalError::InvalidUrl(e.to_string()))
    }

    fn is_login_page(&self, url: &Url) -> bool {
        self.endpoint(LOGIN_PATH).map(|login| login.path() == url.path()).unwrap_or(false)
    }

    pub fn csrf_token(&self) -> Option<String> {
        csrf_token(&self.jar, &self.base_url)
    }

    /// Builds a dispatcher bound to the token read at the latest page load.
    pub fn dispatcher(&self, csrf_token: Option<String>) -> ActionDispatcher {
        ActionDispatcher { http: self.http.clone(), base_url: self.base_url.clone(), csrf_token }
    }

    /// Signs in with the login form and returns the roster the server lands on.
    pub async fn login(&self, username: &str, password: &str) -> Result<Roster, PortalError> {
        let login_url = self.endpoint(LOGIN_PATH)?;

        let resp = self.http.get(login_url.clone()).send().await?;
        ensure_success(&resp)?;
        let token = self.csrf_token().unwrap_or_default();
        if token.is_empty() {
            tracing::warn!("Login page did not set a {} cookie", CSRF_COOKIE);
        }

        let form = [
            ("username", username),
            ("password", password),
            ("csrfmiddlewaretoken", token.as_str()),
        ];
        let resp = self
            .http
            .post(login_url.clone())
            .header(REFERER, login_url.as_str())
            .form(&form)
            .send()
            .await?;
        ensure_success(&resp)?;

        if self.is_login_page(resp.url()) {
            return Err(PortalError::Application("Invalid credentials".to_string()));
        }

        tracing::info!("Signed in as {}", username);
        let html = resp.text().await?;
        self.roster_from_page(&html)
    }

    /// Fetches and parses the home page, the equivalent of a page reload.
    pub async fn load_roster(&self) -> Result<Roster, PortalError> {
        let resp = self.http.get(self.endpoint(HOME_PATH)?).send().await?;

        if self.is_login_page(resp.url()) {
            return Err(PortalError::SessionExpired);
        }
        ensure_success(&resp)?;

        let html = resp.text().await?;
        self.roster_from_page(&html)
    }

    fn roster_from_page(&self, html: &str) -> Result<Roster, PortalError> {
        let students = parse_roster(html)?;
        tracing::debug!("Loaded {} students", students.len());
        Ok(Roster { students, csrf_token: self.csrf_token() })
    }

    pub async fn logout(&self) -> Result<(), PortalError> {
        let resp = self.http.get(self.endpoint(LOGOUT_PATH)?).send().await?;
        ensure_success(&resp)?;
        tracing::info!("Signed out");
        Ok(())
    }
}

/// Sends the mutating API calls. Holds the CSRF token it was built with and
/// never refreshes it.
#[derive(Clone)]
pub struct ActionDispatcher {
    http: Client,
    base_url: Url,
    csrf_token: Option<String>,
}

impl ActionDispatcher {
    pub fn new(http: Client, base_url: Url, csrf_token: Option<String>) -> Self {
        Self { http, base_url, csrf_token }
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// One attempt, no retries. Transport failures are logged here; the
    /// caller decides how to surface every outcome.
    pub async fn dispatch<B: Serialize + ?Sized>(
        &self,
        action: PortalAction,
        body: &B,
    ) -> ActionOutcome {
        match self.send(action, body).await {
            Ok(reply) => reply.into(),
            Err(e) => {
                tracing::error!("{} failed: {}", action.path(), e);
                ActionOutcome::Failed(e)
            }
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        action: PortalAction,
        body: &B,
    ) -> Result<ApiReply, PortalError> {
        let url =
            self.base_url.join(action.path()).map_err(|e| PortalError::InvalidUrl(e.to_string()))?;

        let mut request = self.http.post(url).header(REFERER, self.base_url.as_str()).json(body);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token.as_str());
        }

        tracing::debug!("POST {}", action.path());
        let resp = request.send().await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn update_marks(&self, request: &UpdateMarks) -> ActionOutcome {
        self.dispatch(PortalAction::UpdateMarks, request).await
    }

    pub async fn delete_student(&self, request: &DeleteStudent) -> ActionOutcome {
        self.dispatch(PortalAction::DeleteStudent, request).await
    }

    pub async fn add_student(&self, request: &NewStudent) -> ActionOutcome {
        self.dispatch(PortalAction::AddStudent, request).await
    }
}
