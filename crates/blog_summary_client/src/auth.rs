//! crates/blog_summary_client/src/auth.rs
//!
//! Client for the auth backend's register, login and identity endpoints.

use blog_summary_core::domain::{Session, User};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::{endpoint, ClientConfig};
use crate::error::ClientError;

const REGISTER_FAILED: &str = "Registration failed. Please try again.";
const LOGIN_FAILED: &str = "Login failed. Please try again.";

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthBody {
    token: String,
    user: User,
}

#[derive(Deserialize)]
struct MeBody {
    #[serde(rename = "userId")]
    user_id: Uuid,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turns a failure response into `ClientError::Api`, preferring the server's message.
pub(crate) async fn api_error(response: Response, fallback: &str) -> ClientError {
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    ClientError::Api { status, message }
}

#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.auth_base_url.clone(),
        })
    }

    /// Creates an account. The returned session is ready for `SessionState::sign_in`.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let body = RegisterBody {
            name,
            email,
            password,
        };
        self.post_for_session("/api/auth/register", &body, REGISTER_FAILED)
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = LoginBody { email, password };
        self.post_for_session("/api/auth/login", &body, LOGIN_FAILED)
            .await
    }

    /// Asks the backend whose token this is. Fails with status 401 once it has expired.
    pub async fn me(&self, token: &str) -> Result<Uuid, ClientError> {
        let response = self
            .http
            .get(endpoint(&self.base_url, "/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response, "Session is no longer valid").await);
        }
        Ok(response.json::<MeBody>().await?.user_id)
    }

    async fn post_for_session<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Session, ClientError> {
        let response = self
            .http
            .post(endpoint(&self.base_url, path))
            .json(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response, fallback).await);
        }
        let body: AuthBody = response.json().await?;
        debug!(user_id = %body.user.id, "Received session from auth backend");
        Ok(Session {
            user: body.user,
            token: body.token,
        })
    }
}
