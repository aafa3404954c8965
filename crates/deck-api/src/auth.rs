//! Auth and user endpoints.

use serde::Serialize;

use deck_core::entities::{Session, User};

use crate::error::ApiError;
use crate::http::{check_response, read_data};
use crate::ApiClient;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    name: &'a str,
}

impl ApiClient {
    /// `POST /api/auth/login`: create or look up the user and open a
    /// session. The returned session token is stored on the client for
    /// subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a problem response.
    pub async fn login(&mut self, email: &str, name: &str) -> Result<Session, ApiError> {
        let url = self.url("/auth/login");
        let resp = check_response(
            self.http
                .post(&url)
                .json(&LoginRequest { email, name })
                .send()
                .await?,
        )
        .await?;
        let session: Session = read_data(resp).await?;
        self.set_session_token(Some(session.session_token.clone()));
        Ok(session)
    }

    /// `POST /api/auth/logout`: soft-delete the current session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a problem response.
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        let url = self.url("/auth/logout");
        check_response(self.authed(self.http.post(&url)).send().await?).await?;
        self.set_session_token(None);
        Ok(())
    }

    /// `GET /api/users/me`: the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a problem response
    /// (401 when the session is missing or expired).
    pub async fn me(&self) -> Result<User, ApiError> {
        let url = self.url("/users/me");
        let resp = check_response(self.authed(self.http.get(&url)).send().await?).await?;
        read_data(resp).await
    }
}
