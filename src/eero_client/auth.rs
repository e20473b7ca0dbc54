// Email / verification-code login against the eero API.

use serde_json::{Value, json};
use tracing::{Instrument, info, info_span};

use super::{BoxFuture, ClientError, EeroClient};

/// Two-step login: `request_code` mails a code and returns a provisional token,
/// `verify_code` activates that token.
pub trait LoginClient: Send + Sync {
    fn request_code<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Result<String, ClientError>>;

    fn verify_code<'a>(
        &'a self,
        token: &'a str,
        code: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}

impl LoginClient for EeroClient {
    fn request_code<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Result<String, ClientError>> {
        Box::pin(
            async move {
                let url = format!("{}/pro/login", self.base_url);
                let body: Value = self
                    .http
                    .post(url)
                    .timeout(self.auth_timeout)
                    .json(&json!({ "login": email }))
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                let token = user_token(&body).ok_or_else(|| {
                    ClientError::Unexpected("login response has no user_token".into())
                })?;
                info!("verification code requested");
                Ok(token)
            }
            .instrument(info_span!("request_code", client = "eero")),
        )
    }

    fn verify_code<'a>(
        &'a self,
        token: &'a str,
        code: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(
            async move {
                let url = format!("{}/login/verify", self.base_url);
                self.http
                    .post(url)
                    .timeout(self.auth_timeout)
                    .header("X-User-Token", token)
                    .form(&[("code", code)])
                    .send()
                    .await?
                    .error_for_status()?;
                info!("verification code accepted");
                Ok(())
            }
            .instrument(info_span!("verify_code", client = "eero")),
        )
    }
}

fn user_token(body: &Value) -> Option<String> {
    body.get("data")?
        .get("user_token")?
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
