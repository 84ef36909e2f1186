use serde::Deserialize;
use thiserror::Error;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleTokenInfo {
    pub(crate) aud: String,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Error)]
pub(crate) enum GoogleAuthError {
    #[error("google tokeninfo request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("google rejected the id token")]
    Rejected,
    #[error("id token audience mismatch")]
    AudienceMismatch,
}

/// Verifies a Google ID token against the tokeninfo endpoint and checks the
/// audience matches our configured client id.
pub(crate) async fn verify_id_token(
    client_id: &str,
    id_token: &str,
) -> Result<GoogleTokenInfo, GoogleAuthError> {
    let response = reqwest::Client::new()
        .get(TOKENINFO_URL)
        .query(&[("id_token", id_token)])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GoogleAuthError::Rejected);
    }

    let info = response.json::<GoogleTokenInfo>().await?;
    if info.aud != client_id {
        return Err(GoogleAuthError::AudienceMismatch);
    }

    Ok(info)
}
