// src/services/sso.rs
//
// Login com Google (OpenID Connect, fluxo authorization code).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::common::error::AppError;

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// O provedor externo só afirma a identidade (um e-mail verificado).
/// Decidir se o e-mail tem conta é trabalho do AuthService.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn authorize_url(&self, state: &str) -> Result<String, AppError>;

    async fn verified_email(&self, code: &str) -> Result<String, AppError>;
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Clone)]
pub struct GoogleIdentityProvider {
    config: GoogleConfig,
    client: Client,
}

impl GoogleIdentityProvider {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalProvider(format!("troca do code falhou: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::ExternalProvider(format!("troca do code recusada: {}", e)))?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalProvider(format!("resposta de token inválida: {}", e)))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorize_url(&self, state: &str) -> Result<String, AppError> {
        let url = Url::parse_with_params(
            GOOGLE_AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| anyhow::anyhow!("URL de autorização inválida: {}", e))?;
        Ok(url.into())
    }

    async fn verified_email(&self, code: &str) -> Result<String, AppError> {
        let access_token = self.exchange_code(code).await?;

        let info: UserInfo = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalProvider(format!("userinfo falhou: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::ExternalProvider(format!("userinfo recusado: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::ExternalProvider(format!("userinfo inválido: {}", e)))?;

        match info.email {
            Some(email) if info.email_verified => Ok(email),
            Some(email) => Err(AppError::ExternalProvider(format!("e-mail não verificado: {}", email))),
            None => Err(AppError::ExternalProvider("userinfo sem e-mail".to_string())),
        }
    }
}
