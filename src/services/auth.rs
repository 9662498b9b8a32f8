// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    models::{
        auth::{AuthResponse, Claims, SsoStateClaims},
        user::User,
    },
};

// Audiência do token de "state" do SSO; impede que um JWT de sessão seja aceito no lugar dele
const SSO_STATE_AUDIENCE: &str = "sso-state";
const SSO_STATE_TTL_MINUTES: i64 = 10;

/// Hash bcrypt numa thread de bloqueio.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let password_hash_clone = password_hash.to_owned();

    // Executa a verificação em um thread separado
    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

// now + ttl sem overflow; falha vira erro interno, nunca pânico
fn expiry(now: DateTime<Utc>, ttl: Option<TimeDelta>) -> Result<DateTime<Utc>, AppError> {
    ttl.and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("Validade de token fora do intervalo")))
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            store,
            jwt_secret,
            token_ttl_hours,
        }
    }

    /// Login local. Não revela se o e-mail existe.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let mut tx = self.store.begin().await?;
        let user = tx
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        tx.commit().await?;

        // Usuários só de SSO não têm senha
        let Some(password_hash) = user.password_hash.as_deref() else {
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(password, password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.session_for(&user)
    }

    /// Login por e-mail já verificado pelo provedor externo.
    /// E-mail desconhecido é recusado; nunca criamos conta aqui.
    pub async fn login_with_email(&self, email: &str) -> Result<AuthResponse, AppError> {
        let mut tx = self.store.begin().await?;
        let user = tx
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::EmailNotRegistered(email.to_string()))?;
        tx.commit().await?;

        tracing::info!("🔐 Login via SSO: {}", user.email);
        self.session_for(&user)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        // O papel do token é só informativo: relemos o usuário a cada requisição
        let mut tx = self.store.begin().await?;
        let user = tx
            .find_user(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;
        tx.commit().await?;
        Ok(user)
    }

    // Token + painel do papel. Papel sem painel não ganha sessão.
    fn session_for(&self, user: &User) -> Result<AuthResponse, AppError> {
        let redirect_to = user.role.landing_path().ok_or(AppError::RoleNotRecognized)?;
        let token = self.create_token(user)?;

        Ok(AuthResponse {
            token,
            role: user.role,
            redirect_to: redirect_to.to_string(),
        })
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = expiry(now, TimeDelta::try_hours(self.token_ttl_hours))?;

        let claims = Claims {
            sub: user.id,
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// "state" assinado para o fluxo OAuth. Sem armazenamento no servidor.
    pub fn issue_sso_state(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = expiry(now, TimeDelta::try_minutes(SSO_STATE_TTL_MINUTES))?;
        let claims = SsoStateClaims {
            aud: SSO_STATE_AUDIENCE.to_string(),
            nonce: Uuid::new_v4(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    pub fn verify_sso_state(&self, state: &str) -> Result<(), AppError> {
        let mut validation = Validation::default();
        validation.set_audience(&[SSO_STATE_AUDIENCE]);

        decode::<SsoStateClaims>(
            state,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|e| AppError::ExternalProvider(format!("state inválido: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::{
        db::memory::MemoryStore,
        models::user::{NewUser, Role},
    };

    const SECRET: &str = "test-secret";

    async fn service_with(role: Role, password: Option<&str>) -> AuthService {
        let store = MemoryStore::new();
        let password_hash = match password {
            Some(p) => Some(hash_password(p, 4).await.expect("hash")),
            None => None,
        };

        let mut tx = store.begin().await.expect("begin");
        tx.insert_user(&NewUser {
            email: "user@kiit.ac.in".into(),
            name: None,
            password_hash,
            role,
            hostel_id: None,
            room_number: None,
            mentor_id: None,
        })
        .await
        .expect("user");
        tx.commit().await.expect("commit");

        AuthService::new(Arc::new(store), SECRET.into(), 1)
    }

    #[rstest]
    #[case(Role::Admin, "/admin/dashboard")]
    #[case(Role::Student, "/student/dashboard")]
    #[case(Role::Warden, "/warden/dashboard")]
    #[case(Role::Mentor, "/mentor/dashboard")]
    #[tokio::test]
    async fn login_redirects_to_the_role_dashboard(#[case] role: Role, #[case] landing: &str) {
        let service = service_with(role, Some("secret123")).await;

        let response = service.login_user("user@kiit.ac.in", "secret123").await.expect("login");

        assert_eq!(response.role, role);
        assert_eq!(response.redirect_to, landing);
        let user = service.validate_token(&response.token).await.expect("token");
        assert_eq!(user.email, "user@kiit.ac.in");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let service = service_with(Role::Student, Some("secret123")).await;

        let wrong = service.login_user("user@kiit.ac.in", "nope").await.expect_err("wrong");
        let unknown = service.login_user("ghost@kiit.ac.in", "secret123").await.expect_err("unknown");

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn accounts_without_password_cannot_log_in_locally() {
        let service = service_with(Role::Student, None).await;

        let err = service.login_user("user@kiit.ac.in", "").await.expect_err("no password");

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn gatekeepers_have_no_dashboard() {
        let service = service_with(Role::Gatekeeper, Some("secret123")).await;

        let err = service.login_user("user@kiit.ac.in", "secret123").await.expect_err("gatekeeper");

        assert!(matches!(err, AppError::RoleNotRecognized));
    }

    #[tokio::test]
    async fn sso_login_never_provisions_accounts() {
        let service = service_with(Role::Mentor, None).await;

        let known = service.login_with_email("USER@kiit.ac.in").await.expect("known");
        assert_eq!(known.redirect_to, "/mentor/dashboard");

        let err = service.login_with_email("new@kiit.ac.in").await.expect_err("unknown");
        assert!(matches!(err, AppError::EmailNotRegistered(email) if email == "new@kiit.ac.in"));
    }

    #[tokio::test]
    async fn garbage_tokens_are_rejected() {
        let service = service_with(Role::Student, None).await;

        let err = service.validate_token("not.a.jwt").await.expect_err("garbage");

        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn sso_state_round_trips_and_is_not_a_session() {
        let service = service_with(Role::Student, None).await;

        let state = service.issue_sso_state().expect("state");
        service.verify_sso_state(&state).expect("valid state");

        // O state não serve como token de sessão
        let err = service.validate_token(&state).await.expect_err("not a session");
        assert!(matches!(err, AppError::InvalidToken));

        let other = AuthService::new(Arc::new(MemoryStore::new()), "other".into(), 1);
        assert!(matches!(
            other.verify_sso_state(&state),
            Err(AppError::ExternalProvider(_))
        ));
    }

    #[tokio::test]
    async fn oversized_token_ttl_is_an_error_not_a_panic() {
        let service = service_with(Role::Student, None).await;
        let service = AuthService::new(service.store.clone(), SECRET.into(), 100_000_000_000);

        let err = service.login_with_email("user@kiit.ac.in").await.expect_err("ttl");

        assert!(matches!(err, AppError::InternalServerError(_)));
    }
}
