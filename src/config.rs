// src/config.rs

use std::{env, ops::RangeInclusive, path::PathBuf, str::FromStr, sync::Arc};

use anyhow::Context;

use crate::{
    common::i18n::I18nStore,
    db::{PgStore, Store},
    services::{
        auth::AuthService,
        complaint_service::ComplaintService,
        hostel_service::HostelService,
        moderation::Blocklist,
        sso::{GoogleConfig, GoogleIdentityProvider, IdentityProvider},
        user_service::UserService,
    },
};

// Até um ano de sessão
const TOKEN_TTL_HOURS_RANGE: RangeInclusive<i64> = 1..=8760;
// Limites aceitos pelo bcrypt
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

// Configuração lida do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub blocklist_path: PathBuf,
    pub bcrypt_cost: u32,
    pub token_ttl_hours: i64,
    pub google: Option<GoogleConfig>,
    pub bootstrap_admin: Option<(String, String)>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        // SSO só fica ativo com as três variáveis presentes
        let google = match (
            optional("GOOGLE_CLIENT_ID"),
            optional("GOOGLE_CLIENT_SECRET"),
            optional("GOOGLE_REDIRECT_URL"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_url)) => Some(GoogleConfig {
                client_id,
                client_secret,
                redirect_url,
            }),
            _ => None,
        };

        let bootstrap_admin = optional("BOOTSTRAP_ADMIN_EMAIL").zip(optional("BOOTSTRAP_ADMIN_PASSWORD"));

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
            blocklist_path: optional("BLOCKLIST_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("bad_words.txt")),
            bcrypt_cost: within(
                "BCRYPT_COST",
                parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
                BCRYPT_COST_RANGE,
            )?,
            token_ttl_hours: within(
                "TOKEN_TTL_HOURS",
                parsed("TOKEN_TTL_HOURS", 168)?,
                TOKEN_TTL_HOURS_RANGE,
            )?,
            google,
            bootstrap_admin,
        })
    }
}

// Variável vazia conta como ausente
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ('{}'): {}", key, raw, e)),
        None => Ok(default),
    }
}

fn within<T>(key: &str, value: T, range: RangeInclusive<T>) -> anyhow::Result<T>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(anyhow::anyhow!("{} = {}", key, value)).with_context(|| {
            format!("{} deve estar entre {} e {}", key, range.start(), range.end())
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub hostel_service: HostelService,
    pub complaint_service: ComplaintService,
    pub identity_provider: Option<Arc<dyn IdentityProvider>>,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    /// Conecta ao banco, roda as migrações e monta o gráfico de dependências.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = PgStore::connect(&config).await?;
        store.migrate().await?;

        let blocklist = Blocklist::load(&config.blocklist_path)?;

        let identity_provider = config
            .google
            .clone()
            .map(|google| Arc::new(GoogleIdentityProvider::new(google)) as Arc<dyn IdentityProvider>);
        if identity_provider.is_none() {
            tracing::info!("Login com Google desativado (variáveis GOOGLE_* ausentes).");
        }

        Ok(Self::with_store(config, Arc::new(store), blocklist, identity_provider))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(
        config: Config,
        store: Arc<dyn Store>,
        blocklist: Blocklist,
        identity_provider: Option<Arc<dyn IdentityProvider>>,
    ) -> Self {
        let auth_service = AuthService::new(store.clone(), config.jwt_secret.clone(), config.token_ttl_hours);
        let user_service = UserService::new(store.clone(), config.bcrypt_cost);
        let hostel_service = HostelService::new(store.clone());
        let complaint_service = ComplaintService::new(store, Arc::new(blocklist));

        Self {
            auth_service,
            user_service,
            hostel_service,
            complaint_service,
            identity_provider,
            i18n_store: Arc::new(I18nStore::embedded()),
        }
    }
}
