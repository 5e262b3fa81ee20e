use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeedConfig {
    pub email: String,
    pub password: String,
    pub name: String,
    pub persona: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin_seed: AdminSeedConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "heroforce".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "heroforce-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let admin_seed = AdminSeedConfig {
            email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "arqueiro@heroforce.com".into()),
            password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "Arrow&Quiver.2001".into()),
            name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin Hero Force".into()),
            persona: std::env::var("ADMIN_PERSONA").unwrap_or_else(|_| "Arqueiro Verde".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            admin_seed,
        })
    }
}
