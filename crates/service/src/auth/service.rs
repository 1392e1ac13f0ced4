use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use chrono::{Duration, Utc};
use configs::{AdminAccount, AdminConfig};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, instrument, warn};

use super::domain::{AdminSession, Claims, LoginInput};
use super::errors::AuthError;
use crate::observability::ADMIN_LOGIN_FAILURES_TOTAL;

/// Hash a password into an argon2 PHC string for `admin.accounts`.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.len() < 8 {
        return Err(AuthError::Validation("password too short (>=8)".into()));
    }
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

/// Dashboard login against the accounts listed in configuration.
pub struct AdminAuthService {
    accounts: Vec<AdminAccount>,
    secret: String,
    ttl_hours: u32,
}

impl AdminAuthService {
    pub fn new(cfg: &AdminConfig) -> Self {
        Self { accounts: cfg.accounts.clone(), secret: cfg.jwt_secret.clone(), ttl_hours: cfg.token_ttl_hours }
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use configs::{AdminAccount, AdminConfig};
    /// use service::auth::{domain::LoginInput, hash_password, AdminAuthService};
    /// let cfg = AdminConfig {
    ///     jwt_secret: "secret".into(),
    ///     token_ttl_hours: 1,
    ///     accounts: vec![AdminAccount { email: "a@clinic.test".into(), password_hash: hash_password("Passw0rd!").unwrap() }],
    /// };
    /// let svc = AdminAuthService::new(&cfg);
    /// let session = svc.login(LoginInput { email: "A@clinic.test".into(), password: "Passw0rd!".into() }).unwrap();
    /// assert_eq!(svc.verify(&session.token).unwrap().sub, "a@clinic.test");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub fn login(&self, input: LoginInput) -> Result<AdminSession, AuthError> {
        let email = input.email.trim();
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| {
                ADMIN_LOGIN_FAILURES_TOTAL.inc();
                warn!(event = "admin_login_rejected", reason = "unknown_account");
                AuthError::Unauthorized
            })?;

        let parsed = PasswordHash::new(&account.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            ADMIN_LOGIN_FAILURES_TOTAL.inc();
            warn!(event = "admin_login_rejected", reason = "bad_password");
            return Err(AuthError::Unauthorized);
        }

        let now = Utc::now();
        let expires_at = now + Duration::hours(i64::from(self.ttl_hours));
        let claims = Claims {
            sub: account.email.clone(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        info!(event = "admin_login", email = %account.email, "dashboard session issued");
        Ok(AdminSession { email: account.email.clone(), token, expires_at })
    }

    /// Validate signature and expiry; the subject must still be a configured account.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &DecodingKey::from_secret(self.secret.as_bytes()), &Validation::default())
            .map_err(|_| AuthError::InvalidToken)?;
        if !self.accounts.iter().any(|a| a.email.eq_ignore_ascii_case(&data.claims.sub)) {
            return Err(AuthError::InvalidToken);
        }
        Ok(data.claims)
    }
}
