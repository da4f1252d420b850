use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, debug, warn, instrument};

use super::domain::{AuthSession, Claims, LoginInput};
use crate::domain::{NewUser, NewUserRecord, Role, User, UserChanges, UserUpdate};
use crate::errors::ServiceError;
use crate::storage::Storage;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self { Self { jwt_secret: None, token_ttl_hours: 12 } }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self { Self { jwt_secret: c.jwt_secret.clone(), token_ttl_hours: c.token_ttl_hours } }
}

/// Hash a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Hash(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(hash).map_err(|e| ServiceError::Hash(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Auth business service independent of web framework
pub struct AuthService<S: Storage + ?Sized> {
    store: Arc<S>,
    cfg: AuthConfig,
}

impl<S: Storage + ?Sized> Clone for AuthService<S> {
    fn clone(&self) -> Self { Self { store: self.store.clone(), cfg: self.cfg.clone() } }
}

impl<S: Storage + ?Sized> AuthService<S> {
    pub fn new(store: Arc<S>, cfg: AuthConfig) -> Self { Self { store, cfg } }

    pub fn config(&self) -> &AuthConfig { &self.cfg }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig};
    /// use service::domain::{NewUser, Role};
    /// use service::storage::MemStorage;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemStorage::new()), AuthConfig::default());
    /// let input = NewUser { email: "user@example.com".into(), password: "Secret123".into(), role: Role::Requester, full_name: "Test".into(), is_verified: false };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn register(&self, input: NewUser) -> Result<User, ServiceError> {
        input.validate()?;
        if let Some(existing) = self.store.get_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(ServiceError::Conflict(format!("a user with email {} already exists", existing.email)));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .store
            .create_user(NewUserRecord {
                email: input.email,
                password_hash,
                role: input.role,
                full_name: input.full_name,
                is_verified: input.is_verified,
            })
            .await?;
        info!(user_id = user.id, email = %user.email, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Apply a client patch, re-hashing the password when one is supplied.
    #[instrument(skip(self, patch))]
    pub async fn update_user(&self, id: i32, patch: UserUpdate) -> Result<Option<User>, ServiceError> {
        patch.validate()?;
        let password_hash = match patch.password.as_deref() {
            Some(p) => Some(hash_password(p)?),
            None => None,
        };
        let changes = UserChanges {
            email: patch.email,
            password_hash,
            role: patch.role,
            full_name: patch.full_name,
            is_verified: patch.is_verified,
        };
        self.store.update_user(id, changes).await
    }

    /// Authenticate an admin and optionally issue a token.
    ///
    /// Unknown email or wrong password is `Unauthorized`; a valid non-admin is `Forbidden`.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, domain::LoginInput};
    /// use service::domain::{NewUser, Role};
    /// use service::storage::MemStorage;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemStorage::new()), AuthConfig { jwt_secret: Some("secret".into()), token_ttl_hours: 1 });
    /// let _ = tokio_test::block_on(svc.register(NewUser { email: "boss@e.com".into(), password: "Passw0rd".into(), role: Role::Admin, full_name: "Boss".into(), is_verified: true }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "boss@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "boss@e.com");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, ServiceError> {
        let user = self
            .store
            .get_user_by_email(&input.email)
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(ServiceError::Unauthorized);
        }
        if user.role != Role::Admin {
            warn!(user_id = user.id, role = %user.role, "non-admin login refused");
            return Err(ServiceError::Forbidden);
        }

        let token = match &self.cfg.jwt_secret {
            Some(secret) => Some(self.issue_token(&user, secret)?),
            None => None,
        };
        info!(user_id = user.id, "admin_logged_in");
        Ok(AuthSession { user, token })
    }

    fn issue_token(&self, user: &User, secret: &str) -> Result<String, ServiceError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims { sub: user.email.clone(), uid: user.id, role: user.role, exp };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map_err(|e| ServiceError::Token(e.to_string()))
    }

    /// Decode and check a token issued by `login`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let secret = self.cfg.jwt_secret.as_deref().ok_or(ServiceError::Unauthorized)?;
        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStorage;

    fn svc(secret: Option<&str>) -> AuthService<MemStorage> {
        AuthService::new(Arc::new(MemStorage::new()), AuthConfig { jwt_secret: secret.map(Into::into), token_ttl_hours: 1 })
    }

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser { email: email.into(), password: "admin123".into(), role, full_name: "Someone".into(), is_verified: true }
    }

    #[tokio::test]
    async fn login_outcomes() {
        let svc = svc(Some("secret"));
        svc.register(new_user("admin@guhdeh.com", Role::Admin)).await.unwrap();
        svc.register(new_user("req@guhdeh.com", Role::Requester)).await.unwrap();

        let wrong = svc.login(LoginInput { email: "admin@guhdeh.com".into(), password: "nope".into() }).await;
        assert!(matches!(wrong, Err(ServiceError::Unauthorized)));

        let unknown = svc.login(LoginInput { email: "ghost@guhdeh.com".into(), password: "admin123".into() }).await;
        assert!(matches!(unknown, Err(ServiceError::Unauthorized)));

        let requester = svc.login(LoginInput { email: "req@guhdeh.com".into(), password: "admin123".into() }).await;
        assert!(matches!(requester, Err(ServiceError::Forbidden)));

        let ok = svc.login(LoginInput { email: "admin@guhdeh.com".into(), password: "admin123".into() }).await.unwrap();
        let body = serde_json::to_value(&ok).unwrap();
        assert!(body["user"].get("password").is_none());
        let claims = svc.verify_token(ok.token.as_deref().unwrap()).unwrap();
        assert_eq!(claims.sub, "admin@guhdeh.com");
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn no_secret_means_no_token() {
        let svc = svc(None);
        svc.register(new_user("admin@guhdeh.com", Role::Admin)).await.unwrap();
        let ok = svc.login(LoginInput { email: "admin@guhdeh.com".into(), password: "admin123".into() }).await.unwrap();
        assert!(ok.token.is_none());
        assert!(svc.verify_token("anything").is_err());
    }

    #[tokio::test]
    async fn register_rejects_duplicates_and_stores_hash() {
        let svc = svc(None);
        let user = svc.register(new_user("a@b.com", Role::Runner)).await.unwrap();
        assert!(user.password_hash.starts_with("$argon2"));
        assert_ne!(user.password_hash, "admin123");
        let dup = svc.register(new_user("a@b.com", Role::Runner)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn password_change_is_rehashed() {
        let svc = svc(None);
        let user = svc.register(new_user("boss@b.com", Role::Admin)).await.unwrap();
        let patch = UserUpdate { password: Some("n3w-password".into()), ..Default::default() };
        let updated = svc.update_user(user.id, patch).await.unwrap().unwrap();
        assert_ne!(updated.password_hash, user.password_hash);
        assert!(svc.login(LoginInput { email: "boss@b.com".into(), password: "n3w-password".into() }).await.is_ok());
        assert!(svc.update_user(999, UserUpdate::default()).await.unwrap().is_none());
    }
}
