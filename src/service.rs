//! Authentication Service
//!
//! Registration and login flows: input validation, Argon2id password
//! hashing, and token issuance.

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::*;
use crate::store::UserStore;
use crate::token::TokenCodec;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::{Arc, OnceLock};

/// Authentication service
pub struct AuthService {
    store: Arc<dyn UserStore>,
    config: AuthConfig,
    tokens: Arc<TokenCodec>,
    /// Verified against when the email is unknown, so both login failures
    /// cost one Argon2 verify
    dummy_hash: OnceLock<String>,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(store: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        let tokens = Arc::new(TokenCodec::new(&config.jwt_secret));

        Self {
            store,
            config,
            tokens,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Token codec shared with the access guard
    pub fn token_codec(&self) -> Arc<TokenCodec> {
        Arc::clone(&self.tokens)
    }

    // ============================================
    // Password Hashing
    // ============================================

    fn argon2(&self) -> Result<Argon2<'static>, AuthError> {
        let params = self.config.argon2_params()?;
        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    /// Hash a password using Argon2id
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)?;

        match self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn dummy_hash(&self) -> Result<&str, AuthError> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash);
        }
        let hash = self.hash_password("credential-gate-dummy-password")?;
        Ok(self.dummy_hash.get_or_init(|| hash))
    }

    // ============================================
    // User Registration
    // ============================================

    /// Register a new user
    pub async fn register(&self, req: RegisterRequest) -> Result<UserResponse, AuthError> {
        let form = req.into_form()?;

        // Fast path; the store's unique constraint is what actually decides
        if self.store.find_by_email(&form.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hash_password(&form.password)?;

        let user = self
            .store
            .insert(NewUser {
                name: form.name,
                email: form.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(UserResponse::from(user))
    }

    // ============================================
    // Login
    // ============================================

    /// Check credentials and issue a bearer token
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let credentials = req.into_credentials()?;

        let Some(user) = self.store.find_by_email(&credentials.email).await? else {
            self.verify_password(&credentials.password, self.dummy_hash()?)?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(&credentials.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::error::ValidationError;
    use crate::store::MemoryUserStore;
    use crate::token::TOKEN_TTL_SECS;
    use async_trait::async_trait;

    /// Store whose lookup never sees the row a concurrent request inserted
    struct RacingStore;

    #[async_trait]
    impl UserStore for RacingStore {
        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AuthError> {
            Ok(None)
        }

        async fn insert(&self, _user: NewUser) -> Result<User, AuthError> {
            Err(AuthError::EmailTaken)
        }
    }

    fn service() -> (AuthService, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        (AuthService::new(store.clone(), test_config()), store)
    }

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let (auth, _) = service();

        let hash = auth.hash_password("MinhaS3nha!").unwrap();
        assert_ne!(hash, "MinhaS3nha!");
        assert!(hash.starts_with("$argon2id$"));

        assert!(auth.verify_password("MinhaS3nha!", &hash).unwrap());
        assert!(!auth.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let (auth, _) = service();
        assert_ne!(
            auth.hash_password("Senha123").unwrap(),
            auth.hash_password("Senha123").unwrap()
        );
    }

    #[test]
    fn test_corrupt_hash_is_internal_error() {
        let (auth, _) = service();
        assert!(matches!(
            auth.verify_password("Senha123", "not-a-phc-string"),
            Err(AuthError::Internal)
        ));
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (auth, store) = service();

        let user = auth
            .register(register_request("Seguro", "seguro@teste.com", "MinhaS3nha!"))
            .await
            .unwrap();
        assert_eq!(user.email, "seguro@teste.com");

        let stored = store.find_by_email("seguro@teste.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "MinhaS3nha!");
        assert!(auth.verify_password("MinhaS3nha!", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (auth, _) = service();

        auth.register(register_request("João Primeiro", "joao@teste.com", "Senha123"))
            .await
            .unwrap();
        let err = auth
            .register(register_request("Outro Nome", "joao@teste.com", "OutraSenha"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_register_lost_race_is_email_taken() {
        let auth = AuthService::new(Arc::new(RacingStore), test_config());

        let err = auth
            .register(register_request("Corrida", "corrida@teste.com", "Senha123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_validation_short_circuits() {
        let (auth, store) = service();

        let err = auth
            .register(register_request("Teste", "curta@teste.com", "123"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::WeakPassword)
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_success() {
        let (auth, _) = service();
        let registered = auth
            .register(register_request(
                "Login Tester",
                "logintester@logintest.com",
                "Senha123",
            ))
            .await
            .unwrap();

        let response = auth
            .login(login_request("logintester@logintest.com", "Senha123"))
            .await
            .unwrap();

        assert_eq!(response.user, registered);

        let claims = auth.token_codec().verify(&response.token).unwrap();
        assert_eq!(claims.id, registered.id);
        assert_eq!(claims.email, registered.email);
        assert_eq!(claims.name, registered.name);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (auth, _) = service();
        auth.register(register_request(
            "Login Tester",
            "logintester@logintest.com",
            "Senha123",
        ))
        .await
        .unwrap();

        let unknown = auth
            .login(login_request("ghost@x.com", "Senha123"))
            .await
            .unwrap_err();
        let wrong_password = auth
            .login(login_request("logintester@logintest.com", "TotalmenteErrada"))
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_login_unknown_email_still_verifies_a_hash() {
        let (auth, _) = service();
        assert!(auth.dummy_hash.get().is_none());

        let err = auth
            .login(login_request("ghost@x.com", "Senha123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        let dummy = auth.dummy_hash.get().expect("dummy hash computed on miss");
        assert!(dummy.starts_with("$argon2id$"));
        assert!(!auth.verify_password("Senha123", dummy).unwrap());
    }

    #[tokio::test]
    async fn test_login_missing_fields() {
        let (auth, _) = service();

        let err = auth
            .login(LoginRequest {
                email: Some("a@b.com".into()),
                password: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::MissingCredentials)
        ));
    }
}
