use crate::{
    dtos::auth::{LoginRequest, LoginResponse, RegisterRequest},
    models::SanitizedUser,
    services::{
        CredentialStore, LockoutTracker, PasswordPolicy, ServiceError, SessionTokenClaims,
        TokenService,
    },
    utils::Password,
};

/// Orchestrates registration, login, and logout over the credential store,
/// lockout tracker, and token service. The only component with business
/// rules; the leaves stay policy-free.
#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialStore,
    lockout: LockoutTracker,
    tokens: TokenService,
    policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(
        credentials: CredentialStore,
        lockout: LockoutTracker,
        tokens: TokenService,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            credentials,
            lockout,
            tokens,
            policy,
        }
    }

    pub fn register_account(&self, req: RegisterRequest) -> Result<SanitizedUser, ServiceError> {
        if req.identifier.is_empty()
            || req.password.is_empty()
            || req.first_name.is_empty()
            || req.last_name.is_empty()
        {
            return Err(ServiceError::Validation(
                "All fields are required".to_string(),
            ));
        }

        self.policy
            .validate_password(&req.password)
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let user = self.credentials.register(
            &req.identifier,
            &Password::new(req.password),
            &req.first_name,
            &req.last_name,
        )?;

        tracing::info!(identifier = %user.identifier, "User registered");

        Ok(user.sanitized())
    }

    pub fn login(&self, req: LoginRequest) -> Result<LoginResponse, ServiceError> {
        if req.identifier.is_empty() || req.password.is_empty() {
            return Err(ServiceError::Validation(
                "Identifier and password are required".to_string(),
            ));
        }

        if let Some(remaining_seconds) = self.lockout.is_locked(&req.identifier) {
            return Err(ServiceError::Locked {
                minutes_remaining: (remaining_seconds + 59) / 60,
            });
        }

        // Unknown identifiers take the same failure path as wrong passwords,
        // so the response does not reveal whether an account exists.
        let user = match self.credentials.lookup(&req.identifier) {
            Some(user) => user,
            None => return Err(self.failed_attempt(&req.identifier)),
        };

        if !self
            .credentials
            .verify_password(&user, &Password::new(req.password))
        {
            return Err(self.failed_attempt(&req.identifier));
        }

        self.lockout.record_success(&req.identifier);
        let token = self.tokens.issue(&req.identifier)?;

        tracing::info!(identifier = %user.identifier, "User logged in");

        Ok(LoginResponse {
            token,
            user: user.sanitized(),
        })
    }

    fn failed_attempt(&self, identifier: &str) -> ServiceError {
        let count = self.lockout.record_failure(identifier);
        ServiceError::InvalidCredentials {
            attempts_remaining: self.lockout.max_attempts().saturating_sub(count),
        }
    }

    /// Shared gate for protected operations. Whatever the verification
    /// failure was, the caller only learns that it is unauthenticated; the
    /// kind goes to the log.
    pub fn authenticate_request(
        &self,
        token: Option<&str>,
    ) -> Result<SessionTokenClaims, ServiceError> {
        let token = token.ok_or(ServiceError::Unauthenticated)?;

        self.tokens.verify(token).map_err(|e| {
            tracing::debug!(reason = %e, "Session token rejected");
            ServiceError::Unauthenticated
        })
    }

    /// Revoke the presented (already verified) token.
    pub fn logout(&self, claims: &SessionTokenClaims) {
        self.tokens.revoke(&claims.jti);
        tracing::info!(identifier = %claims.sub, "User logged out");
    }

    pub fn profile(&self, identifier: &str) -> Option<SanitizedUser> {
        self.credentials.lookup(identifier).map(|u| u.sanitized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HashingConfig, LockoutConfig, TokenConfig};

    fn service() -> AuthService {
        service_with_lockout(900)
    }

    fn service_with_lockout(lock_duration_seconds: u64) -> AuthService {
        AuthService::new(
            CredentialStore::new(&HashingConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            })
            .expect("Failed to build store"),
            LockoutTracker::new(&LockoutConfig {
                max_attempts: 3,
                lock_duration_seconds,
            }),
            TokenService::new(&TokenConfig { ttl_seconds: 3600 }),
            PasswordPolicy::default(),
        )
    }

    fn register_alice(service: &AuthService) {
        service
            .register_account(RegisterRequest {
                identifier: "alice@example.com".to_string(),
                password: "Str0ng!Pass".to_string(),
                first_name: "Alice".to_string(),
                last_name: "A".to_string(),
            })
            .expect("registration failed");
    }

    fn login(service: &AuthService, password: &str) -> Result<LoginResponse, ServiceError> {
        service.login(LoginRequest {
            identifier: "alice@example.com".to_string(),
            password: password.to_string(),
        })
    }

    #[test]
    fn test_register_rejects_empty_fields() {
        let service = service();
        let result = service.register_account(RegisterRequest {
            identifier: "alice@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            first_name: "".to_string(),
            last_name: "A".to_string(),
        });
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_register_rejects_weak_passwords() {
        let service = service();
        for weak in [
            "Sh0rt!x",      // too short
            "str0ng!pass",  // no uppercase
            "STR0NG!PASS",  // no lowercase
            "Strong!Pass",  // no digit
            "Str0ngPass1",  // no special character
        ] {
            let result = service.register_account(RegisterRequest {
                identifier: "alice@example.com".to_string(),
                password: weak.to_string(),
                first_name: "Alice".to_string(),
                last_name: "A".to_string(),
            });
            assert!(
                matches!(result, Err(ServiceError::Validation(_))),
                "password {:?} should have been rejected",
                weak
            );
        }
    }

    #[test]
    fn test_register_duplicate_fails() {
        let service = service();
        register_alice(&service);

        let result = service.register_account(RegisterRequest {
            identifier: "alice@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            first_name: "Alice".to_string(),
            last_name: "A".to_string(),
        });
        assert!(matches!(result, Err(ServiceError::AlreadyExists)));
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let service = service();
        register_alice(&service);

        let res = login(&service, "Str0ng!Pass").expect("login failed");
        assert_eq!(res.user.identifier, "alice@example.com");
        assert_eq!(res.user.first_name, "Alice");

        let claims = service
            .authenticate_request(Some(&res.token))
            .expect("token should verify");
        assert_eq!(claims.sub, "alice@example.com");
    }

    #[test]
    fn test_login_failure_counts_down_and_locks() {
        let service = service();
        register_alice(&service);

        for expected_remaining in [2, 1, 0] {
            match login(&service, "WrongPass1!") {
                Err(ServiceError::InvalidCredentials { attempts_remaining }) => {
                    assert_eq!(attempts_remaining, expected_remaining)
                }
                other => panic!("expected InvalidCredentials, got {:?}", other.err()),
            }
        }

        // Locked now, even with the correct password
        match login(&service, "Str0ng!Pass") {
            Err(ServiceError::Locked { minutes_remaining }) => {
                assert_eq!(minutes_remaining, 15)
            }
            other => panic!("expected Locked, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_successful_login_resets_failure_count() {
        let service = service();
        register_alice(&service);

        login(&service, "WrongPass1!").unwrap_err();
        login(&service, "WrongPass1!").unwrap_err();
        login(&service, "Str0ng!Pass").expect("login failed");

        // Counter restarted from zero
        match login(&service, "WrongPass1!") {
            Err(ServiceError::InvalidCredentials { attempts_remaining }) => {
                assert_eq!(attempts_remaining, 2)
            }
            other => panic!("expected InvalidCredentials, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_expired_lock_allows_login_again() {
        let service = service_with_lockout(0);
        register_alice(&service);

        for _ in 0..3 {
            login(&service, "WrongPass1!").unwrap_err();
        }
        login(&service, "Str0ng!Pass").expect("login should succeed once the lock expired");
    }

    #[test]
    fn test_unknown_identifier_indistinguishable_from_wrong_password() {
        let service = service();
        register_alice(&service);

        let unknown = service
            .login(LoginRequest {
                identifier: "ghost@example.com".to_string(),
                password: "Whatever1!".to_string(),
            })
            .unwrap_err();
        let wrong = login(&service, "WrongPass1!").unwrap_err();

        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_unknown_identifier_can_lock() {
        let service = service();

        for _ in 0..3 {
            service
                .login(LoginRequest {
                    identifier: "ghost@example.com".to_string(),
                    password: "Whatever1!".to_string(),
                })
                .unwrap_err();
        }

        let result = service.login(LoginRequest {
            identifier: "ghost@example.com".to_string(),
            password: "Whatever1!".to_string(),
        });
        assert!(matches!(result, Err(ServiceError::Locked { .. })));
    }

    #[test]
    fn test_login_rejects_empty_fields() {
        let service = service();
        let result = service.login(LoginRequest {
            identifier: "".to_string(),
            password: "Str0ng!Pass".to_string(),
        });
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_logout_revokes_the_token() {
        let service = service();
        register_alice(&service);

        let res = login(&service, "Str0ng!Pass").expect("login failed");
        let claims = service
            .authenticate_request(Some(&res.token))
            .expect("token should verify");

        service.logout(&claims);

        let result = service.authenticate_request(Some(&res.token));
        assert!(matches!(result, Err(ServiceError::Unauthenticated)));
    }

    #[test]
    fn test_missing_token_is_unauthenticated() {
        let service = service();
        let result = service.authenticate_request(None);
        assert!(matches!(result, Err(ServiceError::Unauthenticated)));
    }
}
