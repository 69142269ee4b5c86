//! Authentication domain service.
//!
//! Implements [`AuthService`] over an account repository, a password hasher
//! and a token codec.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use super::port_errors::{USER_EXISTS, account_error, hasher_error, token_error};
use super::ports::{AccountRepository, AuthService, PasswordHasher, SignupRequest, TokenCodec};
use super::{
    Account, Error, LoginCredentials, LoginOutcome, PasswordChange, Principal, Role, UserId,
};

/// Account authentication service implementing the driving port.
#[derive(Clone)]
pub struct AccountAuthService<A, H, T> {
    accounts: Arc<A>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<A, H, T> AccountAuthService<A, H, T> {
    /// Create a new service with the given adapters.
    pub fn new(accounts: Arc<A>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<A, H, T> AccountAuthService<A, H, T>
where
    A: AccountRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn verify_password(&self, id: &UserId, password: &str) -> Result<bool, Error> {
        let hash = self
            .accounts
            .password_hash(id)
            .await
            .map_err(account_error)?
            .ok_or_else(|| Error::internal(format!("no credentials stored for account {id}")))?;
        self.hasher.verify(password, &hash).map_err(hasher_error)
    }
}

#[async_trait]
impl<A, H, T> AuthService for AccountAuthService<A, H, T>
where
    A: AccountRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let Some(account) = self
            .accounts
            .find_by_email(credentials.email())
            .await
            .map_err(account_error)?
        else {
            debug!("login rejected: unknown email");
            return Err(Error::invalid_request("User not found"));
        };
        if !account.role.can_log_in() {
            return Err(Error::forbidden("This account cannot log in"));
        }
        if !self
            .verify_password(&account.id, credentials.password())
            .await?
        {
            warn!(user_id = %account.id, "login rejected: wrong password");
            return Err(Error::invalid_request("Invalid password"));
        }
        let token = self
            .tokens
            .issue(&Principal::for_account(&account), self.clock.utc())
            .map_err(token_error)?;
        info!(user_id = %account.id, role = %account.role, "login succeeded");
        Ok(LoginOutcome {
            user: account,
            token,
        })
    }

    async fn signup(&self, request: SignupRequest) -> Result<UserId, Error> {
        let SignupRequest { profile, password } = request;
        if self
            .accounts
            .find_by_email(profile.email.as_str())
            .await
            .map_err(account_error)?
            .is_some()
        {
            return Err(Error::invalid_request(USER_EXISTS));
        }
        let hash = self
            .hasher
            .hash(password.expose())
            .map_err(hasher_error)?;
        let account = Account::individual(
            UserId::generate_for(Role::Individual),
            profile,
            self.clock.utc(),
        );
        self.accounts
            .insert(&account, &hash)
            .await
            .map_err(account_error)?;
        info!(user_id = %account.id, "individual account registered");
        Ok(account.id)
    }

    async fn current_account(&self, principal: &Principal) -> Result<Account, Error> {
        self.accounts
            .find_by_id(principal.user_id())
            .await
            .map_err(account_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn change_password(
        &self,
        principal: &Principal,
        change: PasswordChange,
    ) -> Result<(), Error> {
        let id = principal.user_id();
        if !self.verify_password(id, change.current()).await? {
            return Err(Error::invalid_request("Current password is incorrect"));
        }
        let hash = self
            .hasher
            .hash(change.replacement().expose())
            .map_err(hasher_error)?;
        let replaced = self
            .accounts
            .replace_password(id, &hash, self.clock.utc())
            .await
            .map_err(account_error)?;
        if !replaced {
            return Err(Error::not_found("User not found"));
        }
        info!(user_id = %id, "password changed");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> Result<Principal, Error> {
        self.tokens.verify(token, self.clock.utc()).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            token_error(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockAccountRepository, MockPasswordHasher, MockTokenCodec, PasswordHash, TokenCodecError,
    };
    use crate::domain::service_test_helpers::{fixture_clock, individual, individual_account};
    use crate::domain::{AccessToken, ErrorCode, IndividualDraft, NewPassword};
    use rstest::rstest;

    type Service = AccountAuthService<MockAccountRepository, MockPasswordHasher, MockTokenCodec>;

    fn service(
        accounts: MockAccountRepository,
        hasher: MockPasswordHasher,
        tokens: MockTokenCodec,
    ) -> Service {
        AccountAuthService::new(
            Arc::new(accounts),
            Arc::new(hasher),
            Arc::new(tokens),
            fixture_clock(),
        )
    }

    fn known_account() -> MockAccountRepository {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .returning(|_| Ok(Some(individual_account("ind-001", "john@example.com"))));
        accounts
            .expect_password_hash()
            .returning(|_| Ok(Some(PasswordHash::new("stored"))));
        accounts
    }

    fn checking_hasher(expected: &'static str) -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .returning(move |password, _| Ok(password == expected));
        hasher
    }

    #[rstest]
    #[tokio::test]
    async fn login_issues_token_for_matching_password() {
        let mut tokens = MockTokenCodec::new();
        tokens
            .expect_issue()
            .withf(|principal, _| principal.user_id().as_str() == "ind-001")
            .returning(|_, _| Ok(AccessToken::new("signed")));
        let service = service(known_account(), checking_hasher("password123"), tokens);

        let creds = LoginCredentials::try_from_parts("john@example.com", "password123")
            .expect("credentials");
        let outcome = service.login(&creds).await.expect("login succeeds");

        assert_eq!(outcome.token.as_str(), "signed");
        assert_eq!(outcome.user.id.as_str(), "ind-001");
    }

    #[rstest]
    #[tokio::test]
    async fn login_rejects_wrong_password_without_issuing() {
        let mut tokens = MockTokenCodec::new();
        tokens.expect_issue().never();
        let service = service(known_account(), checking_hasher("password123"), tokens);

        let creds =
            LoginCredentials::try_from_parts("john@example.com", "nope").expect("credentials");
        let err = service.login(&creds).await.expect_err("wrong password");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Invalid password");
    }

    #[rstest]
    #[tokio::test]
    async fn login_reports_unknown_email() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_email().returning(|_| Ok(None));
        let service = service(accounts, MockPasswordHasher::new(), MockTokenCodec::new());

        let creds =
            LoginCredentials::try_from_parts("ghost@example.com", "pw").expect("credentials");
        let err = service.login(&creds).await.expect_err("unknown email");

        assert_eq!(err.message(), "User not found");
    }

    #[rstest]
    #[tokio::test]
    async fn signup_rejects_existing_email_before_hashing() {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();
        let service = service(known_account(), hasher, MockTokenCodec::new());

        let request = SignupRequest {
            profile: IndividualDraft::try_from_parts(
                "John",
                "john@example.com",
                "1",
                "Road",
                None,
            )
            .expect("draft"),
            password: NewPassword::try_new("secret1", None).expect("password"),
        };
        let err = service.signup(request).await.expect_err("duplicate");

        assert_eq!(err.message(), USER_EXISTS);
    }

    #[rstest]
    #[tokio::test]
    async fn change_password_requires_current_password() {
        let mut accounts = known_account();
        accounts.expect_replace_password().never();
        let service = service(accounts, checking_hasher("password123"), MockTokenCodec::new());

        let change =
            PasswordChange::try_from_parts("wrong", "newsecret", "newsecret").expect("change");
        let err = service
            .change_password(&individual("ind-001"), change)
            .await
            .expect_err("wrong current password");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn expired_tokens_are_invalid_requests() {
        let mut tokens = MockTokenCodec::new();
        tokens
            .expect_verify()
            .returning(|_, _| Err(TokenCodecError::expired()));
        let service = service(
            MockAccountRepository::new(),
            MockPasswordHasher::new(),
            tokens,
        );

        let err = service.verify_token("stale").expect_err("expired");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Invalid token");
    }
}
