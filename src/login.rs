//! Login form controller: validation, the submit state machine and the
//! auto-hiding error banner.

use log::{debug, error};

use crate::bank::BankService;
use crate::error::{AuthError, ValidationError};
use crate::model::UserProfile;
use crate::navigation::View;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;

pub const ACCOUNT_NUMBER_LEN: usize = 10;
const SAVE_FAILED: &str = "Login failed. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub account_number: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    pub fn prefilled<S: KeyValueStore>(session: &SessionStore<S>) -> Self {
        match session.remembered_account() {
            Some(account_number) => Self {
                account_number,
                password: String::new(),
                remember_me: true,
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_number: String,
    pub password: String,
}

pub fn is_valid_account_number(account_number: &str) -> bool {
    account_number.len() == ACCOUNT_NUMBER_LEN
        && account_number.bytes().all(|b| b.is_ascii_digit())
}

/// Emptiness first, then the 10-digit format. The account number is trimmed,
/// the password is taken as typed.
pub fn validate(form: &LoginForm) -> Result<Credentials, ValidationError> {
    let account_number = form.account_number.trim();
    if account_number.is_empty() || form.password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_account_number(account_number) {
        return Err(ValidationError::InvalidAccountNumber);
    }
    Ok(Credentials {
        account_number: account_number.to_string(),
        password: form.password.clone(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoginPhase {
    #[default]
    Idle,
    Submitting,
    Redirecting(View),
    ShowingError(String),
}

impl LoginPhase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, LoginPhase::Submitting)
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            LoginPhase::Submitting | LoginPhase::Redirecting(_) => "Authenticating...",
            _ => "Secure Login",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoginPhase::ShowingError(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoginFlow {
    phase: LoginPhase,
}

impl LoginFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &LoginPhase {
        &self.phase
    }

    /// `Idle`/`ShowingError` -> `Submitting` when the form is valid. Returns
    /// `None` when nothing should be sent: the form was rejected (the phase
    /// now shows why) or a submit is already in flight.
    pub fn begin(&mut self, form: &LoginForm) -> Option<Credentials> {
        match self.phase {
            LoginPhase::Submitting | LoginPhase::Redirecting(_) => return None,
            LoginPhase::Idle | LoginPhase::ShowingError(_) => {}
        }
        match validate(form) {
            Ok(credentials) => {
                self.phase = LoginPhase::Submitting;
                Some(credentials)
            }
            Err(err) => {
                self.phase = LoginPhase::ShowingError(err.to_string());
                None
            }
        }
    }

    /// `Submitting` -> `Redirecting` (session saved) or `ShowingError`.
    pub fn finish<S: KeyValueStore>(
        &mut self,
        result: Result<UserProfile, AuthError>,
        remember_me: bool,
        session: &SessionStore<S>,
    ) -> &LoginPhase {
        if !self.phase.is_submitting() {
            return &self.phase;
        }
        self.phase = match result {
            Ok(profile) => match session.save(&profile, remember_me) {
                Ok(()) => LoginPhase::Redirecting(View::Dashboard),
                Err(err) => {
                    error!("could not persist session: {}", err);
                    LoginPhase::ShowingError(SAVE_FAILED.to_string())
                }
            },
            Err(err) => LoginPhase::ShowingError(err.to_string()),
        };
        &self.phase
    }
}

pub async fn authenticate(
    bank: &dyn BankService,
    credentials: &Credentials,
) -> Result<UserProfile, AuthError> {
    debug!("authenticating {}", credentials.account_number);
    bank.authenticate(&credentials.account_number, &credentials.password)
        .await
}

/// Error text that hides itself after a timeout.
///
/// Every `show` bumps the generation; an expiry for an older generation is
/// ignored, so a replaced message's timer never hides its successor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBanner {
    message: Option<String>,
    generation: u64,
}

impl ErrorBanner {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the token to pass to [`ErrorBanner::expire`] when the timer fires.
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        self.generation += 1;
        self.message = Some(message.into());
        self.generation
    }

    pub fn expire(&mut self, token: u64) {
        if token == self.generation {
            self.message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::FixtureBank;
    use crate::config::StorageKeys;
    use crate::dashboard::{Activation, DashboardState};
    use crate::error::FetchError;
    use crate::model::Transaction;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use proptest::prelude::*;
    use std::cell::Cell;

    /// Counts calls and delegates to the demo bank.
    #[derive(Default)]
    struct CountingBank {
        auth_calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl BankService for CountingBank {
        async fn authenticate(
            &self,
            account_number: &str,
            password: &str,
        ) -> Result<UserProfile, AuthError> {
            self.auth_calls.set(self.auth_calls.get() + 1);
            FixtureBank::instant()
                .authenticate(account_number, password)
                .await
        }

        async fn fetch_transactions(&self, _account_number: &str) -> Result<Vec<Transaction>, FetchError> {
            Ok(Vec::new())
        }
    }

    /// Same sequence as the login page's submit handler.
    fn submit<S: KeyValueStore>(
        flow: &mut LoginFlow,
        form: &LoginForm,
        bank: &dyn BankService,
        session: &SessionStore<S>,
    ) -> LoginPhase {
        if let Some(credentials) = flow.begin(form) {
            let result = block_on(authenticate(bank, &credentials));
            flow.finish(result, form.remember_me, session);
        }
        flow.phase().clone()
    }

    fn form(account: &str, password: &str, remember_me: bool) -> LoginForm {
        LoginForm {
            account_number: account.to_string(),
            password: password.to_string(),
            remember_me,
        }
    }

    #[test]
    fn empty_fields_are_checked_before_format() {
        assert_eq!(
            validate(&form("", "demo123", false)),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate(&form("12ab", "", false)),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate(&form("   ", "demo123", false)),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate(&form("12345", "demo123", false)),
            Err(ValidationError::InvalidAccountNumber)
        );
    }

    #[test]
    fn account_number_is_trimmed() {
        let credentials = validate(&form(" 1234567890 ", "demo123", false)).unwrap();
        assert_eq!(credentials.account_number, "1234567890");
    }

    #[test]
    fn successful_login_saves_session_and_redirects() {
        let store = MemoryStore::new();
        let session = SessionStore::new(&store);
        let bank = CountingBank::default();
        let mut flow = LoginFlow::new();

        let phase = submit(&mut flow, &form("1234567890", "demo123", true), &bank, &session);
        assert_eq!(phase, LoginPhase::Redirecting(View::Dashboard));
        assert_eq!(bank.auth_calls.get(), 1);
        assert_eq!(
            session.load().map(|p| p.account_number).as_deref(),
            Some("1234567890")
        );
        assert_eq!(store.get(StorageKeys::REMEMBER_ME).as_deref(), Some("true"));
    }

    #[test]
    fn failed_login_shows_error_and_allows_retry() {
        let session = SessionStore::new(MemoryStore::new());
        let bank = CountingBank::default();
        let mut flow = LoginFlow::new();

        let phase = submit(&mut flow, &form("1234567890", "wrong", false), &bank, &session);
        assert_eq!(
            phase.error(),
            Some("Invalid account number or password")
        );
        assert!(!phase.is_submitting());
        assert_eq!(session.load(), None);

        let phase = submit(&mut flow, &form("1234567890", "demo123", false), &bank, &session);
        assert_eq!(phase, LoginPhase::Redirecting(View::Dashboard));
        assert_eq!(bank.auth_calls.get(), 2);
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), crate::error::StorageError> {
            Err(crate::error::StorageError::Unavailable)
        }

        fn remove(&self, _key: &str) -> Result<(), crate::error::StorageError> {
            Err(crate::error::StorageError::Unavailable)
        }
    }

    #[test]
    fn unsaved_session_keeps_user_on_login() {
        let session = SessionStore::new(ReadOnlyStore);
        let mut flow = LoginFlow::new();

        let phase = submit(
            &mut flow,
            &form("1234567890", "demo123", false),
            &CountingBank::default(),
            &session,
        );
        assert_eq!(phase.error(), Some("Login failed. Please try again."));
    }

    /// Lets the first write through, then runs out of quota.
    #[derive(Default)]
    struct QuotaStore {
        inner: MemoryStore,
        writes: Cell<usize>,
    }

    impl KeyValueStore for QuotaStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), crate::error::StorageError> {
            self.writes.set(self.writes.get() + 1);
            if self.writes.get() > 1 {
                return Err(crate::error::StorageError::Write(key.to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), crate::error::StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn partially_saved_login_is_not_a_session() {
        let session = SessionStore::new(QuotaStore::default());
        let mut flow = LoginFlow::new();

        let phase = submit(
            &mut flow,
            &form("1234567890", "demo123", true),
            &CountingBank::default(),
            &session,
        );
        assert_eq!(phase.error(), Some("Login failed. Please try again."));
        assert!(matches!(
            DashboardState::activate(&session),
            Activation::Redirect(View::Login)
        ));
    }

    #[test]
    fn submit_while_submitting_is_ignored() {
        let mut flow = LoginFlow::new();
        assert!(flow.begin(&form("1234567890", "demo123", false)).is_some());
        assert_eq!(flow.phase().submit_label(), "Authenticating...");
        assert!(flow.begin(&form("1234567890", "demo123", false)).is_none());
        assert!(flow.phase().is_submitting());
    }

    #[test]
    fn prefill_uses_remembered_account() {
        let store = MemoryStore::new();
        let session = SessionStore::new(&store);
        assert_eq!(LoginForm::prefilled(&session), LoginForm::default());

        store.set(StorageKeys::ACCOUNT_NUMBER, "9876543210").unwrap();
        store.set(StorageKeys::REMEMBER_ME, "true").unwrap();
        let prefilled = LoginForm::prefilled(&session);
        assert_eq!(prefilled.account_number, "9876543210");
        assert!(prefilled.remember_me);
        assert!(prefilled.password.is_empty());
    }

    #[test]
    fn banner_expiry_only_clears_its_own_message() {
        let mut banner = ErrorBanner::default();
        let first = banner.show("Please enter both account number and password");
        let second = banner.show("Invalid account number or password");

        banner.expire(first);
        assert_eq!(banner.message(), Some("Invalid account number or password"));

        banner.expire(second);
        assert_eq!(banner.message(), None);
    }

    proptest! {
        #[test]
        fn malformed_account_numbers_never_reach_the_bank(account in "\\PC{0,14}") {
            prop_assume!(!is_valid_account_number(account.trim()));
            let mut flow = LoginFlow::new();
            prop_assert!(flow.begin(&form(&account, "demo123", false)).is_none());
            prop_assert!(flow.phase().error().is_some());
        }

        #[test]
        fn ten_digit_accounts_pass_validation(account in "[0-9]{10}") {
            prop_assert!(validate(&form(&account, "x", false)).is_ok());
        }
    }
}
