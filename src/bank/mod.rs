//! Authentication and transaction history behind one service trait.
//!
//! Two implementations exist: [`FixtureBank`] (hardcoded demo data with
//! simulated latency) and [`RemoteBank`] (the script endpoint over HTTP).
//! Which one the app uses is decided by [`AppConfig`].

mod fixture;
mod remote;
mod transport;

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use log::info;

use crate::config::{AppConfig, Backend};
use crate::error::{AuthError, FetchError};
use crate::model::{Transaction, UserProfile};

pub use fixture::FixtureBank;
pub use remote::RemoteBank;
pub use transport::{GlooTransport, HttpTransport};

#[async_trait(?Send)]
pub trait BankService {
    /// Looks up the profile for a 10-digit account number. The caller
    /// validates the account format. Unknown account and wrong password
    /// both yield [`AuthError::InvalidCredentials`].
    async fn authenticate(&self, account_number: &str, password: &str)
        -> Result<UserProfile, AuthError>;

    /// Full history in source order. An empty list is not an error.
    async fn fetch_transactions(&self, account_number: &str)
        -> Result<Vec<Transaction>, FetchError>;
}

pub fn build_bank(config: &AppConfig) -> Rc<dyn BankService> {
    match &config.backend {
        Backend::Fixture => {
            info!("using the offline demo bank");
            Rc::new(FixtureBank::new(&config.timings))
        }
        Backend::Remote { endpoint } => {
            info!("using remote bank at {}", endpoint);
            Rc::new(RemoteBank::new(endpoint.clone(), GlooTransport))
        }
    }
}

// zero never touches the browser timer
pub(crate) async fn simulate_latency(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    gloo_timers::future::sleep(delay).await;
}
