//! Dashboard controller.
//!
//! [`DashboardState`] is owned by one dashboard activation. Everything the
//! page shows is derived from it by [`DashboardState::view`], which is a pure
//! function of the state and the current calendar date.

use chrono::{Days, NaiveDate};
use log::{debug, error, info};

use crate::error::FetchError;
use crate::format::{capitalize, format_currency, format_date};
use crate::model::{Transaction, TransactionType, UserProfile};
use crate::navigation::View;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;

pub const RECENT_DAYS: u64 = 7;

pub const QUICK_ACTIONS: [&str; 4] = [
    "Transfer Money",
    "Pay Bills",
    "Mobile Recharge",
    "Download Statement",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionFilter {
    #[default]
    All,
    Credit,
    Debit,
    Last7Days,
}

impl TransactionFilter {
    pub const OPTIONS: [TransactionFilter; 4] = [
        TransactionFilter::All,
        TransactionFilter::Credit,
        TransactionFilter::Debit,
        TransactionFilter::Last7Days,
    ];

    pub fn value(self) -> &'static str {
        match self {
            TransactionFilter::All => "all",
            TransactionFilter::Credit => "credit",
            TransactionFilter::Debit => "debit",
            TransactionFilter::Last7Days => "last7",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionFilter::All => "All Transactions",
            TransactionFilter::Credit => "Credits Only",
            TransactionFilter::Debit => "Debits Only",
            TransactionFilter::Last7Days => "Last 7 Days",
        }
    }

    /// Unknown values fall back to `All`.
    pub fn from_value(value: &str) -> Self {
        Self::OPTIONS
            .into_iter()
            .find(|f| f.value() == value)
            .unwrap_or_default()
    }

    /// `Last7Days` keeps dates on or after `today - 7 days`.
    pub fn matches(self, tx: &Transaction, today: NaiveDate) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Credit => tx.is_credit(),
            TransactionFilter::Debit => tx.kind == TransactionType::Debit,
            TransactionFilter::Last7Days => {
                let cutoff = today
                    .checked_sub_days(Days::new(RECENT_DAYS))
                    .unwrap_or(NaiveDate::MIN);
                tx.date >= cutoff
            }
        }
    }
}

pub fn filter_transactions(
    transactions: &[Transaction],
    filter: TransactionFilter,
    today: NaiveDate,
) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|tx| filter.matches(tx, today))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub user_name: String,
    pub user_account: String,
    pub customer_name: String,
    pub customer_account: String,
    pub customer_mobile: String,
    pub customer_email: String,
    pub balance: String,
    pub account_type: String,
}

impl From<&UserProfile> for ProfileView {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_name: profile.customer_name.clone(),
            user_account: format!("Account: {}", profile.account_number),
            customer_name: profile.customer_name.clone(),
            customer_account: profile.account_number.clone(),
            customer_mobile: profile.mobile.clone(),
            customer_email: profile.email.clone(),
            balance: format_currency(profile.balance),
            account_type: profile.account_type.clone(),
        }
    }
}

/// One CSS class per status, whatever the server calls it.
fn status_class(status: &str) -> String {
    let slug: Vec<&str> = status.split_whitespace().collect();
    format!("status-{}", slug.join("-"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub reference: String,
    pub amount: String,
    pub amount_class: &'static str,
    pub status_label: String,
    pub status_class: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        let amount_class = match tx.kind {
            TransactionType::Credit => "transaction-credit",
            TransactionType::Debit => "transaction-debit",
        };
        Self {
            id: tx.id.to_string(),
            date: format_date(tx.date),
            description: tx.description.clone(),
            reference: tx.reference.clone(),
            amount: format!("{}{}", tx.kind.sign(), format_currency(tx.amount)),
            amount_class,
            status_label: capitalize(tx.status.as_str()),
            status_class: status_class(tx.status.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionsPanel {
    Loading,
    Empty,
    Rows(Vec<TransactionRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub profile: ProfileView,
    pub panel: TransactionsPanel,
    /// Size of the fetched list, independent of the active filter.
    pub transaction_count: usize,
    pub filter: TransactionFilter,
}

pub enum Activation {
    Redirect(View),
    Ready(DashboardState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    profile: UserProfile,
    transactions: Vec<Transaction>,
    filter: TransactionFilter,
    loading: bool,
}

impl DashboardState {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            transactions: Vec::new(),
            filter: TransactionFilter::All,
            loading: false,
        }
    }

    /// Without a stored profile nothing is rendered; the caller must go to
    /// the login view.
    pub fn activate<S: KeyValueStore>(session: &SessionStore<S>) -> Activation {
        match session.load() {
            Some(profile) => {
                debug!("dashboard activated for {}", profile.account_number);
                Activation::Ready(Self::new(profile))
            }
            None => {
                info!("no session, redirecting to login");
                Activation::Redirect(View::Login)
            }
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    #[cfg(test)]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// A successful fetch replaces the list wholesale. A failed one leaves
    /// nothing to show, which renders as the empty state.
    pub fn apply_fetch(&mut self, result: Result<Vec<Transaction>, FetchError>) {
        self.loading = false;
        match result {
            Ok(transactions) => {
                debug!("loaded {} transactions", transactions.len());
                self.transactions = transactions;
            }
            Err(err) => {
                error!("{}", err);
                self.transactions.clear();
            }
        }
    }

    pub fn set_filter(&mut self, filter: TransactionFilter) {
        self.filter = filter;
    }

    pub fn show_all(&mut self) {
        self.filter = TransactionFilter::All;
    }

    pub fn view(&self, today: NaiveDate) -> DashboardView {
        let panel = if self.loading {
            TransactionsPanel::Loading
        } else {
            let rows: Vec<TransactionRow> =
                filter_transactions(&self.transactions, self.filter, today)
                    .into_iter()
                    .map(TransactionRow::from)
                    .collect();
            if rows.is_empty() {
                TransactionsPanel::Empty
            } else {
                TransactionsPanel::Rows(rows)
            }
        };

        DashboardView {
            profile: ProfileView::from(&self.profile),
            panel,
            transaction_count: self.transactions.len(),
            filter: self.filter,
        }
    }
}

pub fn logout<S: KeyValueStore>(session: &SessionStore<S>) -> View {
    if let Err(err) = session.clear() {
        error!("could not clear session: {}", err);
    }
    info!("logged out");
    View::Login
}

pub fn quick_action_ack(action: &str) -> String {
    format!(
        "\"{}\" feature would be implemented in a real banking application.",
        action
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{BankService, FixtureBank};
    use crate::config::StorageKeys;
    use crate::error::StorageError;
    use crate::model::{TransactionId, TransactionStatus};
    use crate::storage::MemoryStore;
    use futures::executor::block_on;
    use rust_decimal_macros::dec;
    use std::cell::Cell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            account_number: "1234567890".into(),
            customer_name: "Rahul Sharma".into(),
            balance: dec!(125450.75),
            mobile: "+91 9876543210".into(),
            email: "rahul.sharma@email.com".into(),
            account_type: "Savings Account".into(),
        }
    }

    fn ledger() -> Vec<Transaction> {
        block_on(FixtureBank::instant().fetch_transactions("1234567890")).unwrap()
    }

    fn loaded_state() -> DashboardState {
        let mut state = DashboardState::new(profile());
        state.begin_loading();
        state.apply_fetch(block_on(
            FixtureBank::instant().fetch_transactions(&state.profile().account_number),
        ));
        state
    }

    /// Counts writes so activation can be checked for side effects.
    #[derive(Default)]
    struct WatchedStore {
        inner: MemoryStore,
        writes: Cell<usize>,
    }

    impl KeyValueStore for WatchedStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            self.inner.remove(key)
        }
    }

    #[test]
    fn activation_without_session_redirects_to_login() {
        let store = WatchedStore::default();
        let session = SessionStore::new(&store);

        match DashboardState::activate(&session) {
            Activation::Redirect(view) => assert_eq!(view, View::Login),
            Activation::Ready(_) => panic!("dashboard must not render without a session"),
        }
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn corrupt_session_also_redirects() {
        let store = MemoryStore::new();
        store.set(StorageKeys::USER_DATA, "[1,2,3]").unwrap();
        assert!(matches!(
            DashboardState::activate(&SessionStore::new(&store)),
            Activation::Redirect(View::Login)
        ));
    }

    #[test]
    fn activation_with_session_shows_profile_verbatim() {
        let session = SessionStore::new(MemoryStore::new());
        session.save(&profile(), false).unwrap();

        let Activation::Ready(state) = DashboardState::activate(&session) else {
            panic!("expected a ready dashboard");
        };
        let view = state.view(date(2023, 10, 16));
        assert_eq!(view.profile.user_name, "Rahul Sharma");
        assert_eq!(view.profile.user_account, "Account: 1234567890");
        assert_eq!(view.profile.customer_mobile, "+91 9876543210");
        assert_eq!(view.profile.customer_email, "rahul.sharma@email.com");
        assert_eq!(view.profile.balance, "₹1,25,450.75");
        assert_eq!(view.profile.account_type, "Savings Account");
    }

    #[test]
    fn credit_filter_keeps_only_credits() {
        let ledger = ledger();
        let credits = filter_transactions(&ledger, TransactionFilter::Credit, date(2023, 10, 16));
        assert_eq!(credits.len(), 2);
        assert!(credits.iter().all(|t| t.kind == TransactionType::Credit));

        let debits = filter_transactions(&ledger, TransactionFilter::Debit, date(2023, 10, 16));
        assert_eq!(debits.len(), 5);
    }

    #[test]
    fn last_seven_days_boundary_is_inclusive() {
        let ledger = ledger();
        // 2023-10-08 is exactly seven days before the 15th
        let recent = filter_transactions(&ledger, TransactionFilter::Last7Days, date(2023, 10, 15));
        let refs: Vec<&str> = recent.iter().map(|t| t.reference.as_str()).collect();
        assert_eq!(refs, vec!["SAL20231015", "ATM456789", "EB789012", "FT345678"]);
    }

    #[test]
    fn last_seven_days_can_be_empty() {
        let ledger = ledger();
        let recent = filter_transactions(&ledger, TransactionFilter::Last7Days, date(2024, 1, 1));
        assert!(recent.is_empty());
    }

    #[test]
    fn switching_filters_does_not_lose_rows() {
        let mut state = loaded_state();
        let today = date(2023, 10, 16);

        state.set_filter(TransactionFilter::Debit);
        state.set_filter(TransactionFilter::Last7Days);
        state.set_filter(TransactionFilter::Credit);
        assert_eq!(state.transactions().len(), 7);

        state.show_all();
        let view = state.view(today);
        assert_eq!(view.filter, TransactionFilter::All);
        match view.panel {
            TransactionsPanel::Rows(rows) => assert_eq!(rows.len(), 7),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn count_summary_ignores_the_filter() {
        let mut state = loaded_state();
        state.set_filter(TransactionFilter::Credit);
        assert_eq!(state.view(date(2023, 10, 16)).transaction_count, 7);
    }

    #[test]
    fn rows_are_signed_and_labelled() {
        let state = loaded_state();
        let TransactionsPanel::Rows(rows) = state.view(date(2023, 10, 16)).panel else {
            panic!("expected rows");
        };

        assert_eq!(rows[0].date, "15 Oct 2023");
        assert_eq!(rows[0].amount, "+₹75,000.00");
        assert_eq!(rows[0].amount_class, "transaction-credit");
        assert_eq!(rows[0].status_label, "Completed");

        assert_eq!(rows[5].description, "Credit Card Payment");
        assert_eq!(rows[5].reference, "CC789123");
        assert_eq!(rows[5].amount, "-₹18,450.00");
        assert_eq!(rows[5].amount_class, "transaction-debit");
        assert_eq!(rows[5].status_label, "Pending");
        assert_eq!(rows[5].status_class, "status-pending");
    }

    #[test]
    fn loading_then_empty_state() {
        let mut state = DashboardState::new(profile());
        state.begin_loading();
        assert_eq!(state.view(date(2023, 10, 16)).panel, TransactionsPanel::Loading);

        state.apply_fetch(Ok(Vec::new()));
        let view = state.view(date(2023, 10, 16));
        assert_eq!(view.panel, TransactionsPanel::Empty);
        assert_eq!(view.transaction_count, 0);
    }

    #[test]
    fn failed_fetch_shows_empty_state() {
        let mut state = loaded_state();
        state.begin_loading();
        state.apply_fetch(Err(FetchError::Network));
        assert_eq!(state.view(date(2023, 10, 16)).panel, TransactionsPanel::Empty);
    }

    #[test]
    fn fresh_fetch_replaces_previous_list() {
        let mut state = loaded_state();
        let replacement = Transaction {
            id: TransactionId::Text("srv-1".into()),
            date: date(2023, 11, 1),
            description: "Refund".into(),
            reference: "RF1".into(),
            amount: dec!(10),
            kind: TransactionType::Credit,
            status: TransactionStatus::Other("reversed".into()),
        };
        state.apply_fetch(Ok(vec![replacement.clone()]));
        assert_eq!(state.transactions(), &[replacement][..]);

        let TransactionsPanel::Rows(rows) = state.view(date(2023, 11, 2)).panel else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].id, "srv-1");
        assert_eq!(rows[0].status_label, "Reversed");
    }

    #[test]
    fn multi_word_status_is_a_single_class() {
        let tx = Transaction {
            status: TransactionStatus::Other("pending  review".into()),
            ..ledger()[0].clone()
        };
        let row = TransactionRow::from(&tx);
        assert_eq!(row.status_class, "status-pending-review");
        assert_eq!(row.status_label, "Pending  review");
        assert_eq!(TransactionRow::from(&ledger()[0]).status_class, "status-completed");
    }

    #[test]
    fn logout_clears_profile_but_keeps_remembered_account() {
        let session = SessionStore::new(MemoryStore::new());
        session.save(&profile(), true).unwrap();

        assert_eq!(logout(&session), View::Login);
        assert_eq!(session.load(), None);
        assert_eq!(session.remembered_account().as_deref(), Some("1234567890"));
    }

    #[test]
    fn filter_values_round_trip_through_the_select() {
        for filter in TransactionFilter::OPTIONS {
            assert_eq!(TransactionFilter::from_value(filter.value()), filter);
        }
        assert_eq!(TransactionFilter::from_value("bogus"), TransactionFilter::All);
    }

    #[test]
    fn quick_actions_only_acknowledge() {
        assert_eq!(
            quick_action_ack("Pay Bills"),
            "\"Pay Bills\" feature would be implemented in a real banking application."
        );
    }
}
