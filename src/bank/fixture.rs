use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{simulate_latency, BankService};
use crate::config::Timings;
use crate::error::{AuthError, FetchError};
use crate::model::{Transaction, TransactionId, TransactionStatus, TransactionType, UserProfile};

struct DemoAccount {
    password: &'static str,
    account_number: &'static str,
    customer_name: &'static str,
    balance: Decimal,
    mobile: &'static str,
    email: &'static str,
    account_type: &'static str,
}

impl DemoAccount {
    fn profile(&self) -> UserProfile {
        UserProfile {
            account_number: self.account_number.to_string(),
            customer_name: self.customer_name.to_string(),
            balance: self.balance,
            mobile: self.mobile.to_string(),
            email: self.email.to_string(),
            account_type: self.account_type.to_string(),
        }
    }
}

fn demo_accounts() -> [DemoAccount; 2] {
    [
        DemoAccount {
            password: "demo123",
            account_number: "1234567890",
            customer_name: "Rahul Sharma",
            balance: dec!(125450.75),
            mobile: "+91 9876543210",
            email: "rahul.sharma@email.com",
            account_type: "Savings Account",
        },
        DemoAccount {
            password: "test456",
            account_number: "9876543210",
            customer_name: "Priya Patel",
            balance: dec!(89320.50),
            mobile: "+91 8765432109",
            email: "priya.patel@email.com",
            account_type: "Current Account",
        },
    ]
}

type LedgerRow = (
    i64,
    (i32, u32, u32),
    &'static str,
    &'static str,
    Decimal,
    TransactionType,
    TransactionStatus,
);

fn demo_ledger() -> Vec<Transaction> {
    use TransactionStatus::{Completed, Pending};
    use TransactionType::{Credit, Debit};

    let rows: [LedgerRow; 7] = [
        (1, (2023, 10, 15), "Salary Credit", "SAL20231015", dec!(75000.00), Credit, Completed),
        (2, (2023, 10, 12), "ATM Withdrawal", "ATM456789", dec!(5000.00), Debit, Completed),
        (3, (2023, 10, 10), "Electricity Bill", "EB789012", dec!(2450.00), Debit, Completed),
        (4, (2023, 10, 8), "Fund Transfer to Ajay", "FT345678", dec!(15000.00), Debit, Completed),
        (5, (2023, 10, 5), "Interest Credit", "INT20231005", dec!(1250.50), Credit, Completed),
        (6, (2023, 10, 1), "Credit Card Payment", "CC789123", dec!(18450.00), Debit, Pending),
        (7, (2023, 9, 28), "Mobile Recharge", "MR456123", dec!(599.00), Debit, Completed),
    ];

    rows.into_iter()
        .filter_map(|(id, (y, m, d), description, reference, amount, kind, status)| {
            Some(Transaction {
                id: TransactionId::Number(id),
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                description: description.to_string(),
                reference: reference.to_string(),
                amount,
                kind,
                status,
            })
        })
        .collect()
}

/// Offline bank with two demo customers. Every account sees the same ledger.
pub struct FixtureBank {
    login_latency: Duration,
    transactions_latency: Duration,
}

impl FixtureBank {
    pub fn new(timings: &Timings) -> Self {
        Self {
            login_latency: timings.login_latency,
            transactions_latency: timings.transactions_latency,
        }
    }

    #[cfg(test)]
    pub fn instant() -> Self {
        Self::new(&Timings::instant())
    }
}

#[async_trait(?Send)]
impl BankService for FixtureBank {
    async fn authenticate(
        &self,
        account_number: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        simulate_latency(self.login_latency).await;

        demo_accounts()
            .iter()
            .find(|acc| acc.account_number == account_number && acc.password == password)
            .map(DemoAccount::profile)
            .ok_or_else(|| {
                debug!("demo login rejected");
                AuthError::InvalidCredentials
            })
    }

    async fn fetch_transactions(
        &self,
        account_number: &str,
    ) -> Result<Vec<Transaction>, FetchError> {
        simulate_latency(self.transactions_latency).await;
        debug!("serving demo ledger for {}", account_number);
        Ok(demo_ledger())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn known_account_returns_its_profile() {
        let bank = FixtureBank::instant();
        let profile = block_on(bank.authenticate("9876543210", "test456")).unwrap();
        assert_eq!(profile.account_number, "9876543210");
        assert_eq!(profile.customer_name, "Priya Patel");
        assert_eq!(profile.balance, dec!(89320.50));
    }

    #[test]
    fn wrong_password_and_unknown_account_look_the_same() {
        let bank = FixtureBank::instant();
        let wrong_password = block_on(bank.authenticate("1234567890", "test456")).unwrap_err();
        let unknown_account = block_on(bank.authenticate("1111111111", "demo123")).unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(wrong_password.to_string(), unknown_account.to_string());
    }

    #[test]
    fn passwords_are_per_account() {
        let bank = FixtureBank::instant();
        assert!(block_on(bank.authenticate("9876543210", "demo123")).is_err());
    }

    #[test]
    fn ledger_is_newest_first_with_two_credits() {
        let bank = FixtureBank::instant();
        let ledger = block_on(bank.fetch_transactions("1234567890")).unwrap();

        assert_eq!(ledger.len(), 7);
        assert!(ledger.windows(2).all(|w| w[0].date >= w[1].date));
        assert_eq!(ledger.iter().filter(|t| t.is_credit()).count(), 2);
        assert_eq!(ledger[5].status, TransactionStatus::Pending);
    }
}
