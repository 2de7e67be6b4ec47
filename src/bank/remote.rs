use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde_json::Value;

use super::{BankService, HttpTransport};
use crate::error::{AuthError, FetchError};
use crate::model::{Transaction, TransactionId, TransactionStatus, TransactionType, UserProfile};

/// Bank backed by the script endpoint (`?action=login`, `?action=transactions`).
///
/// The login call carries the password as a query parameter. This is a
/// placeholder transport for the demo endpoint and must not be treated as
/// an authentication channel.
pub struct RemoteBank<T: HttpTransport> {
    endpoint: String,
    transport: T,
}

impl<T: HttpTransport> RemoteBank<T> {
    pub fn new(endpoint: impl Into<String>, transport: T) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
        }
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> BankService for RemoteBank<T> {
    async fn authenticate(
        &self,
        account_number: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        debug!("remote login for {}", account_number);
        let reply = self
            .transport
            .get_json(
                &self.endpoint,
                &[
                    ("action", "login"),
                    ("account", account_number),
                    ("password", password),
                ],
            )
            .await?;

        profile_from_reply(&reply, account_number).ok_or(AuthError::InvalidCredentials)
    }

    async fn fetch_transactions(
        &self,
        account_number: &str,
    ) -> Result<Vec<Transaction>, FetchError> {
        let reply = self
            .transport
            .get_json(
                &self.endpoint,
                &[("action", "transactions"), ("account", account_number)],
            )
            .await?;

        let Value::Array(rows) = reply else {
            warn!("transactions reply is not a list, showing none");
            return Ok(Vec::new());
        };

        Ok(rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| {
                let tx = transaction_from_row(idx, row);
                if tx.is_none() {
                    warn!("skipping undecodable transaction row {}", idx);
                }
                tx
            })
            .collect())
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn decimal(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim().replace(',', "").as_str()).ok(),
        _ => None,
    }
}

/// `2023-10-15` or an RFC 3339 timestamp.
fn date(value: Option<&Value>) -> Option<NaiveDate> {
    let raw = value?.as_str()?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn profile_from_reply(reply: &Value, account_number: &str) -> Option<UserProfile> {
    let status = text(reply.get("status"));
    if !status.eq_ignore_ascii_case("success") {
        return None;
    }

    // the profile always belongs to the account that was authenticated
    let account = text(reply.get("account"));
    if !account.is_empty() && account != account_number {
        warn!(
            "login reply names account {} instead of {}, rejecting",
            account, account_number
        );
        return None;
    }

    let balance = decimal(reply.get("balance")).unwrap_or_else(|| {
        warn!("login reply has no readable balance");
        Decimal::ZERO
    });

    Some(UserProfile {
        account_number: account_number.to_string(),
        customer_name: text(reply.get("name")),
        balance,
        mobile: text(reply.get("mobile")),
        email: text(reply.get("email")),
        account_type: text(reply.get("accountType")),
    })
}

fn transaction_from_row(idx: usize, row: &Value) -> Option<Transaction> {
    let kind = TransactionType::parse(row.get("type")?.as_str()?)?;
    let amount = decimal(row.get("amount"))?.abs();
    let date = date(row.get("date"))?;

    let id = match row.get("id") {
        Some(Value::Number(n)) => n.as_i64().map(TransactionId::Number),
        Some(Value::String(s)) if !s.is_empty() => Some(TransactionId::Text(s.clone())),
        _ => None,
    }
    .unwrap_or(TransactionId::Number(idx as i64 + 1));

    let status = match text(row.get("status")) {
        s if s.is_empty() => TransactionStatus::Completed,
        s => TransactionStatus::from(s),
    };

    Some(Transaction {
        id,
        date,
        description: text(row.get("description")),
        reference: text(row.get("reference")),
        amount,
        kind,
        status,
    })
}
