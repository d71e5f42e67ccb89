use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;

use shared::protocol::{Bill, RawBill};

use crate::format::{format_date, format_status, parse_display_date};
use crate::RemoteStore;

#[derive(Debug, Error)]
pub enum BillListError {
    #[error("bill service unreachable: {0}")]
    Transport(#[source] anyhow::Error),
}

/// Bill list retrieval and formatting unit.
pub struct BillList {
    store: Option<Arc<dyn RemoteStore>>,
}

impl BillList {
    pub fn new(store: Option<Arc<dyn RemoteStore>>) -> Self {
        Self { store }
    }

    /// Fetches the raw records and produces the display-ready sequence.
    /// Transport-level unreachability propagates; anything wrong with a
    /// single record degrades that record only, so the output count always
    /// matches the input count.
    pub async fn get_bills(&self) -> Result<Vec<Bill>, BillListError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(Vec::new());
        };
        let raw = store
            .bills()
            .list()
            .await
            .map_err(BillListError::Transport)?;
        Ok(raw.into_iter().map(to_display).collect())
    }
}

fn to_display(raw: RawBill) -> Bill {
    let date = raw.date.map(|raw_date| match format_date(&raw_date) {
        Ok(formatted) => formatted,
        Err(err) => {
            warn!(bill_id = %raw.id, "keeping unformatted date: {err}");
            raw_date
        }
    });
    let status = raw.status.map(|raw_status| format_status(&raw_status));

    Bill {
        id: raw.id,
        date,
        status,
        name: raw.name,
        amount: raw.amount,
        vat: raw.vat,
        pct: raw.pct,
        commentary: raw.commentary,
        file_url: raw.file_url,
        file_name: raw.file_name,
        email: raw.email,
        expense_type: raw.expense_type,
    }
}

/// Display-layer ordering over an already-fetched sequence: latest first.
/// Parseable localized dates compare chronologically; everything else falls
/// back to a plain string comparison and sorts behind them, keeping the
/// order total over mixed content.
pub fn sort_latest_first(bills: &mut [Bill]) {
    bills.sort_by(|a, b| sort_key(b.date.as_deref()).cmp(&sort_key(a.date.as_deref())));
}

fn sort_key(date: Option<&str>) -> (Option<NaiveDate>, String) {
    let display = date.unwrap_or_default();
    (parse_display_date(display), display.to_owned())
}
