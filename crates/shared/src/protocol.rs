use serde::{Deserialize, Serialize};

use crate::domain::UserRole;

/// Credential pair submitted by a login form. Transient: serialized for the
/// login call and dropped, never persisted as plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Payload of the account-creation fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupPayload {
    #[serde(rename = "type")]
    pub role: UserRole,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub jwt: String,
}

/// Bill record as received from the persistence service. Field presence is
/// not guaranteed; everything beyond the identifier is optional and decoded
/// with explicit defaults so one malformed record cannot poison a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBill {
    pub id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub vat: Option<String>,
    #[serde(default)]
    pub pct: Option<u32>,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "type")]
    pub expense_type: Option<String>,
}

/// Display form of a bill: same shape as [`RawBill`], with `date` and
/// `status` carrying the formatted strings (or the untouched raw value when
/// formatting was not possible).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub vat: Option<String>,
    #[serde(default)]
    pub pct: Option<u32>,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "type")]
    pub expense_type: Option<String>,
}

/// Resolved value of the file-upload call: the stored file's URL and the
/// identifier the service allocated for the bill record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillCreated {
    pub file_url: String,
    pub key: String,
}

/// Finalization payload: caller-serialized JSON plus the record selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillUpdate {
    pub data: String,
    pub selector: String,
}
