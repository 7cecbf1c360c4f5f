use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
///
/// **Plaintext password warning**: `password` is stored and compared as-is.
/// This mirrors the product's local-demo storage model and is unsuitable for
/// any deployment where the store file can be read by another party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Unique across all accounts, compared case-sensitively as stored.
    pub email: String,
    /// Plaintext, length >= 6 enforced at creation only.
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// The current session — a copy of an [`Account`] with the password stripped.
///
/// A denormalized copy, not a pointer: later account edits do not flow into
/// an existing session except through an explicit profile update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for Session {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            created_at: account.created_at,
        }
    }
}

/// One question/answer pair in the chat transcript.  Never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: String,
    pub user_message: String,
    pub bot_response: String,
    pub timestamp: DateTime<Utc>,
    /// Locale-formatted display date, frozen at write time.
    pub date: String,
    /// Locale-formatted display time, frozen at write time.
    pub time: String,
}

/// Appointment status lifecycle: `Scheduled` → `Cancelled`, no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
}

impl AppointmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A booked appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    /// Validated into [1, 150] at booking time only.
    pub age: u32,
    pub symptoms: String,
    /// Calendar date as `YYYY-MM-DD`; compared lexicographically.
    pub date: String,
    /// Time-of-day display string, e.g. `"10:00"`.
    pub time: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub created_date: String,
    pub created_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Backup projection of all user-owned data, for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDataExport {
    pub chat_history: Vec<ChatEntry>,
    pub appointments: Vec<Appointment>,
    pub export_date: DateTime<Utc>,
}

/// Locale-formatted display date for "now", frozen into records at write time.
pub(crate) fn display_date(now: DateTime<Utc>) -> String {
    now.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
}

/// Locale-formatted display time for "now", frozen into records at write time.
pub(crate) fn display_time(now: DateTime<Utc>) -> String {
    now.with_timezone(&Local).format("%-I:%M:%S %p").to_string()
}

/// Today's calendar date as `YYYY-MM-DD`, for lexicographic comparison
/// against [`Appointment::date`].
pub(crate) fn today_iso() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
