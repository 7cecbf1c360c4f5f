//! Appointment ledger — booking records with a status lifecycle.
//!
//! Sole writer of the `appointments` key.  Records are stored newest-first;
//! the "upcoming" view is a derived projection, never a stored form.

use chrono::Utc;
use uuid::Uuid;

use crate::error::LedgerError;
use crate::kv::{APPOINTMENTS_KEY, KvStore};
use crate::schema::{self, Appointment, AppointmentStatus};

/// Inclusive age bounds accepted at booking time.
const AGE_RANGE: std::ops::RangeInclusive<u32> = 1..=150;

pub struct AppointmentLedger<'a> {
    store: &'a KvStore,
}

impl<'a> AppointmentLedger<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }

    /// All appointments, newest-first.
    pub fn list(&self) -> Result<Vec<Appointment>, LedgerError> {
        Ok(self.store.get(APPOINTMENTS_KEY)?.unwrap_or_default())
    }

    /// Book a new appointment with `status = Scheduled`.
    ///
    /// Fails with `Validation` on blank fields or an age outside [1, 150];
    /// nothing is persisted on failure.
    pub fn book(
        &self,
        patient_name: &str,
        age: u32,
        symptoms: &str,
        date: &str,
        time: &str,
    ) -> Result<Appointment, LedgerError> {
        if patient_name.trim().is_empty()
            || symptoms.trim().is_empty()
            || date.trim().is_empty()
            || time.trim().is_empty()
        {
            return Err(LedgerError::Validation(
                "all fields are required for booking an appointment".to_string(),
            ));
        }
        if !AGE_RANGE.contains(&age) {
            return Err(LedgerError::Validation(
                "please enter a valid age".to_string(),
            ));
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            patient_name: patient_name.to_string(),
            age,
            symptoms: symptoms.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            status: AppointmentStatus::Scheduled,
            created_at: now,
            created_date: schema::display_date(now),
            created_time: schema::display_time(now),
            updated_at: None,
        };

        let mut appointments = self.list()?;
        appointments.insert(0, appointment.clone());
        self.store.set(APPOINTMENTS_KEY, &appointments)?;
        tracing::info!(id = %appointment.id, date, "appointment booked");
        Ok(appointment)
    }

    /// Set the status of the appointment with `id` and stamp `updated_at`.
    pub fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, LedgerError> {
        let mut appointments = self.list()?;
        let appointment = appointments
            .iter_mut()
            .find(|appointment| appointment.id == id)
            .ok_or(LedgerError::NotFound)?;

        appointment.status = status;
        appointment.updated_at = Some(Utc::now());
        let updated = appointment.clone();
        self.store.set(APPOINTMENTS_KEY, &appointments)?;
        tracing::info!(id, status = status.label(), "appointment status updated");
        Ok(updated)
    }

    /// Cancel the appointment with `id`.  Cancelling an already-cancelled
    /// appointment is allowed and leaves it cancelled.
    pub fn cancel(&self, id: &str) -> Result<Appointment, LedgerError> {
        self.set_status(id, AppointmentStatus::Cancelled)
    }

    /// Remove the appointment with `id`.  Absent id is a no-op.
    pub fn delete(&self, id: &str) -> Result<(), LedgerError> {
        let mut appointments = self.list()?;
        appointments.retain(|appointment| appointment.id != id);
        self.store.set(APPOINTMENTS_KEY, &appointments)?;
        Ok(())
    }

    /// Still-scheduled appointments dated today or later, ascending by date.
    ///
    /// Dates are `YYYY-MM-DD` strings, so lexicographic comparison is
    /// chronological.
    pub fn upcoming(&self) -> Result<Vec<Appointment>, LedgerError> {
        let today = schema::today_iso();
        let mut upcoming: Vec<Appointment> = self
            .list()?
            .into_iter()
            .filter(|appointment| {
                appointment.status == AppointmentStatus::Scheduled
                    && appointment.date.as_str() >= today.as_str()
            })
            .collect();
        upcoming.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(upcoming)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
