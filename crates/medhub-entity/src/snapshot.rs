//! Point-in-time snapshot of the records relevant to one subject.

use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;
use crate::payment::Payment;
use crate::registration::DoctorRegistration;
use crate::ticket::SupportTicket;

/// Records fetched for one subject, pre-filtered to what the subject may see.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainRecords {
    /// Appointments.
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    /// Platform payments.
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Support tickets.
    #[serde(default)]
    pub tickets: Vec<SupportTicket>,
    /// Doctor registrations.
    #[serde(default)]
    pub registrations: Vec<DoctorRegistration>,
}

impl DomainRecords {
    /// Whether the snapshot holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
            && self.payments.is_empty()
            && self.tickets.is_empty()
            && self.registrations.is_empty()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.appointments.len() + self.payments.len() + self.tickets.len() + self.registrations.len()
    }
}
