pub mod doctor;
pub mod patient;

pub use doctor::{Appointment, AppointmentStatus, DateEntry, Doctor};
pub use patient::{HistoryDocument, Patient};
