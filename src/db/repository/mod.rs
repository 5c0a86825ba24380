pub mod doctor;
pub mod patient;
