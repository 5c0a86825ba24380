pub mod appointments;
pub mod doctors;
pub mod health;
pub mod patients;
pub mod prescriptions;
