pub mod checkin;
pub mod clock;
pub mod detention;
pub mod documents;
pub mod reimbursement;
pub mod storage;
pub mod timezone;
pub mod trips;
