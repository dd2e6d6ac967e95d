pub mod checkin;
pub mod detention;
pub mod document;
pub mod money;
pub mod reimbursement;
pub mod trip;
pub mod zone;
