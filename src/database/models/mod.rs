pub mod customer;
pub mod request;
pub mod user;

pub use customer::{Customer, CustomerDetail, NewCustomer};
pub use request::{ModificationRequest, NewRequest, RequestStatus, TerminalStatus};
pub use user::User;
