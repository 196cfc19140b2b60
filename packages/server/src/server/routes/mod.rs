// HTTP routes
pub mod form;
pub mod health;
pub mod invoices;

pub use form::*;
pub use health::*;
pub use invoices::*;
