pub mod transaction;
pub mod flip;
pub mod profile;

pub use transaction::{parse_price, parse_sale_date, RawTransaction, Transaction, TransactionSet};
pub use flip::Flip;
pub use profile::{BusinessType, ContactProfile, InvestorProfile, LoanNeed};
