pub mod account;
pub mod allowance;
pub mod limits;
pub mod pot;
pub mod uk;
pub mod usage;

// Flat public surface for the command layer.
pub use account::{AccountType, Client};
pub use allowance::{account_allowance, resolve_client_allowances, AccountAllowance};
pub use limits::{CapTable, LimitRecord, LimitTable};
pub use uk::TaxYear;
