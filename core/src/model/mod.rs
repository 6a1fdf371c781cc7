pub mod bunk;
pub mod ledger;
pub mod subject;
