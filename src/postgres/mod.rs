//! PostgreSQL destination: truncate-and-replace loads and SQL scripts
//!
//! Loads go through [`TableSync`], which creates or truncates the destination
//! table and streams rows with `COPY ... FROM STDIN` in CSV framing.

mod catalog;
mod client;
mod copy;
mod ddl;
mod errors;
mod identifier;
mod script;
mod sync;

pub use catalog::ExistingColumn;
pub use identifier::TableIdentifier;
pub use script::{execute_script, render_script};
pub use sync::{LoadMode, SyncReport, TableLoader, TableSync};
