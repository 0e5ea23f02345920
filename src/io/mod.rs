pub mod csv_export;
pub mod store;

pub use csv_export::export_csv;
pub use store::SessionStore;
