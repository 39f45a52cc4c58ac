pub mod admin;

pub use admin::routes::{admin_v1_routes, legacy_routes};
