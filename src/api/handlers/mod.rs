//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod records;
pub mod redirect;
pub mod shorten;

pub use health::health_handler;
pub use records::{
    delete_record_handler, get_record_handler, record_stats_handler, update_record_handler,
};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
