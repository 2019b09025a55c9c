//! HTTP request handlers for the meuParlamento API.

pub mod devices;
pub mod envelope;
pub mod health;
pub mod metrics;
pub mod news;
pub mod proposals;

pub use devices::register_device;
pub use health::{health_check, index};
pub use metrics::metrics_handler;
pub use news::{news_for_date, news_for_proposal};
pub use proposals::{authors, recent_batch, sampling_batch};
