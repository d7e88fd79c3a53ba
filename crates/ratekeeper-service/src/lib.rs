//! Rate resolution: registry lookup, snapshot cache, extraction on miss,
//! best-effort write-back.

mod cache;
mod config;
mod electric;
mod error;
mod flight;
mod water;

pub use config::{PDF_PATH_ENV_SUFFIX, ServiceConfig};
pub use electric::RateService;
pub use error::{ErrorClass, RatesError};
pub use water::{WATER_KEY_PREFIX, WaterRateService};
