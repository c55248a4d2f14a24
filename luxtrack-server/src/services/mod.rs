mod collection_service;
mod device_source;
mod query_service;
mod scheduler;
mod statistics_service;

#[cfg(test)]
pub(crate) mod fakes;

pub use collection_service::*;
pub use device_source::*;
pub use query_service::{DEFAULT_PAGE_SIZE, DEFAULT_RECENT_LIMIT, DEFAULT_WINDOW, MAX_PAGE_SIZE, QueryService};
pub use scheduler::*;
pub use statistics_service::*;
