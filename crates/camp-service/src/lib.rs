mod http;
mod memory;
mod traits;

pub use http::HttpService;
pub use memory::MemoryService;
pub use traits::{ProjectService, ServiceError};
