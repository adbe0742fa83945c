pub mod cache_directive;
pub mod config;
pub mod date;
pub mod defs;
pub mod error;
pub mod header;
pub mod logger;

pub use config::Config;
pub use error::{HttpDefsError, Result};

pub mod prelude {
    pub use crate::cache_directive::{CacheControl, CacheDirective, CacheDirectiveKind};
    pub use crate::date::{DateFormat, HttpDate};
    pub use crate::defs::{Method, StatusCode, Version};
    pub use crate::error::{HttpDefsError, Result};
}
