pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{parse_target_url, resolve_href};
