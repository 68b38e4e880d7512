pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{
    clean_filename, format_time_elapsed, safe_tail_chars, safe_truncate_chars, truncate_text,
};
pub use url_utils::{is_valid_url, matches_any_site, registrable_host, resolve_href};
