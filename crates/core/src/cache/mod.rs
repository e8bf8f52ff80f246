mod error;
mod keys;
mod patterns;
pub mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    group_info_key, group_member_list_key, group_session_list_key, group_session_list_pattern,
    joined_group_list_key, joined_group_list_pattern, my_group_list_key,
};
pub use patterns::pattern_matches;
pub use traits::Cache;
