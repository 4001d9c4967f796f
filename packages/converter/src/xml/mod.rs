//! XML utilities.

pub mod eforms;
mod utils;

pub use utils::{
    attribute_eq, find_all_by_path, find_by_path, find_child, find_children,
    get_tag_name, get_text, has_tag, text_at,
};
