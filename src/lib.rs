pub mod config;
pub mod content;
pub mod content_index;
pub mod feed;
pub mod logger;
pub mod pick;
pub mod post_list;
pub mod text_utils;
pub mod view;
#[cfg(test)]
mod test_data;
