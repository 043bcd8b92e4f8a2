pub mod app;
pub mod config;
pub mod content;
pub mod logger;
pub mod navigation;
pub mod post;
pub mod share;
pub mod source;
pub mod text_utils;
pub mod util;
pub mod view;
mod test_data;
