pub mod pages;

pub use pages::{detect_page, home_page, HomeTemplate};
