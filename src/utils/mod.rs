pub mod paths;

pub use paths::{format_path_with_tilde, validate_file_name_component, validate_file_size};
