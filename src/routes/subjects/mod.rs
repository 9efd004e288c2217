mod handler;
pub mod model;

pub use handler::{create_subject, delete_subject, get_subject, list_subjects, update_subject};
