mod handler;
pub mod model;

pub use handler::{delete_student, get_student, list_students, update_student};
