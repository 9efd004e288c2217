mod handler;
pub mod model;

pub use handler::{create_class, delete_class, get_class, list_classes, update_class};
