mod handler;
pub mod model;

pub use handler::{delete_user, get_user, list_users, register, update_user, upload_photo};
