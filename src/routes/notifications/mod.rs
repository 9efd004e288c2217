mod handler;
pub mod model;

pub use handler::{
    create_notification, delete_notification, delete_read_notifications, list_user_notifications,
    mark_all_read, mark_notification_read,
};
