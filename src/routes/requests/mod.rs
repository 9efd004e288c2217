mod handler;
pub mod model;

pub use handler::{
    create_request, delete_request, get_request, list_requests, update_request_status,
};
