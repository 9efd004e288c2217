mod handler;
pub mod model;

pub use handler::{
    cancel_subscription, create_subscription, get_subscription, list_plans, list_subscriptions,
};
