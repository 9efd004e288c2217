pub mod classes;
pub mod health;
pub mod notifications;
pub mod requests;
pub mod students;
pub mod subjects;
pub mod subscriptions;
pub mod teachers;
pub mod users;
