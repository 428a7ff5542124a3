pub mod auth;
pub mod complaints;
pub mod health;
pub mod user_complaints;
pub mod users;
