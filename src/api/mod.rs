pub mod error;
pub mod form;
pub mod handlers;
pub mod identity;
pub mod middleware;
