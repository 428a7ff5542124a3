pub mod prelude;

pub mod complaints;
pub mod users;
