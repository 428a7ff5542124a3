pub use super::complaints::Entity as Complaints;
pub use super::users::Entity as Users;
