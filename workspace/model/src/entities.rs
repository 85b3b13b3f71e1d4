//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the store-rating platform here: users
//! (with their role), stores, and the ratings linking the two.

pub mod rating;
pub mod store;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::rating::Entity as Rating;
    pub use super::store::Entity as Store;
    pub use super::user::Entity as User;
}
