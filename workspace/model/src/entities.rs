//! SeaORM entity modules for the Conduit store.
//! Users author articles; tags are keyed by their natural string id.

pub mod article;
pub mod tag;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::article::Entity as Article;
    pub use super::tag::Entity as Tag;
    pub use super::user::Entity as User;
}
