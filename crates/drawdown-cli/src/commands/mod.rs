pub mod comment;
pub mod countries;
pub mod dispatch;
pub mod edit;
pub mod history;
pub mod permissions;
pub mod request;
pub mod schema;
pub mod shared;
pub mod transition;
pub mod user;
