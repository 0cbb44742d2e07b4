mod request;
mod user;

pub use request::{CreateRequestArgs, RequestCommands};
pub use user::UserCommands;
