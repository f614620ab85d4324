mod admin;
mod delete;
mod get;
mod update;

pub use admin::*;
pub use delete::*;
pub use get::*;
pub use update::*;
