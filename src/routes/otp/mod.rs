mod email;
mod mobile;

pub use email::*;
pub use mobile::*;
