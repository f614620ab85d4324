mod register;
mod signin;
mod signout;

pub use register::*;
pub use signin::*;
pub use signout::*;
