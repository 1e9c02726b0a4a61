mod request;
mod response;
mod token;

pub use self::request::*;
pub use self::response::*;
pub use self::token::*;
