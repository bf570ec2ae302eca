pub mod audit;
pub mod request;
pub mod response;
pub mod titan;

pub use audit::*;
pub use request::*;
pub use response::*;
pub use titan::*;
