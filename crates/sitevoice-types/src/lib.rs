pub mod action;
pub mod document;
pub mod outcome;
pub mod plan;
pub mod request;

pub use action::*;
pub use document::*;
pub use outcome::*;
pub use plan::*;
pub use request::*;
