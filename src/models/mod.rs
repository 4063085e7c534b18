pub mod model;
pub mod registry;
pub mod user;

pub use model::*;
pub use registry::*;
pub use user::*;
