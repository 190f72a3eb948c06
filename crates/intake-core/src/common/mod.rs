pub mod app_id;
pub mod error;
pub mod types;
pub mod validate;

pub use app_id::*;
pub use error::*;
pub use types::*;
pub use validate::*;
