mod money;
mod transaction;
mod user;

pub use money::*;
pub use transaction::*;
pub use user::*;
