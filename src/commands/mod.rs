pub mod convert;
pub mod list;

pub use convert::{ConvertCommandArgs, execute_convert};
pub use list::execute_list;
