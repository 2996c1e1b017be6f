pub mod collection;
pub mod environment;

pub use collection::load_collection;
pub use environment::load_environment;
