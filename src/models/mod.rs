pub mod postman;
pub mod request;

pub use postman::{Collection, EnvironmentDocument, EnvironmentEntry, Folder, RawRequest};
pub use request::{Auth, AuthKind, Body, Capture, Checks, RequestModel};
