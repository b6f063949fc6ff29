//! Business logic services.

pub mod contact;
pub mod mapping;
pub mod session;
pub mod upload;

pub use contact::ContactProxy;
pub use upload::{UploadService, UploadedPart};
