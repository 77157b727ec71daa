pub mod brand;
pub mod request;
pub mod upload;

pub use brand::{Brand, BrandCategory, BrandColors, Link};
pub use request::{CategoryCopy, GenerateRequest};
pub use upload::UploadedFile;
