pub mod backend;
pub mod client;
pub mod facade;
pub mod models;

// Re-export types for convenient access from other modules
pub use backend::{MockObjectStore, ObjectStore};
pub use client::AwsS3Backend;
pub use facade::{DIRECTORY_DELETED_MESSAGE, FILE_DELETED_MESSAGE, StorageFacade};
pub use models::{Acl, BucketInfo, BucketListing, ObjectSummary, OperationResult, PutObjectRequest};
