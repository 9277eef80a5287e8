use crate::errors::StorageError;
use crate::storage::models::{Acl, BucketInfo, ObjectSummary, PutObjectRequest};
use mockall::automock;

/// Interface to the object-storage client, so the facade can be tested
/// against a mock instead of a live service.
///
/// Every call is a single blocking request. Implementations report the
/// backend's own error text through `StorageError::Service`.
#[automock]
pub trait ObjectStore {
    fn put_object(&self, request: &PutObjectRequest) -> Result<(), StorageError>;

    /// Lightweight bucket probe; any error means the bucket is unusable
    fn head_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    /// `Ok(false)` when the object is absent, `Err` for every other failure
    fn object_exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError>;

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;

    /// A single page of objects whose key starts with `prefix`
    fn list_objects(&self, bucket: &str, prefix: &str)
    -> Result<Vec<ObjectSummary>, StorageError>;

    fn create_bucket(&self, bucket: &str, acl: Acl) -> Result<(), StorageError>;

    fn list_buckets(&self) -> Result<Vec<BucketInfo>, StorageError>;
}
