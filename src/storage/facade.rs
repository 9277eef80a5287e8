use crate::config::Config;
use crate::errors::{ConfigError, StorageError};
use crate::storage::backend::ObjectStore;
use crate::storage::client::AwsS3Backend;
use crate::storage::models::{Acl, BucketListing, OperationResult, PutObjectRequest};
use crate::utils::log_utils::Logger;
use once_cell::sync::OnceCell;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::path::Path;

pub const FILE_DELETED_MESSAGE: &str = "File has been deleted from AWS S3 successfully";
pub const DIRECTORY_DELETED_MESSAGE: &str = "Directory has been deleted from AWS S3 successfully";

/// Characters left as-is in object URLs; `/` keeps the key's path structure
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

static GLOBAL: OnceCell<StorageFacade<AwsS3Backend>> = OnceCell::new();

/// Bucket and object operations over an `ObjectStore`.
///
/// Every operation reports its outcome as an `OperationResult`; backend
/// errors are never returned as `Err` and never panic.
pub struct StorageFacade<S: ObjectStore = AwsS3Backend> {
    store: S,
    region: String,
    logger: Logger,
}

impl StorageFacade<AwsS3Backend> {
    /// Build a facade over a fresh AWS SDK client.
    pub fn connect(config: &Config, verbose: u8) -> Result<Self, ConfigError> {
        let store = AwsS3Backend::new(config, verbose)?;
        Ok(Self::new(store, &config.region, verbose))
    }

    /// Process-wide facade, built on first use.
    ///
    /// Concurrent first calls construct the client once; later calls return
    /// the same instance and ignore their `config`.
    pub fn global(config: &Config, verbose: u8) -> Result<&'static Self, ConfigError> {
        GLOBAL.get_or_try_init(|| Self::connect(config, verbose))
    }
}

impl<S: ObjectStore> StorageFacade<S> {
    pub fn new(store: S, region: impl Into<String>, verbose: u8) -> Self {
        Self {
            store,
            region: region.into(),
            logger: Logger::new(verbose),
        }
    }

    /// The underlying storage client
    pub fn client(&self) -> &S {
        &self.store
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Content type for a file name; see [`crate::mime::mime_type_of`]
    pub fn mime_type_of(filename: &str) -> &'static str {
        crate::mime::mime_type_of(filename)
    }

    /// Public base URL of a bucket. No network call is made.
    pub fn base_url(&self, bucket: &str) -> String {
        format!("https://{}.s3.{}.amazonaws.com/", bucket, self.region)
    }

    /// Public URL of one object, with the key percent-encoded
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}{}",
            self.base_url(bucket),
            utf8_percent_encode(key, KEY_ENCODE_SET)
        )
    }

    /// Upload a local file to `bucket/key`.
    ///
    /// An empty `content_type` sends no content type at all. On success the
    /// payload is the object's public URL.
    pub fn upload<P: AsRef<Path>>(
        &self,
        bucket: &str,
        key: &str,
        source_path: P,
        content_type: &str,
        is_public: bool,
    ) -> OperationResult<String> {
        let source_path = source_path.as_ref();
        if !source_path.is_file() {
            return Err::<String, _>(StorageError::LocalFile {
                path: source_path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a readable file"),
            })
            .into();
        }

        let content_type = content_type.trim();
        let request = PutObjectRequest {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source_path: source_path.to_path_buf(),
            acl: Acl::from_public(is_public),
            content_type: (!content_type.is_empty()).then(|| content_type.to_string()),
        };

        self.logger.debug(&format!(
            "Uploading {} to {}/{}",
            source_path.display(),
            bucket,
            key
        ));

        self.store
            .put_object(&request)
            .map(|_| self.object_url(bucket, key))
            .into()
    }

    /// Existence probe for a bucket
    pub fn probe_bucket(&self, bucket: &str) -> OperationResult<bool> {
        self.store.head_bucket(bucket).map(|_| true).into()
    }

    /// True if the bucket exists and is reachable. Failures count as absence.
    pub fn bucket_exists(&self, bucket: &str) -> bool {
        let probe = self.probe_bucket(bucket);
        if !probe.is_success() {
            self.logger.info(&format!(
                "Bucket '{}' is not reachable: {}",
                bucket,
                probe.message()
            ));
        }
        probe.payload().copied().unwrap_or(false)
    }

    /// Existence probe for an object
    pub fn probe_object(&self, bucket: &str, key: &str) -> OperationResult<bool> {
        self.store.object_exists(bucket, key).into()
    }

    /// True if the object exists. Failures count as absence.
    pub fn object_exists(&self, bucket: &str, key: &str) -> bool {
        let probe = self.probe_object(bucket, key);
        if !probe.is_success() {
            self.logger.info(&format!(
                "Object '{}/{}' could not be checked: {}",
                bucket,
                key,
                probe.message()
            ));
        }
        probe.payload().copied().unwrap_or(false)
    }

    /// Delete one object if present.
    ///
    /// An absent object is reported the same way as a deleted one.
    pub fn delete(&self, bucket: &str, key: &str) -> OperationResult<()> {
        let probe = self.probe_object(bucket, key);
        let exists = match probe.into_result() {
            Ok(exists) => exists,
            Err(message) => return OperationResult::failed(message),
        };

        if exists {
            if let Err(e) = self.store.delete_object(bucket, key) {
                return OperationResult::failed(e.to_string());
            }
        } else {
            self.logger
                .debug(&format!("Object '{}/{}' was already absent", bucket, key));
        }

        OperationResult::ok_with_message((), FILE_DELETED_MESSAGE)
    }

    /// Delete every object listed under `prefix`, one at a time.
    ///
    /// Only the first listing page is considered. The first failed delete
    /// stops the loop; objects deleted before it stay deleted.
    pub fn delete_directory(&self, bucket: &str, prefix: &str) -> OperationResult<()> {
        let objects = match self.store.list_objects(bucket, prefix) {
            Ok(objects) => objects,
            Err(e) => return OperationResult::failed(e.to_string()),
        };

        for object in &objects {
            self.logger
                .debug(&format!("Deleting {}/{}", bucket, object.key));
            if let Err(e) = self.store.delete_object(bucket, &object.key) {
                return OperationResult::failed(e.to_string());
            }
        }

        self.logger.info(&format!(
            "Deleted {} objects under '{}' in bucket '{}'",
            objects.len(),
            prefix,
            bucket
        ));
        OperationResult::ok_with_message((), DIRECTORY_DELETED_MESSAGE)
    }

    /// Create a bucket unless one with the lower-cased name already exists
    pub fn create_bucket(&self, name: &str, is_public: bool) -> OperationResult<()> {
        let name = name.to_lowercase();

        if self.bucket_exists(&name) {
            return OperationResult::ok_with_message(
                (),
                format!("Bucket '{}' already exists", name),
            );
        }

        match self.store.create_bucket(&name, Acl::from_public(is_public)) {
            Ok(()) => OperationResult::ok_with_message((), format!("Bucket '{}' created", name)),
            Err(e) => OperationResult::failed(e.to_string()),
        }
    }

    /// Every bucket visible to the configured credentials
    pub fn list_buckets(&self, names_only: bool) -> OperationResult<BucketListing> {
        self.store
            .list_buckets()
            .map(|buckets| {
                if names_only {
                    BucketListing::Names(buckets.into_iter().map(|b| b.name).collect())
                } else {
                    BucketListing::Details(buckets)
                }
            })
            .into()
    }

    /// Lower-cased file names under `prefix` (first listing page only).
    ///
    /// Only the part after the final `/` is kept; the full key is
    /// `prefix + "/" + name` for keys one level below the prefix.
    pub fn list_objects(&self, bucket: &str, prefix: &str) -> OperationResult<Vec<String>> {
        self.store
            .list_objects(bucket, prefix)
            .map(|objects| objects.iter().map(|o| o.file_name()).collect())
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::MockObjectStore;
    use crate::storage::models::{BucketInfo, ObjectSummary};

    fn facade(store: MockObjectStore) -> StorageFacade<MockObjectStore> {
        StorageFacade::new(store, "us-east-1", 0)
    }

    #[test]
    fn base_url_uses_virtual_host_form() {
        let f = facade(MockObjectStore::new());
        assert_eq!(
            f.base_url("my-bucket"),
            "https://my-bucket.s3.us-east-1.amazonaws.com/"
        );
    }

    #[test]
    fn object_url_encodes_key_but_keeps_slashes() {
        let f = facade(MockObjectStore::new());
        assert_eq!(
            f.object_url("b", "my dir/Ünïcode file.txt"),
            "https://b.s3.us-east-1.amazonaws.com/my%20dir/%C3%9Cn%C3%AFcode%20file.txt"
        );
    }

    #[test]
    fn upload_of_missing_file_fails_without_backend_call() {
        let mut store = MockObjectStore::new();
        store.expect_put_object().never();
        let result = facade(store).upload("b", "k", "/definitely/not/here.txt", "text/plain", true);
        assert!(!result.is_success());
        assert!(result.message().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn upload_reports_backend_error_verbatim() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .times(1)
            .returning(|_| {
                Err(StorageError::service(
                    "NoSuchBucket: The specified bucket does not exist",
                ))
            });

        let result = facade(store).upload("b", "k", file.path(), "", false);
        assert!(!result.is_success());
        assert_eq!(
            result.message(),
            "NoSuchBucket: The specified bucket does not exist"
        );
    }

    #[test]
    fn upload_private_uses_authenticated_read() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .withf(|req| {
                req.acl == Acl::AuthenticatedRead
                    && req.content_type.as_deref() == Some("image/png")
            })
            .times(1)
            .returning(|_| Ok(()));

        let result = facade(store).upload("b", "dir/a.png", file.path(), "image/png", false);
        assert_eq!(
            result.payload().map(String::as_str),
            Some("https://b.s3.us-east-1.amazonaws.com/dir/a.png")
        );
    }

    #[test]
    fn bucket_exists_is_false_on_backend_error() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_bucket()
            .withf(|bucket| bucket == "locked")
            .returning(|_| Err(StorageError::service("Forbidden")));
        let f = facade(store);
        assert!(!f.bucket_exists("locked"));
        assert_eq!(f.probe_bucket("locked").message(), "Forbidden");
    }

    #[test]
    fn object_exists_swallows_errors() {
        let mut store = MockObjectStore::new();
        store
            .expect_object_exists()
            .returning(|_, _| Err(StorageError::service("AccessDenied")));
        assert!(!facade(store).object_exists("b", "k"));
    }

    #[test]
    fn delete_fails_when_probe_fails() {
        let mut store = MockObjectStore::new();
        store
            .expect_object_exists()
            .returning(|_, _| Err(StorageError::service("AccessDenied: Access Denied")));
        store.expect_delete_object().never();

        let result = facade(store).delete("b", "k");
        assert!(!result.is_success());
        assert_eq!(result.message(), "AccessDenied: Access Denied");
    }

    #[test]
    fn delete_existing_object_calls_backend() {
        let mut store = MockObjectStore::new();
        store.expect_object_exists().returning(|_, _| Ok(true));
        store
            .expect_delete_object()
            .withf(|bucket, key| bucket == "b" && key == "dir/a.txt")
            .times(1)
            .returning(|_, _| Ok(()));

        let result = facade(store).delete("b", "dir/a.txt");
        assert!(result.is_success());
        assert_eq!(result.message(), FILE_DELETED_MESSAGE);
    }

    #[test]
    fn create_bucket_lowercases_and_reports_failure() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_bucket()
            .withf(|bucket| bucket == "mixedcase")
            .returning(|_| Err(StorageError::service("NotFound")));
        store
            .expect_create_bucket()
            .withf(|bucket, acl| bucket == "mixedcase" && *acl == Acl::PublicRead)
            .times(1)
            .returning(|_, _| {
                Err(StorageError::service(
                    "InvalidBucketName: The specified bucket is not valid.",
                ))
            });

        let result = facade(store).create_bucket("MixedCase", true);
        assert!(!result.is_success());
        assert_eq!(
            result.message(),
            "InvalidBucketName: The specified bucket is not valid."
        );
    }

    #[test]
    fn list_buckets_names_or_details() {
        let mut store = MockObjectStore::new();
        store.expect_list_buckets().times(2).returning(|| {
            Ok(vec![
                BucketInfo { name: "alpha".to_string(), creation_date: None },
                BucketInfo { name: "beta".to_string(), creation_date: None },
            ])
        });
        let f = facade(store);

        let names = f.list_buckets(true).into_payload().unwrap();
        assert_eq!(names, BucketListing::Names(vec!["alpha".to_string(), "beta".to_string()]));

        match f.list_buckets(false).into_payload().unwrap() {
            BucketListing::Details(infos) => assert_eq!(infos[1].name, "beta"),
            other => panic!("expected details, got {:?}", other),
        }
    }

    #[test]
    fn delete_directory_with_listing_error_deletes_nothing() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Err(StorageError::service("NoSuchBucket")));
        store.expect_delete_object().never();

        let result = facade(store).delete_directory("gone", "dir");
        assert_eq!(result.message(), "NoSuchBucket");
    }

    #[test]
    fn delete_directory_with_no_matches_succeeds() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().returning(|_, _| Ok(Vec::new()));
        store.expect_delete_object().never();

        let result = facade(store).delete_directory("b", "empty");
        assert!(result.is_success());
        assert_eq!(result.message(), DIRECTORY_DELETED_MESSAGE);
    }

    #[test]
    fn list_objects_keeps_nested_basename_only() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Ok(vec![ObjectSummary::new("dir/sub/Deep.TXT")]));
        let names = facade(store).list_objects("b", "dir").into_payload().unwrap();
        assert_eq!(names, vec!["deep.txt".to_string()]);
    }
}
