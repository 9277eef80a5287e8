use crate::config::Config;
use crate::errors::{ConfigError, StorageError};
use crate::storage::backend::ObjectStore;
use crate::storage::models::{Acl, BucketInfo, ObjectSummary, PutObjectRequest};
use aws_config::retry::RetryConfig;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration, ObjectCannedAcl,
    StorageClass,
};

/// Region that rejects an explicit location constraint on bucket creation
const DEFAULT_AWS_REGION: &str = "us-east-1";

/// `ObjectStore` backed by the AWS SDK.
///
/// The SDK is async; this type owns a tokio runtime and blocks on it for
/// every call, so it must not be used from inside another runtime.
pub struct AwsS3Backend {
    client: Client,
    runtime: tokio::runtime::Runtime,
    region: String,
    verbose: u8,
}

impl AwsS3Backend {
    /// Build the SDK client from static credentials.
    pub fn new(config: &Config, verbose: u8) -> Result<Self, ConfigError> {
        // Runtime for async operations, reused for all requests
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| ConfigError::Runtime(format!("Failed to create runtime: {}", e)))?;

        if verbose >= 2 {
            crate::utils::log_utils::debug(
                &format!("Creating S3 client with settings: {:?}", config),
                verbose,
            );
        }

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None, // No session token
            None, // No expiry
            "ConfigFileStaticCredentials",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::standard().with_max_attempts(3))
            .behavior_version(BehaviorVersion::latest());

        if let Some(endpoint) = &config.endpoint_url {
            // S3-compatible services rarely support virtual-hosted addressing
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            runtime,
            region: config.region.clone(),
            verbose,
        })
    }

    /// The underlying SDK client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn location_constraint(&self) -> Option<CreateBucketConfiguration> {
        if self.region == DEFAULT_AWS_REGION {
            return None;
        }
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build(),
        )
    }

    fn service_error<E>(&self, action: &str, err: SdkError<E, HttpResponse>) -> StorageError
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        crate::utils::log_utils::debug(
            &format!("{} failed: {}", action, DisplayErrorContext(&err)),
            self.verbose,
        );
        StorageError::Service(describe_sdk_error(&err))
    }
}

/// Error text as the service reported it.
///
/// `Code: message` when the response carried error metadata, the HTTP status
/// when it did not (HEAD responses have no body), and the full error chain
/// only when no response arrived at all.
pub fn describe_sdk_error<E>(err: &SdkError<E, HttpResponse>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (Some(code), None) => code.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) => match err.raw_response() {
            Some(response) => status_text(response.status().as_u16()),
            None => DisplayErrorContext(err).to_string(),
        },
    }
}

fn status_text(status: u16) -> String {
    let reason = match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        412 => "Precondition Failed",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        503 => "Service Unavailable",
        _ => return format!("HTTP status {}", status),
    };
    format!("{} {}", status, reason)
}

/// A 4xx answer to HEAD object means the caller cannot see the key: either it
/// is missing, or listing is not permitted and S3 hides the 404 behind a 403.
fn is_client_error<E>(err: &SdkError<E, HttpResponse>) -> bool {
    err.raw_response()
        .map(|response| response.status().is_client_error())
        .unwrap_or(false)
}

fn canned_object_acl(acl: Acl) -> ObjectCannedAcl {
    match acl {
        Acl::PublicRead => ObjectCannedAcl::PublicRead,
        Acl::AuthenticatedRead => ObjectCannedAcl::AuthenticatedRead,
    }
}

fn canned_bucket_acl(acl: Acl) -> BucketCannedAcl {
    match acl {
        Acl::PublicRead => BucketCannedAcl::PublicRead,
        Acl::AuthenticatedRead => BucketCannedAcl::AuthenticatedRead,
    }
}

fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

impl ObjectStore for AwsS3Backend {
    fn put_object(&self, request: &PutObjectRequest) -> Result<(), StorageError> {
        self.runtime.block_on(async {
            // Stream the file from disk rather than loading it into memory
            let body = ByteStream::from_path(&request.source_path)
                .await
                .map_err(|e| StorageError::LocalFile {
                    path: request.source_path.clone(),
                    source: std::io::Error::other(e),
                })?;

            crate::utils::log_utils::debug(
                &format!(
                    "PutObject bucket={} key={} acl={} content_type={:?}",
                    request.bucket,
                    request.key,
                    request.acl.as_str(),
                    request.content_type
                ),
                self.verbose,
            );

            self.client
                .put_object()
                .bucket(&request.bucket)
                .key(&request.key)
                .body(body)
                .acl(canned_object_acl(request.acl))
                .storage_class(StorageClass::ReducedRedundancy)
                .set_content_type(request.content_type.clone())
                .send()
                .await
                .map_err(|e| self.service_error("PutObject", e))?;

            Ok::<(), StorageError>(())
        })
    }

    fn head_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.runtime.block_on(async {
            self.client
                .head_bucket()
                .bucket(bucket)
                .send()
                .await
                .map_err(|e| self.service_error("HeadBucket", e))?;
            Ok::<(), StorageError>(())
        })
    }

    fn object_exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        self.runtime.block_on(async {
            match self.client.head_object().bucket(bucket).key(key).send().await {
                Ok(_) => Ok(true),
                Err(e) if is_client_error(&e) => {
                    crate::utils::log_utils::debug(
                        &format!(
                            "HeadObject {}/{} treated as absent: {}",
                            bucket,
                            key,
                            describe_sdk_error(&e)
                        ),
                        self.verbose,
                    );
                    Ok(false)
                }
                Err(e) => Err(self.service_error("HeadObject", e)),
            }
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.runtime.block_on(async {
            crate::utils::log_utils::debug(
                &format!("DeleteObject bucket={} key={}", bucket, key),
                self.verbose,
            );
            self.client
                .delete_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| self.service_error("DeleteObject", e))?;
            Ok::<(), StorageError>(())
        })
    }

    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectSummary>, StorageError> {
        self.runtime.block_on(async {
            let response = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .send()
                .await
                .map_err(|e| self.service_error("ListObjectsV2", e))?;

            if response.is_truncated().unwrap_or(false) {
                crate::utils::log_utils::info(
                    &format!(
                        "Listing of '{}' in bucket '{}' was truncated after {} keys",
                        prefix,
                        bucket,
                        response.contents().len()
                    ),
                    self.verbose,
                );
            }

            let objects = response
                .contents()
                .iter()
                .filter_map(|object| {
                    object.key().map(|key| ObjectSummary {
                        key: key.to_string(),
                        size: object.size(),
                    })
                })
                .collect();
            Ok::<Vec<ObjectSummary>, StorageError>(objects)
        })
    }

    fn create_bucket(&self, bucket: &str, acl: Acl) -> Result<(), StorageError> {
        self.runtime.block_on(async {
            crate::utils::log_utils::debug(
                &format!(
                    "CreateBucket bucket={} acl={} region={}",
                    bucket,
                    acl.as_str(),
                    self.region
                ),
                self.verbose,
            );
            self.client
                .create_bucket()
                .bucket(bucket)
                .acl(canned_bucket_acl(acl))
                .set_create_bucket_configuration(self.location_constraint())
                .send()
                .await
                .map_err(|e| self.service_error("CreateBucket", e))?;
            Ok::<(), StorageError>(())
        })
    }

    fn list_buckets(&self) -> Result<Vec<BucketInfo>, StorageError> {
        self.runtime.block_on(async {
            let response = self
                .client
                .list_buckets()
                .send()
                .await
                .map_err(|e| self.service_error("ListBuckets", e))?;

            let buckets = response
                .buckets()
                .iter()
                .filter_map(|bucket| {
                    bucket.name().map(|name| BucketInfo {
                        name: name.to_string(),
                        creation_date: bucket.creation_date().and_then(to_chrono),
                    })
                })
                .collect();
            Ok::<Vec<BucketInfo>, StorageError>(buckets)
        })
    }
}
