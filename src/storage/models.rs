use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Canned access policy applied to uploaded objects and created buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acl {
    PublicRead,
    AuthenticatedRead,
}

impl Acl {
    pub fn from_public(is_public: bool) -> Self {
        if is_public {
            Acl::PublicRead
        } else {
            Acl::AuthenticatedRead
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Acl::PublicRead => "public-read",
            Acl::AuthenticatedRead => "authenticated-read",
        }
    }
}

/// Everything the backend needs to store one object from a local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub source_path: PathBuf,
    pub acl: Acl,
    /// `None` leaves content-type negotiation to the client
    pub content_type: Option<String>,
}

/// One entry of an object listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: Option<i64>,
}

impl ObjectSummary {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
        }
    }

    /// Text after the final `/`, lower-cased
    pub fn file_name(&self) -> String {
        self.key
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// Bucket metadata as returned by list-buckets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketInfo {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
}

/// Bucket listing, either bare names or full records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketListing {
    Names(Vec<String>),
    Details(Vec<BucketInfo>),
}

impl BucketListing {
    pub fn len(&self) -> usize {
        match self {
            BucketListing::Names(names) => names.len(),
            BucketListing::Details(infos) => infos.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Uniform outcome of a facade operation.
///
/// A failed result always carries a non-empty message. A successful result
/// carries the operation's payload, plus a confirmation message for the
/// operations that report one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult<T = ()> {
    success: bool,
    message: String,
    payload: Option<T>,
}

impl<T> OperationResult<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            payload: Some(payload),
        }
    }

    pub fn ok_with_message(payload: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(payload),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "Unknown storage error".to_string();
        }
        Self {
            success: false,
            message,
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    /// Convert into a `Result`, using the message as the error text
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.payload) {
            (true, Some(payload)) => Ok(payload),
            (true, None) => Err("Operation succeeded without a payload".to_string()),
            (false, _) => Err(self.message),
        }
    }
}

impl<T> From<Result<T, crate::errors::StorageError>> for OperationResult<T> {
    fn from(result: Result<T, crate::errors::StorageError>) -> Self {
        match result {
            Ok(payload) => OperationResult::ok(payload),
            Err(e) => OperationResult::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StorageError;

    #[test]
    fn failed_never_has_empty_message() {
        let result: OperationResult<()> = OperationResult::failed("   ");
        assert!(!result.is_success());
        assert!(!result.message().is_empty());
        assert!(result.payload().is_none());
    }

    #[test]
    fn storage_error_text_is_kept_verbatim() {
        let result: OperationResult<String> =
            Err(StorageError::service("AccessDenied: Access Denied")).into();
        assert_eq!(result.message(), "AccessDenied: Access Denied");
        assert_eq!(result.into_result(), Err("AccessDenied: Access Denied".to_string()));
    }

    #[test]
    fn file_name_is_lowercased_basename() {
        assert_eq!(ObjectSummary::new("folder/sub/Photo.JPG").file_name(), "photo.jpg");
        assert_eq!(ObjectSummary::new("README").file_name(), "readme");
        assert_eq!(ObjectSummary::new("folder/").file_name(), "");
    }

    #[test]
    fn acl_follows_public_flag() {
        assert_eq!(Acl::from_public(true).as_str(), "public-read");
        assert_eq!(Acl::from_public(false).as_str(), "authenticated-read");
    }
}
