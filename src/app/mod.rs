use std::fs;
use std::path::{Path, PathBuf};

use crate::args::{Args, Command};
use crate::errors::Result;
use crate::mime::mime_type_of;
use crate::storage::{BucketListing, ObjectStore, StorageFacade};
use crate::utils::log_utils::Logger;
use crate::utils::path_utils::check_upload_source;

/// Which delete action a `delete` request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    SingleFile = 1,
    Directory = 2,
}

impl TryFrom<u8> for DeleteMode {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(DeleteMode::SingleFile),
            2 => Ok(DeleteMode::Directory),
            _ => Err("Wrong parameter passed for object deletion!".to_string()),
        }
    }
}

/// Outcome of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: String,
    /// The directory still exists and should be listed again
    pub relist: bool,
}

/// Quote a value for pasting into a POSIX shell; plain values pass through.
pub fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@%+=".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Trim a user-supplied name and replace spaces with hyphens
pub fn normalize_name(raw: &str) -> String {
    raw.trim().replace(' ', "-")
}

/// Drives the storage facade for the command line.
pub struct AppCore<'a, S: ObjectStore> {
    storage: &'a StorageFacade<S>,
    logger: Logger,
}

impl<'a, S: ObjectStore> AppCore<'a, S> {
    pub fn new(storage: &'a StorageFacade<S>, logger: Logger) -> Self {
        Self { storage, logger }
    }

    /// Create the bucket when named, then stage and upload each file under `dir`.
    ///
    /// Returns the bucket name actually used and the public URL of each
    /// uploaded file.
    ///
    /// # Errors
    /// Aborts on the first failure: bucket creation, an unreadable input file,
    /// staging, or an upload. Files uploaded before the failure stay uploaded.
    pub fn upload_files(
        &self,
        bucket: &str,
        dir: &str,
        files: &[PathBuf],
        staging_root: Option<&Path>,
    ) -> Result<(String, Vec<String>)> {
        // Bucket names are lower-cased on creation, so use the same name for uploads
        let bucket = normalize_name(bucket).to_lowercase();
        if !bucket.is_empty() {
            let created = self.storage.create_bucket(&bucket, true);
            if !created.is_success() {
                return Err(created.message().into());
            }
            self.logger.info(created.message());
        }

        let dir = normalize_name(dir);
        if dir.is_empty() {
            return Err("Directory name is empty!".into());
        }

        let problems: Vec<String> = files
            .iter()
            .filter_map(|f| check_upload_source(f).err())
            .collect();
        if !problems.is_empty() {
            for problem in &problems {
                self.logger.warn(problem);
            }
            return Err("Upload error!".into());
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("temp-aws");
        let staging = match staging_root {
            Some(root) => builder.tempdir_in(root).map_err(|e| {
                format!("Staging directory '{}' is not usable: {}", root.display(), e)
            })?,
            None => builder.tempdir()?,
        };
        self.logger.debug(&format!("Staging uploads in {}", staging.path().display()));

        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| format!("Unusable file name: {}", file.display()))?;

            // Step 1: copy into the staging directory
            let staged = staging.path().join(file_name);
            fs::copy(file, &staged).map_err(|e| {
                format!("Unknown error occurred during file upload! {}: {}", file.display(), e)
            })?;

            // Step 2: transfer the staged copy
            let key = format!("{}/{}", dir, file_name);
            let uploaded =
                self.storage
                    .upload(&bucket, &key, &staged, mime_type_of(file_name), true);
            if !uploaded.is_success() {
                return Err(format!(
                    "Failed to upload file in S3 Storage! {}",
                    uploaded.message()
                )
                .into());
            }

            if let Some(url) = uploaded.into_payload() {
                self.logger.info(&format!("Uploaded {}", url));
                urls.push(url);
            }
        }

        Ok((bucket, urls))
    }

    /// Numbered listing of the files under `dir`, each with its public link
    /// and the command that deletes it.
    ///
    /// # Errors
    /// Returns an error if the listing fails.
    pub fn listing_lines(&self, bucket: &str, dir: &str) -> Result<Vec<String>> {
        let listed = self.storage.list_objects(bucket, dir);
        if !listed.is_success() {
            return Err(listed.message().into());
        }

        let names = listed.into_payload().unwrap_or_default();
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let base = self.storage.base_url(bucket);
        let mut lines = vec![format!("Following files are uploaded in {} directory:", dir)];
        for (idx, name) in names.iter().enumerate() {
            let file_path = format!("{}/{}", dir, name);
            lines.push(format!(
                "{}) {} [ S3 Link: {}{} ] [ Delete: delete --mode 1 --bucket {} --dir {} --file-key {} ]",
                idx + 1,
                name,
                base,
                file_path,
                shell_quote(bucket),
                shell_quote(dir),
                shell_quote(&file_path)
            ));
        }
        lines.push(format!(
            "Delete Directory? delete --mode 2 --bucket {} --dir {}",
            shell_quote(bucket),
            shell_quote(dir)
        ));
        Ok(lines)
    }

    /// Run a delete request.
    ///
    /// # Errors
    /// Returns an error for an unknown mode or a single-file delete without a key.
    pub fn delete_entry(
        &self,
        mode: u8,
        bucket: &str,
        dir: &str,
        file_key: Option<&str>,
    ) -> Result<DeleteOutcome> {
        let result = match DeleteMode::try_from(mode)? {
            DeleteMode::SingleFile => {
                let key = file_key
                    .filter(|k| !k.trim().is_empty())
                    .ok_or("A file key is required to delete a single file")?;
                (self.storage.delete(bucket, key), true)
            }
            DeleteMode::Directory => (self.storage.delete_directory(bucket, dir), false),
        };

        let (outcome, relist) = result;
        Ok(DeleteOutcome {
            success: outcome.is_success(),
            message: outcome.message().to_string(),
            relist,
        })
    }

    /// One line per bucket, optionally with its creation date
    ///
    /// # Errors
    /// Returns an error if the bucket listing fails.
    pub fn bucket_lines(&self, details: bool) -> Result<Vec<String>> {
        let listed = self.storage.list_buckets(!details);
        if !listed.is_success() {
            return Err(listed.message().into());
        }

        let lines = match listed.into_payload() {
            Some(BucketListing::Names(names)) => names,
            Some(BucketListing::Details(infos)) => infos
                .into_iter()
                .map(|info| match info.creation_date {
                    Some(created) => format!(
                        "{} (created {})",
                        info.name,
                        created.format("%Y-%m-%d %H:%M:%S UTC")
                    ),
                    None => info.name,
                })
                .collect(),
            None => Vec::new(),
        };
        Ok(lines)
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Run the command selected on the command line against `storage`.
///
/// # Errors
/// Returns an error if the command fails; see the individual `AppCore` methods.
pub fn run_app<S: ObjectStore>(args: &Args, storage: &StorageFacade<S>) -> Result<()> {
    let logger = Logger::new(args.verbose);
    let core = AppCore::new(storage, logger);

    match &args.command {
        Command::Upload {
            bucket,
            dir,
            staging_dir,
            files,
        } => {
            let (bucket, urls) = core.upload_files(bucket, dir, files, staging_dir.as_deref())?;
            logger.normal(&format!("Uploaded {} file(s) to bucket '{}'", urls.len(), bucket));
            print_lines(&core.listing_lines(&bucket, &normalize_name(dir))?);
        }
        Command::List { bucket, dir } => {
            print_lines(&core.listing_lines(bucket, dir)?);
        }
        Command::Delete {
            mode,
            bucket,
            dir,
            file_key,
        } => {
            let outcome = core.delete_entry(*mode, bucket, dir, file_key.as_deref())?;
            if outcome.success {
                logger.normal(&outcome.message);
            } else {
                logger.warn(&outcome.message);
            }
            if outcome.relist {
                print_lines(&core.listing_lines(bucket, dir)?);
            }
        }
        Command::Buckets { details } => {
            print_lines(&core.bucket_lines(*details)?);
        }
    }

    Ok(())
}
