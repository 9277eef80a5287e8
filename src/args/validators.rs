use super::types::{Args, Command};
use crate::app::DeleteMode;

/// Validates the parsed arguments for the selected command
///
/// # Errors
///
/// Returns an error message describing the first invalid argument.
pub fn validate(args: &Args) -> Result<(), String> {
    match &args.command {
        Command::Delete { mode, file_key, .. } => {
            let mode = DeleteMode::try_from(*mode)?;
            if mode == DeleteMode::SingleFile
                && file_key.as_deref().map_or(true, |k| k.trim().is_empty())
            {
                return Err(
                    "--file-key is required when deleting a single file (mode 1).".to_string(),
                );
            }
            Ok(())
        }
        Command::Upload { dir, .. } | Command::List { dir, .. } => {
            if dir.trim().is_empty() {
                return Err("Directory name is empty!".to_string());
            }
            Ok(())
        }
        Command::Buckets { .. } => Ok(()),
    }
}
