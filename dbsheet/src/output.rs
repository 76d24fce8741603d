//! File output for the finished workbook.
//!
//! The workbook is serialized in memory, written directly to the final path
//! (no temporary-file-and-rename), and stamped with fixed permission bits.

use dbsheet_core::error::{DbsheetError, Result};
use dbsheet_core::xlsx::Workbook;
use std::path::Path;

/// Permission bits applied to the saved workbook: owner read/write,
/// group/other read.
#[cfg(unix)]
const OUTPUT_FILE_MODE: u32 = 0o644;

/// Saves the workbook to `output_path` and sets its permissions.
///
/// # Errors
/// Returns an error if serialization, the write, or the permission change
/// fails.
pub async fn save_workbook(workbook: &Workbook, output_path: &Path) -> Result<()> {
    let buffer = workbook.save_to_buffer()?;

    tokio::fs::write(output_path, buffer)
        .await
        .map_err(|e| {
            DbsheetError::io(format!("failed to write to {}", output_path.display()), e)
        })?;

    set_output_permissions(output_path).await
}

#[cfg(unix)]
async fn set_output_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = std::fs::Permissions::from_mode(OUTPUT_FILE_MODE);
    tokio::fs::set_permissions(path, permissions)
        .await
        .map_err(|e| {
            DbsheetError::io(
                format!("failed to set permissions on {}", path.display()),
                e,
            )
        })
}

#[cfg(not(unix))]
async fn set_output_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
