//! Driver archive extraction

use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::install::error::InstallError;

/// Extract the entry named `binary` from the zip at `archive` and place it at
/// `dest`, replacing any prior installation atomically (write then rename).
///
/// The two index generations lay their archives out differently (the legacy
/// layout has `chromedriver` at the root, Chrome for Testing nests it under
/// `chromedriver-<platform>/`), so the entry is matched by file name rather
/// than by path.
pub fn extract_binary(archive: &Path, binary: &str, dest: &Path) -> Result<(), InstallError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file)?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        if !entry.is_file() {
            continue;
        }
        let Some(name) = entry.enclosed_name() else {
            continue;
        };
        if name.file_name() != Some(OsStr::new(binary)) {
            continue;
        }

        debug!("extracting {} to {}", name.display(), dest.display());

        let staged = dest.with_extension("staged");
        let mut out = File::create(&staged)?;
        std::io::copy(&mut entry, &mut out)?;
        drop(out);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&staged, std::fs::Permissions::from_mode(0o755))?;
        }

        std::fs::rename(&staged, dest)?;
        return Ok(());
    }

    Err(InstallError::EntryMissing {
        archive: archive.display().to_string(),
        binary: binary.to_string(),
    })
}
