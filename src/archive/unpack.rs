use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};

use crate::error::ImportError;

/// Normalize an archive entry path to something safe to join onto the
/// target directory. `None` if it is absolute or climbs out with `..`.
pub fn sanitize_entry_path(path: &Path) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

/// Link targets are resolved relative to the directory holding the link.
fn link_stays_inside(entry_path: &Path, link_target: &Path, hard_link: bool) -> bool {
    let base = if hard_link {
        PathBuf::new()
    } else {
        entry_path.parent().map(Path::to_path_buf).unwrap_or_default()
    };

    let mut depth = base.components().count() as isize;
    for component in link_target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Gunzip and untar `reader` into `target_dir`, returning the relative paths
/// of the entries written. Any entry that would land outside `target_dir`
/// aborts the extraction.
pub fn unpack_archive<R: Read>(reader: R, target_dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    std::fs::create_dir_all(target_dir)?;

    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut written = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let raw_path = entry.path()?.into_owned();
        let relative = sanitize_entry_path(&raw_path)
            .ok_or_else(|| ImportError::UnsafeArchiveEntry {
                path: raw_path.clone(),
            })?;

        let entry_type = entry.header().entry_type();
        if matches!(entry_type, EntryType::Symlink | EntryType::Link) {
            let target = entry.link_name()?.unwrap_or_default().into_owned();
            if !link_stays_inside(&relative, &target, entry_type == EntryType::Link) {
                return Err(ImportError::UnsafeArchiveEntry { path: raw_path });
            }
        }

        if relative.as_os_str().is_empty() {
            continue;
        }

        if entry.unpack_in(target_dir)? {
            tracing::debug!("Extracted {}", relative.display());
            written.push(relative);
        } else {
            tracing::warn!("Skipped archive entry {}", raw_path.display());
        }
    }

    Ok(written)
}
