use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::scanner::ImageEntry;

/// What to do when the destination already has a file with the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    #[default]
    Overwrite,
    Refuse,
}

/// A subfolder of the destination root that images can be copied into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTarget {
    pub label: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct DestinationSelection {
    root: Option<PathBuf>,
    targets: Vec<CopyTarget>,
}

impl DestinationSelection {
    /// Make `root` the destination and list its immediate subfolders as
    /// targets, sorted by name. On error the previous selection is kept.
    pub fn choose_root(&mut self, root: PathBuf) -> io::Result<()> {
        let mut targets = Vec::new();
        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            targets.push(CopyTarget {
                label: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
            });
        }
        targets.sort_by(|a, b| a.label.cmp(&b.label));

        log::info!(
            "Destination {} has {} subfolders",
            root.display(),
            targets.len()
        );
        self.root = Some(root);
        self.targets = targets;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.targets.clear();
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn targets(&self) -> &[CopyTarget] {
        &self.targets
    }

    pub fn target(&self, index: usize) -> Option<&CopyTarget> {
        self.targets.get(index)
    }
}

/// Copy the current image into `destination`, keeping its file name.
/// Returns where the copy landed.
pub fn copy_current(
    entry: Option<&ImageEntry>,
    destination: Option<&Path>,
    policy: OverwritePolicy,
) -> Result<PathBuf> {
    let destination = destination.ok_or(Error::NoDestination)?;
    let entry = entry.ok_or(Error::NoImageSelected)?;

    let file_name = entry
        .path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| entry.name.clone().into());
    let target = destination.join(file_name);

    // Copying a file onto itself would truncate it.
    let same_file = match (
        std::fs::canonicalize(&entry.path),
        std::fs::canonicalize(&target),
    ) {
        (Ok(from), Ok(to)) => from == to,
        _ => false,
    };
    if same_file {
        return Err(Error::SameFile(target));
    }

    if policy == OverwritePolicy::Refuse && target.exists() {
        return Err(Error::DestinationExists(target));
    }

    std::fs::copy(&entry.path, &target).map_err(|source| Error::Copy {
        from: entry.path.clone(),
        to: target.clone(),
        source,
    })?;

    log::info!("Copied {} to {}", entry.path.display(), target.display());
    Ok(target)
}
