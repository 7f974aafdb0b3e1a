use std::path::{Path, PathBuf};

/// Extensions the viewer can decode, matched case-insensitively against the
/// end of the file name.
pub const SUPPORTED_EXTENSIONS: [&str; 10] = [
    "BMP", "GIF", "JPG", "JPEG", "PNG", "PBM", "PGM", "PPM", "TIFF", "XBM",
];

/// One image file found in a scanned folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub name: String,
    pub path: PathBuf,
}

#[cfg(test)]
impl ImageEntry {
    pub fn new(folder: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = folder.join(&name);
        Self { name, path }
    }
}

/// List the images directly inside `folder`, in directory-listing order.
///
/// A path that is not a readable directory yields an empty list; callers
/// decide whether that deserves a warning.
pub fn scan(folder: &Path) -> Vec<ImageEntry> {
    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Not scanning {}: {}", folder.display(), e);
            return Vec::new();
        }
    };

    let mut images = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", folder.display(), e);
                continue;
            }
        };
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }
        // The lossy name is for display; the path keeps the raw bytes.
        let name = entry.file_name().to_string_lossy().into_owned();
        if has_supported_suffix(&name) {
            images.push(ImageEntry {
                name,
                path: entry.path(),
            });
        }
    }

    log::info!("Found {} images in {}", images.len(), folder.display());
    images
}

fn has_supported_suffix(name: &str) -> bool {
    let upper = name.to_uppercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| {
        upper.len() > ext.len()
            && upper.ends_with(ext)
            && upper.as_bytes()[upper.len() - ext.len() - 1] == b'.'
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"not really an image").expect("failed to write test file");
        path
    }

    fn names(entries: &[ImageEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn keeps_only_supported_extensions() {
        let dir = tempdir().expect("failed to create temp dir");
        touch(dir.path(), "a.png");
        touch(dir.path(), "b.txt");
        touch(dir.path(), "c.JPG");

        let mut found = names(&scan(dir.path()))
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        found.sort();
        assert_eq!(found, vec!["a.png", "c.JPG"]);
    }

    #[test]
    fn entries_carry_joined_paths() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = touch(dir.path(), "photo.jpeg");

        let entries = scan(dir.path());
        assert_eq!(entries, vec![ImageEntry { name: "photo.jpeg".into(), path }]);
    }

    #[test]
    fn follows_read_dir_order() {
        let dir = tempdir().expect("failed to create temp dir");
        for name in ["z.png", "m.gif", "a.bmp", "notes.md"] {
            touch(dir.path(), name);
        }

        let listed: Vec<String> = fs::read_dir(dir.path())
            .expect("read_dir failed")
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n != "notes.md")
            .collect();
        assert_eq!(names(&scan(dir.path())), listed);
    }

    #[test]
    fn every_listed_extension_is_accepted_in_any_case() {
        let dir = tempdir().expect("failed to create temp dir");
        for ext in SUPPORTED_EXTENSIONS {
            touch(dir.path(), &format!("upper.{ext}"));
            touch(dir.path(), &format!("lower.{}", ext.to_lowercase()));
        }
        assert_eq!(scan(dir.path()).len(), SUPPORTED_EXTENSIONS.len() * 2);
    }

    #[test]
    fn does_not_recurse_or_list_directories() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::create_dir(dir.path().join("nested.png")).expect("mkdir failed");
        touch(&dir.path().join("nested.png"), "inner.png");
        touch(dir.path(), "top.png");

        assert_eq!(names(&scan(dir.path())), vec!["top.png"]);
    }

    #[test]
    fn non_directory_yields_nothing() {
        let dir = tempdir().expect("failed to create temp dir");
        let file = touch(dir.path(), "a.png");

        assert!(scan(&file).is_empty());
        assert!(scan(&dir.path().join("missing")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_keep_a_usable_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().expect("failed to create temp dir");
        let raw = OsStr::from_bytes(b"caf\xe9.png");
        if fs::write(dir.path().join(raw), b"x").is_err() {
            // Some filesystems reject invalid UTF-8 names outright.
            return;
        }

        let entries = scan(dir.path());
        assert_eq!(entries.len(), 1);
        assert!(entries[0].name.starts_with("caf"));
        assert!(entries[0].path.exists());
        assert_eq!(entries[0].path, dir.path().join(raw));
    }

    #[test]
    fn suffix_needs_a_dot() {
        assert!(has_supported_suffix("shot.TiFf"));
        assert!(has_supported_suffix(".png"));
        assert!(!has_supported_suffix("apng"));
        assert!(!has_supported_suffix("archive.png.zip"));
        assert!(!has_supported_suffix("PNG"));
    }
}
