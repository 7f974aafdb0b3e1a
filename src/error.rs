use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while browsing or sorting. None of these are
/// fatal: the shell reports them and keeps running.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Please select a valid folder")]
    NoFolderSelected,

    #[error("The selected folder contains no images")]
    EmptyFolder,

    #[error("No more images")]
    NoNextImage,

    #[error("No previous image")]
    NoPreviousImage,

    #[error("No image is selected")]
    NoImageSelected,

    #[error("Could not open {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("You have not chosen a folder to save to")]
    NoDestination,

    #[error("Cannot save to {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("{} is already in that folder", .0.display())]
    SameFile(PathBuf),

    #[error("Could not copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Short heading for the warning dialog.
    pub fn title(&self) -> &'static str {
        match self {
            Error::NoFolderSelected => "No Folder Selected",
            Error::EmptyFolder => "Empty Folder",
            Error::NoNextImage | Error::NoPreviousImage => "Sorry",
            Error::NoImageSelected => "No Image",
            Error::Decode { .. } => "Cannot Open Image",
            Error::NoDestination => "Sorry",
            Error::Destination { .. } => "Invalid Folder",
            Error::DestinationExists(_) | Error::SameFile(_) => "File Exists",
            Error::Copy { .. } => "Copy Failed",
        }
    }

    /// Boundary hits are routine while stepping through a folder.
    pub fn is_boundary(&self) -> bool {
        matches!(self, Error::NoNextImage | Error::NoPreviousImage)
    }
}
