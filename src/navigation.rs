use crate::error::{Error, Result};
use crate::scanner::ImageEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Which navigation controls the shell should offer, derived from the
/// current state rather than stored alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavControls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub count: usize,
}

/// The images of the current folder and which one is on screen.
#[derive(Debug, Default)]
pub struct NavigationState {
    entries: Vec<ImageEntry>,
    current_index: Option<usize>,
}

impl NavigationState {
    /// Swap in a fresh scan result. The first image becomes current.
    pub fn replace(&mut self, entries: Vec<ImageEntry>) {
        self.current_index = if entries.is_empty() { None } else { Some(0) };
        self.entries = entries;
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&ImageEntry> {
        self.entries.get(self.current_index?)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step one image forward or back. Stops at either end instead of
    /// wrapping, reporting the boundary as an error.
    pub fn advance(&mut self, direction: Direction) -> Result<&ImageEntry> {
        let Some(current) = self.current_index else {
            return Err(Error::EmptyFolder);
        };
        let target = match direction {
            Direction::Next if current + 1 < self.entries.len() => current + 1,
            Direction::Next => return Err(Error::NoNextImage),
            Direction::Previous if current > 0 => current - 1,
            Direction::Previous => return Err(Error::NoPreviousImage),
        };
        self.current_index = Some(target);
        Ok(&self.entries[target])
    }

    /// Jump straight to `index`, as when an item in the list is clicked.
    pub fn select(&mut self, index: usize) -> Option<&ImageEntry> {
        let entry = self.entries.get(index)?;
        self.current_index = Some(index);
        Some(entry)
    }

    pub fn controls(&self) -> NavControls {
        let count = self.entries.len();
        match self.current_index {
            Some(i) => NavControls {
                prev_enabled: i > 0,
                next_enabled: i + 1 < count,
                count,
            },
            None => NavControls {
                count,
                ..NavControls::default()
            },
        }
    }
}
