//! Mapping archive-internal names onto paths below an output root
//!
//! Names inside containers use `/` (and occasionally `\`) as separators and
//! are not trusted. [`sanitize`] turns one into a relative [`PathBuf`] built
//! from normal components only, so joining it onto the output root can never
//! escape that root.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons an entry name cannot be used as an output path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Nothing left after dropping empty and `.` components
    #[error("entry name is empty")]
    Empty,

    /// A `..` component would climb out of the output root
    #[error("entry name {name:?} contains a parent directory component")]
    ParentComponent {
        /// Offending name
        name: String,
    },

    /// Embedded NUL byte
    #[error("entry name {name:?} contains a NUL byte")]
    NulByte {
        /// Offending name
        name: String,
    },

    /// Leading Windows drive prefix such as `C:`
    #[error("entry name {name:?} starts with a drive prefix")]
    DrivePrefix {
        /// Offending name
        name: String,
    },
}

/// Convert an archive-internal name into a safe relative path
///
/// Splits on `/` and `\`, drops empty and `.` components and rejects
/// anything that could resolve outside the output root.
///
/// # Examples
///
/// ```
/// use packslice_extract::path::sanitize;
/// use std::path::PathBuf;
///
/// assert_eq!(
///     sanitize("romfs/data\\a.bin").unwrap(),
///     ["romfs", "data", "a.bin"].iter().collect::<PathBuf>()
/// );
/// assert!(sanitize("../etc/passwd").is_err());
/// ```
pub fn sanitize(name: &str) -> Result<PathBuf, PathError> {
    if name.contains('\0') {
        return Err(PathError::NulByte { name: name.into() });
    }

    let mut path = PathBuf::new();
    for (i, component) in name
        .split(['/', '\\'])
        .filter(|c| !c.is_empty() && *c != ".")
        .enumerate()
    {
        if component == ".." {
            return Err(PathError::ParentComponent { name: name.into() });
        }
        if i == 0 && is_drive_prefix(component) {
            return Err(PathError::DrivePrefix { name: name.into() });
        }
        path.push(component);
    }

    if path.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }
    Ok(path)
}

fn is_drive_prefix(component: &str) -> bool {
    let bytes = component.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
