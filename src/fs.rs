//! Capability-based filesystem helpers.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

/// Opens (creating if needed) the parent directory of `path` and returns it
/// with the file name.
pub(crate) fn open_parent_dir(path: &Utf8Path) -> std::io::Result<(Dir, &str)> {
    let (parent, file_name) = split_file_path(path)?;
    Dir::create_ambient_dir_all(parent, ambient_authority())?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Opens the parent directory of `path` without creating it.
///
/// A missing directory yields `None`.
pub(crate) fn open_existing_parent_dir(path: &Utf8Path) -> std::io::Result<Option<(Dir, &str)>> {
    let (parent, file_name) = split_file_path(path)?;
    match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => Ok(Some((dir, file_name))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn split_file_path(path: &Utf8Path) -> std::io::Result<(&Utf8Path, &str)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::other("path must include a file name"))?;
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Ok((parent, file_name))
}

/// Reads `file_name` from `dir`, mapping a missing file to `None`.
pub(crate) fn read_optional(dir: &Dir, file_name: &str) -> std::io::Result<Option<String>> {
    match dir.read_to_string(file_name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Replaces `file_name` atomically: write a `.tmp` sibling, then rename.
pub(crate) fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> std::io::Result<()> {
    let tmp_name = format!("{file_name}.tmp");
    dir.write(&tmp_name, contents)?;
    dir.rename(&tmp_name, dir, file_name)
}
