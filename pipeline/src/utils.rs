use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::batch::{Direction, Job};
use super::SHARD_EXTENSION;

/// Every regular file under `dir`, recursively. Symlinks are skipped.
pub fn get_absolute_paths(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_symlink() {
            continue;
        }

        if path.is_dir() {
            paths.extend(get_absolute_paths(&path)?);
        } else {
            paths.push(fs::canonicalize(path)?);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Plans the jobs for `source`.
///
/// A file maps straight to `output`. A directory maps each file beneath it
/// to the same relative path under `output`: encoding appends `.rbs`,
/// decoding takes only `.rbs` files and strips the extension.
pub fn collect_jobs(source: &Path, output: &Path, direction: Direction) -> io::Result<Vec<Job>> {
    if !source.is_dir() {
        return Ok(vec![Job {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            direction,
        }]);
    }

    let base_dir = fs::canonicalize(source)?;
    let mut jobs = Vec::new();

    for path in get_absolute_paths(&base_dir)? {
        let rel_path = match path.strip_prefix(&base_dir) {
            Ok(rel_path) => rel_path.to_path_buf(),
            Err(_) => continue,
        };

        let rel_output = match direction {
            Direction::Encode => append_extension(&rel_path),
            Direction::Decode if has_shard_extension(&rel_path) => rel_path.with_extension(""),
            Direction::Decode => continue,
        };

        jobs.push(Job {
            source: path,
            output: output.join(rel_output),
            direction,
        });
    }

    Ok(jobs)
}

fn has_shard_extension(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == SHARD_EXTENSION)
}

fn append_extension(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(SHARD_EXTENSION);
    PathBuf::from(name)
}
