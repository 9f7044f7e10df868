//! Destination path derivation and collision uniqueness

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::domain::model::CollisionPolicy;

/// Compute the candidate output path for a source.
///
/// `{output_dir or source dir}/{source stem}.{extension}`, extension
/// lowercased. No existence check is performed.
pub fn resolve(source: &Path, extension: &str, output_dir: Option<&Path>) -> PathBuf {
    let directory = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let mut file_name: OsString = source
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    file_name.push(".");
    file_name.push(extension.to_lowercase());

    directory.join(file_name)
}

/// Return `path` if it does not exist, otherwise the first `"{stem} (n).{ext}"`
/// sibling (n starting at 1) that does not exist.
pub fn uniquify(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_os_string());

    let mut n: u64 = 1;
    loop {
        let candidate = path.with_file_name(numbered_name(&stem, extension.as_deref(), n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

fn numbered_name(stem: &std::ffi::OsStr, extension: Option<&std::ffi::OsStr>, n: u64) -> OsString {
    let mut name = stem.to_os_string();
    name.push(format!(" ({})", n));
    if let Some(ext) = extension {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Final destination for a candidate under the batch policy
pub fn apply_policy(candidate: PathBuf, policy: CollisionPolicy) -> PathBuf {
    match policy {
        CollisionPolicy::KeepBoth => uniquify(&candidate),
        CollisionPolicy::Overwrite => candidate,
    }
}

/// Prospective outputs of a batch that already exist
pub fn find_conflicts<'a, I>(sources: I, extension: &str, output_dir: Option<&Path>) -> Vec<PathBuf>
where
    I: IntoIterator<Item = &'a Path>,
{
    sources
        .into_iter()
        .map(|source| resolve(source, extension, output_dir))
        .filter(|candidate| candidate.exists())
        .collect()
}
