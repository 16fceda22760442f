// Primitives for reading ballots stored as text files, one name per line.

use crate::tally::*;

use std::borrow::Cow;

/// The names of a ballot, from the most preferred to the least preferred.
///
/// Lines are trimmed and blank lines are dropped.
pub fn parse_ballot(contents: &str, normalize_case: bool) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| {
            if normalize_case {
                line.to_uppercase()
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Reads a ballot file.
///
/// Bytes that are not valid UTF-8 are replaced, so that such names are
/// reported by the tally as unknown rather than failing the read.
pub fn read_ballot(path: &Path, normalize_case: bool) -> CliResult<Vec<String>> {
    let bytes = fs::read(path).context(OpeningFileSnafu {
        path: path.display().to_string(),
    })?;
    let contents = String::from_utf8_lossy(&bytes);
    if let Cow::Owned(_) = contents {
        debug!("read_ballot: {:?} is not valid UTF-8", path);
    }
    Ok(parse_ballot(&contents, normalize_case))
}

/// All the regular files under the given paths.
///
/// The roots are explored in order, and the content of each directory in
/// alphabetical order. Symbolic links are not followed.
pub fn collect_files(roots: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for root in roots {
        walk(root, &mut files)?;
    }
    Ok(files)
}

fn walk(path: &Path, files: &mut Vec<PathBuf>) -> CliResult<()> {
    let meta = fs::symlink_metadata(path).context(OpeningFileSnafu {
        path: path.display().to_string(),
    })?;
    if meta.is_dir() {
        let dir_path = path.display().to_string();
        let mut entries: Vec<PathBuf> = fs::read_dir(path)
            .context(ReadingDirSnafu {
                path: dir_path.clone(),
            })?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<PathBuf>, std::io::Error>>()
            .context(ReadingDirSnafu { path: dir_path })?;
        entries.sort();
        for entry in entries.iter() {
            walk(entry, files)?;
        }
    } else if meta.is_file() {
        files.push(path.to_path_buf());
    } else {
        debug!("walk: skipping {:?}", path);
    }
    Ok(())
}
