// ABOUTME: File selection: turns typed paths, glob patterns, or pasted (dropped) paths into files.
// ABOUTME: Captures each file's name and size at selection time.

use std::path::{Path, PathBuf};

use glob::Pattern;
use reqwest::Url;

use crate::notify::Notice;

/// A file picked by the user, with name and size captured at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    /// Stat a regular file. Directories and unreadable paths are errors.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }
}

/// One whitespace-separated token from an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathToken {
    pub text: String,
    /// Quoted or backslash-escaped somewhere, so never treated as a glob.
    pub literal: bool,
}

/// Resolve an input line into files, in the order they appear.
///
/// The line may hold several paths separated by whitespace, quoted or
/// backslash-escaped the way terminals paste dropped files, and `file://` URIs.
/// Unquoted tokens containing glob metacharacters are expanded unless they name
/// an existing path. Relative paths are resolved against `cwd`.
pub fn resolve_selection(input: &str, cwd: &Path) -> (Vec<SelectedFile>, Vec<Notice>) {
    let mut files = Vec::new();
    let mut notices = Vec::new();

    for token in split_paths(input) {
        let text = token.text.as_str();
        let uri = file_uri_path(text);
        let path = match &uri {
            Some(path) => path.clone(),
            None => expand_path(text, cwd),
        };

        if uri.is_none() && !token.literal && is_glob(text) && !path.exists() {
            let matched = expand_glob(&glob_pattern(text, cwd));
            if matched.is_empty() {
                notices.push(Notice::error("No Files", format!("Nothing matched \"{}\".", text)));
            }
            files.extend(matched);
            continue;
        }

        match SelectedFile::from_path(&path) {
            Ok(file) => files.push(file),
            Err(_) => notices.push(Notice::error(
                "File Unavailable",
                format!("Could not read \"{}\".", text),
            )),
        }
    }

    (files, notices)
}

/// Split a line into path tokens, honoring single quotes, double quotes, and
/// backslash escapes.
pub fn split_paths(input: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut literal = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_token = true;
                    literal = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                    in_token = true;
                    literal = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(PathToken {
                            text: std::mem::take(&mut current),
                            literal,
                        });
                        in_token = false;
                        literal = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }
    if in_token {
        tokens.push(PathToken {
            text: current,
            literal,
        });
    }

    tokens
}

fn is_glob(token: &str) -> bool {
    token.contains(['*', '?', '['])
}

/// Local path of a `file:` URI. `None` for anything else, or a URI naming a remote host.
fn file_uri_path(token: &str) -> Option<PathBuf> {
    if !token.starts_with("file:") {
        return None;
    }
    Url::parse(token).ok()?.to_file_path().ok()
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn expand_path(token: &str, cwd: &Path) -> PathBuf {
    let path = match token.strip_prefix("~/") {
        Some(rest) => home().join(rest),
        None => PathBuf::from(token),
    };

    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Anchor a glob token at the home or working directory, escaping the anchor
/// so metacharacters in directory names match literally.
fn glob_pattern(token: &str, cwd: &Path) -> String {
    let anchored = |base: &Path, rest: &str| {
        format!(
            "{}{}{}",
            Pattern::escape(&base.to_string_lossy()),
            std::path::MAIN_SEPARATOR,
            rest
        )
    };
    match token.strip_prefix("~/") {
        Some(rest) => anchored(&home(), rest),
        None if Path::new(token).is_absolute() => token.to_string(),
        None => anchored(cwd, token),
    }
}

fn expand_glob(pattern: &str) -> Vec<SelectedFile> {
    let Ok(paths) = glob::glob(pattern) else {
        return Vec::new();
    };
    paths
        .filter_map(Result::ok)
        .filter_map(|p| SelectedFile::from_path(&p).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        split_paths(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn split_plain_whitespace() {
        assert_eq!(texts("a.txt  b.txt\nc.txt"), vec!["a.txt", "b.txt", "c.txt"]);
        assert!(split_paths("a.txt").iter().all(|t| !t.literal));
    }

    #[test]
    fn split_quoted_and_escaped_paths() {
        let tokens = split_paths(r#"'/tmp/my file.pdf' "/tmp/other \"x\".txt" /tmp/with\ space.png"#);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["/tmp/my file.pdf", "/tmp/other \"x\".txt", "/tmp/with space.png"]
        );
        assert!(tokens.iter().all(|t| t.literal));
    }

    #[test]
    fn split_empty_quotes_yields_empty_token() {
        assert_eq!(texts("''"), vec![""]);
        assert!(split_paths("   ").is_empty());
    }

    #[test]
    fn resolves_relative_paths_against_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"hello").unwrap();

        let (files, notices) = resolve_selection("a.txt", tmp.path());

        assert!(notices.is_empty());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.txt");
        assert_eq!(files[0].size, 5);
    }

    #[test]
    fn resolves_pasted_file_uri() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("my report.txt");
        std::fs::write(&path, b"abc").unwrap();
        let uri = format!("file://{}", path.display()).replace(' ', "%20");

        let (files, notices) = resolve_selection(&uri, Path::new("/"));

        assert!(notices.is_empty());
        assert_eq!(files[0].name, "my report.txt");
    }

    #[test]
    fn resolves_file_uri_with_localhost_host() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.txt");
        std::fs::write(&path, b"abc").unwrap();
        let uri = format!("file://localhost{}", path.display());

        let (files, notices) = resolve_selection(&uri, Path::new("/"));

        assert!(notices.is_empty(), "{:?}", notices);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, path);
    }

    #[test]
    fn remote_file_uri_is_unavailable() {
        let (files, notices) = resolve_selection("file://fileserver/share/a.txt", Path::new("/"));
        assert!(files.is_empty());
        assert_eq!(notices[0].title, "File Unavailable");
    }

    #[test]
    fn escaped_brackets_in_dropped_path_stay_literal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report[1].pdf");
        std::fs::write(&path, b"pdf").unwrap();
        let pasted = format!("{}/report\\[1\\].pdf", tmp.path().display());

        let (files, notices) = resolve_selection(&pasted, Path::new("/"));

        assert!(notices.is_empty(), "{:?}", notices);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "report[1].pdf");
    }

    #[test]
    fn quoted_or_existing_bracket_names_are_not_globbed() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("shot[2].png"), b"png").unwrap();

        let (quoted, notices) = resolve_selection("'shot[2].png'", tmp.path());
        assert!(notices.is_empty());
        assert_eq!(quoted.len(), 1);

        let (typed, notices) = resolve_selection("shot[2].png", tmp.path());
        assert!(notices.is_empty());
        assert_eq!(typed[0].name, "shot[2].png");
    }

    #[test]
    fn glob_ignores_metacharacters_in_working_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let cwd = tmp.path().join("dir[x]");
        std::fs::create_dir(&cwd).unwrap();
        std::fs::write(cwd.join("a.log"), b"x").unwrap();

        let (files, notices) = resolve_selection("*.log", &cwd);

        assert!(notices.is_empty());
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn glob_expands_in_sorted_order() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.log", "a.log", "skip.txt"] {
            std::fs::write(tmp.path().join(name), b"x").unwrap();
        }

        let (files, notices) = resolve_selection("*.log", tmp.path());

        assert!(notices.is_empty());
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.log", "b.log"]);
    }

    #[test]
    fn unmatched_glob_and_missing_path_raise_notices() {
        let tmp = tempfile::tempdir().unwrap();
        let (files, notices) = resolve_selection("*.nothing missing.txt", tmp.path());
        assert!(files.is_empty());
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].title, "No Files");
        assert_eq!(notices[1].title, "File Unavailable");
        assert!(notices[1].description.contains("missing.txt"));
    }

    #[test]
    fn directories_are_not_selectable() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        let (files, notices) = resolve_selection("sub", tmp.path());
        assert!(files.is_empty());
        assert_eq!(notices.len(), 1);
    }
}
