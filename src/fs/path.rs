//! Lexical path joining and cleaning
//!
//! Works on `OsStr` components so names that are not valid UTF-8 pass
//! through untouched. Nothing here touches the filesystem.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR_STR};

/// Join path elements with the platform separator, skipping leading empty
/// elements, and clean the result. Returns an empty path when every
/// element is empty.
pub fn join<S: AsRef<OsStr>>(elems: &[S]) -> PathBuf {
    let Some(first) = elems.iter().position(|e| !e.as_ref().is_empty()) else {
        return PathBuf::new();
    };

    let mut joined = OsString::new();
    for (i, elem) in elems[first..].iter().enumerate() {
        if i > 0 {
            joined.push(MAIN_SEPARATOR_STR);
        }
        joined.push(elem);
    }
    clean(Path::new(&joined))
}

/// Return the shortest lexically equivalent path.
///
/// - repeated separators collapse to one
/// - `.` elements are dropped
/// - `..` removes the preceding non-`..` element; a rooted path never
///   climbs above its root
/// - trailing separators are removed
/// - an empty result becomes `.`
pub fn clean(path: &Path) -> PathBuf {
    let mut head = PathBuf::new();
    let mut rooted = false;
    let mut parts: Vec<&OsStr> = Vec::new();

    for comp in path.components() {
        match comp {
            Component::Prefix(p) => head.push(p.as_os_str()),
            Component::RootDir => {
                head.push(comp.as_os_str());
                rooted = true;
            }
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if !rooted => parts.push(comp.as_os_str()),
                _ => {}
            },
            Component::Normal(name) => parts.push(name),
        }
    }

    let mut out = head;
    for part in parts {
        out.push(part);
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_table() {
        let cases: &[(&[&str], &str)] = &[
            // zero parameters
            (&[], ""),
            // one parameter
            (&[""], ""),
            (&["a"], "a"),
            // two parameters
            (&["a", "b"], "a/b"),
            (&["a", ""], "a"),
            (&["", "b"], "b"),
            (&["/", "a"], "/a"),
            (&["/", ""], "/"),
            (&["a/", "b"], "a/b"),
            (&["a/", ""], "a"),
            (&["", ""], ""),
        ];

        for (elems, want) in cases {
            assert_eq!(join(elems), Path::new(want), "join({:?})", elems);
        }
    }

    #[test]
    fn test_join_never_lets_an_element_replace_the_prefix() {
        assert_eq!(join(&["a", "/b"]), Path::new("a/b"));
        assert_eq!(join(&["./r", "f"]), Path::new("r/f"));
    }

    #[test]
    fn test_clean() {
        let cases = [
            ("", "."),
            (".", "."),
            ("/", "/"),
            ("a//b/./c/", "a/b/c"),
            ("a/b/../c", "a/c"),
            ("../../a", "../../a"),
            ("a/../..", ".."),
            ("/../a", "/a"),
            ("/a/b/../../..", "/"),
        ];
        for (input, want) in cases {
            assert_eq!(clean(Path::new(input)), Path::new(want), "clean({:?})", input);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_join_keeps_non_utf8_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"bad\xff");
        let joined = join(&[OsStr::new("d/"), name]);
        assert_eq!(joined.as_os_str().as_bytes(), b"d/bad\xff");
    }
}
