//! Handler table merging.
//!
//! # Responsibilities
//! - Insert or overwrite one handler at a mount point
//! - Give directory handlers a trailing-slash mount point
//! - Drop the file/directory twin of the new mount point
//!
//! # Design Decisions
//! - `/foo` and `/foo/` never coexist; whichever was set last wins
//! - Linear scan over existing entries (tables are small and human-sized)

use std::collections::BTreeMap;

use super::types::HttpHandler;

/// Insert `handler` at `mount_point` and resolve overlap with its twin.
///
/// Returns the mount point actually used as the key.
pub fn merge_handler(
    table: &mut BTreeMap<String, HttpHandler>,
    mount_point: &str,
    handler: HttpHandler,
    is_directory: bool,
) -> String {
    let mut mount = mount_point.to_string();
    if is_directory && !mount.ends_with('/') {
        // Relative links inside served directories need the trailing slash.
        mount.push('/');
    }

    table.insert(mount.clone(), handler);
    table.retain(|k, _| k == &mount || !is_twin(&mount, k));
    mount
}

/// True if one key is the other with a single trailing `/` appended.
fn is_twin(mount: &str, other: &str) -> bool {
    mount.strip_suffix('/') == Some(other) || other.strip_suffix('/') == Some(mount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> HttpHandler {
        HttpHandler::Path(p.to_string())
    }

    #[test]
    fn test_directory_gets_trailing_slash() {
        let mut table = BTreeMap::new();
        let mount = merge_handler(&mut table, "/dir", path("/srv/dir"), true);
        assert_eq!(mount, "/dir/");
        assert_eq!(table.get("/dir/"), Some(&path("/srv/dir")));
        assert!(!table.contains_key("/dir"));

        let mount = merge_handler(&mut table, "/other/", path("/srv/other"), true);
        assert_eq!(mount, "/other/");
    }

    #[test]
    fn test_directory_replaces_file() {
        let mut table = BTreeMap::new();
        merge_handler(&mut table, "/dir", path("/srv/file"), false);
        merge_handler(&mut table, "/dir", path("/srv/dir"), true);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("/dir/"), Some(&path("/srv/dir")));
    }

    #[test]
    fn test_file_replaces_directory() {
        let mut table = BTreeMap::new();
        merge_handler(&mut table, "/dir", path("/srv/dir"), true);
        merge_handler(&mut table, "/dir", path("/srv/file"), false);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("/dir"), Some(&path("/srv/file")));
    }

    #[test]
    fn test_unrelated_mounts_survive() {
        let mut table = BTreeMap::new();
        merge_handler(&mut table, "/", HttpHandler::Text("root".into()), false);
        merge_handler(&mut table, "/foo", HttpHandler::Text("foo".into()), false);
        merge_handler(&mut table, "/foo/bar/", path("/srv/bar"), true);
        merge_handler(&mut table, "/foobar", HttpHandler::Text("foobar".into()), false);
        assert_eq!(table.len(), 4);

        // Overwrite in place keeps the rest.
        merge_handler(&mut table, "/foo", HttpHandler::Text("again".into()), false);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("/foo"), Some(&HttpHandler::Text("again".into())));
    }
}
