//! Mount point normalization.

use crate::error::{ServeError, ServeResult};

/// Canonicalize a user supplied mount point to start with exactly one `/`.
///
/// `"foo"`, `"/foo"` and `"////foo"` all become `"/foo"`. The result must be a
/// valid URL path: no control characters and no malformed `%` escapes.
pub fn normalize_mount_point(raw: &str) -> ServeResult<String> {
    let mount = format!("/{}", raw.trim_start_matches('/'));
    validate_path(&mount).map_err(|reason| ServeError::InvalidMountPoint {
        mount: raw.to_string(),
        reason: reason.to_string(),
    })?;
    Ok(mount)
}

fn validate_path(path: &str) -> Result<(), &'static str> {
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b if b < 0x20 || b == 0x7f => return Err("invalid control character in URL"),
            b'%' => {
                let escape = bytes.get(i + 1..i + 3);
                match escape {
                    Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                        i += 3;
                        continue;
                    }
                    _ => return Err("invalid URL escape"),
                }
            }
            _ => {}
        }
        i += 1;
    }
    Ok(())
}
