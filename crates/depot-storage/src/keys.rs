//! Storage path generation.
//!
//! Path format: `{id}_{sanitized name}`, flat under the storage root. The id
//! prefix keeps paths of distinct records from ever colliding.

use uuid::Uuid;

const MAX_FILENAME_LENGTH: usize = 200;

/// Reduce a client-supplied name to a single safe path component.
///
/// Directory parts are dropped and any character outside
/// `[A-Za-z0-9._-]` becomes `_`. Names that are empty or contain `..`
/// collapse to `file`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    if base.contains("..") {
        return "file".to_string();
    }

    let sanitized: String = base
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(['.', '_']).is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Storage path for the object with the given id and display name.
pub fn storage_path_for(id: Uuid, name: &str) -> String {
    format!("{}_{}", id, sanitize_filename(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_path_prefixes_id() {
        let id = Uuid::new_v4();
        assert_eq!(storage_path_for(id, "report.pdf"), format!("{}_report.pdf", id));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\photo.png"), "photo.png");
        assert_eq!(sanitize_filename("a/b/c.txt"), "c.txt");
    }

    #[test]
    fn test_sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("résumé.txt"), "r_sum_.txt");
    }

    #[test]
    fn test_sanitize_falls_back_for_unusable_names() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename(".."), "file");
        assert_eq!(sanitize_filename("a..b"), "file");
        assert_eq!(sanitize_filename("dir/"), "file");
    }

    #[test]
    fn test_distinct_ids_never_share_a_path() {
        let a = storage_path_for(Uuid::new_v4(), "same.png");
        let b = storage_path_for(Uuid::new_v4(), "same.png");
        assert_ne!(a, b);
    }
}
