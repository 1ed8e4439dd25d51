use std::path::Path;

use url::Url;

/// Turns a local file path into a shareable resource locator.
pub trait UriResolver: Send + Sync {
    fn resolve(&self, path: &Path) -> Option<Url>;
}

/// Primary strategy: resolve through the filesystem. The file has to exist,
/// symlinks and relative segments are normalized away.
pub struct CanonicalFileResolver;

impl UriResolver for CanonicalFileResolver {
    fn resolve(&self, path: &Path) -> Option<Url> {
        let canonical = std::fs::canonicalize(path).ok()?;
        Url::from_file_path(canonical).ok()
    }
}

/// Fallback strategy: build a file URL from the path as given, without
/// touching the filesystem. Only works for absolute paths.
pub struct RawFileResolver;

impl UriResolver for RawFileResolver {
    fn resolve(&self, path: &Path) -> Option<Url> {
        Url::from_file_path(path).ok()
    }
}

pub fn default_resolvers() -> Vec<Box<dyn UriResolver>> {
    vec![Box::new(CanonicalFileResolver), Box::new(RawFileResolver)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_canonical_resolver_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("wall.png");
        std::fs::File::create(&file)
            .unwrap()
            .write_all(b"png")
            .unwrap();

        let url = CanonicalFileResolver.resolve(&file).expect("no url");
        assert_eq!(url.scheme(), "file");

        assert!(CanonicalFileResolver
            .resolve(&dir.path().join("missing.png"))
            .is_none());
    }

    #[test]
    fn test_raw_resolver_skips_existence_check() {
        let url = RawFileResolver
            .resolve(Path::new("/nowhere/wall.png"))
            .expect("no url");
        assert_eq!(url.as_str(), "file:///nowhere/wall.png");
    }

    #[test]
    fn test_both_strategies_fail_for_relative_missing_path() {
        let path = Path::new("not-absolute.png");
        assert!(CanonicalFileResolver.resolve(path).is_none());
        assert!(RawFileResolver.resolve(path).is_none());
    }

    #[test]
    fn test_empty_path_is_unresolvable() {
        let path = Path::new("");
        assert!(default_resolvers().iter().all(|r| r.resolve(path).is_none()));
    }
}
