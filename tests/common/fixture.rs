use std::{fs, ops::Deref, path::{Path, PathBuf}, fmt::{self, Display, Formatter}};
use tempfile::TempDir;

pub const TEST_DATA_DIR: &str = "tests/test-data";

/// A path within its own temporary directory. The directory is deleted once the fixture is dropped.
pub struct Fixture {
    path    : PathBuf,
    source  : PathBuf,
    _tempdir: TempDir,
}

impl Fixture {
    /// Reserve `<tempdir>/<name>`, without creating it.
    pub fn blank(name: &str) -> Self {
        let source = Path::new(env!("CARGO_MANIFEST_DIR")).join(TEST_DATA_DIR).join(name);
        let tempdir = tempfile::tempdir().expect("Failed to generate temp directory");
        let path = tempdir.path().join(name);
        Self{path, source, _tempdir: tempdir}
    }

    /// Copy `tests/test-data/<name>` into a fresh temporary directory.
    pub fn copy(name: &str) -> Self {
        let fixture = Self::blank(name);
        let parent = fixture.path.parent().expect("Fixture has no parent directory");
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
        fs::copy(&fixture.source, &fixture.path)
            .unwrap_or_else(|e| panic!("Failed to copy fixture {}: {e}", fixture.source.display()));
        fixture
    }
}

impl Deref for Fixture {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

impl Display for Fixture {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
