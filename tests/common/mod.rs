use std::collections::HashMap;
use std::path::{Path, PathBuf};

use covbridge::config::Config;
use covbridge::error::{ConvertError, Result};
use covbridge::symbols::SymbolDump;
use tempfile::TempDir;

/// Symbol dump backed by a map of object path → `nm` output. Unknown objects
/// fail the way an unreadable object would.
#[derive(Default)]
pub struct FakeDump(pub HashMap<PathBuf, String>);

impl SymbolDump for FakeDump {
    fn dump(&self, object: &Path) -> Result<String> {
        self.0
            .get(object)
            .cloned()
            .ok_or_else(|| ConvertError::SymbolDump {
                object: object.to_path_buf(),
                message: "file format not recognized".into(),
            })
    }
}

/// A throwaway project with `src/` and `obj/` directories.
/// The caller must hold onto `TempDir` to keep the directory alive.
pub struct Project {
    pub dir: TempDir,
    pub dump: FakeDump,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::create_dir_all(dir.path().join("obj")).unwrap();
        Self {
            dir,
            dump: FakeDump::default(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> Config {
        Config::new(self.root(), "src", "obj")
    }

    /// Write a file relative to the project root, creating parent dirs.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Create `obj/<rel>` whose symbol dump lists the given mangled names.
    pub fn object(&mut self, rel: &str, symbols: &[&str]) {
        let path = self.write(&format!("obj/{rel}"), "");
        let dump: String = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{:016x} T {}\n", i * 64, s))
            .collect();
        self.dump.0.insert(path, dump);
    }

    /// Write the vendor report; `{root}` in `xml` is replaced by the
    /// project's absolute path.
    pub fn codecov(&self, xml: &str) -> PathBuf {
        let xml = xml.replace("{root}", &self.root().to_string_lossy());
        self.write("codecov.xml", &xml)
    }

    pub fn run(&self, config: &Config) -> covbridge::error::Result<String> {
        let from = self.root().join("codecov.xml");
        let to = self.root().join("cobertura.xml");
        covbridge::convert::run(&from, &to, config, &self.dump, 1_700_000_000)?;
        Ok(std::fs::read_to_string(to).unwrap())
    }
}
