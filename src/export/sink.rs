use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Destination des fichiers exportés (dossier, mémoire, navigateur…).
pub trait ArtifactSink {
    fn write(&mut self, filename: &str, bytes: &[u8], mime: &str) -> anyhow::Result<()>;
}

/// Écrit chaque artefact dans un dossier, de manière atomique.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl ArtifactSink for DirectorySink {
    fn write(&mut self, filename: &str, bytes: &[u8], _mime: &str) -> anyhow::Result<()> {
        let target = self.path_for(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir).with_context(|| "creating temp file")?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target)
            .with_context(|| format!("atomic rename to {}", target.display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Garde les artefacts en mémoire (tests, intégration UI).
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<Artifact>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filename: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.filename == filename)
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, filename: &str, bytes: &[u8], mime: &str) -> anyhow::Result<()> {
        self.artifacts.push(Artifact {
            filename: filename.to_string(),
            mime: mime.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}
