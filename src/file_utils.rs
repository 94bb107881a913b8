use anyhow::{Result, Context};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// @module: File and stream utilities

/// Where subtitle text is read from or written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Standard input or standard output
    Stdio,
    /// A file on disk
    File(PathBuf),
}

impl Endpoint {
    // @creates: Endpoint from an optional path, "-" meaning stdio
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) if path.as_os_str() != "-" => Self::File(path),
            _ => Self::Stdio,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "<stdio>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Open an endpoint for reading
    pub fn open_input(endpoint: &Endpoint) -> Result<Box<dyn Read>> {
        match endpoint {
            Endpoint::Stdio => Ok(Box::new(io::stdin().lock())),
            Endpoint::File(path) => {
                let file = fs::File::open(path)
                    .with_context(|| format!("Failed to open input file: {}", path.display()))?;
                Ok(Box::new(io::BufReader::new(file)))
            }
        }
    }

    /// Write a complete buffer to an endpoint
    pub fn write_output(endpoint: &Endpoint, content: &[u8]) -> Result<()> {
        match endpoint {
            Endpoint::Stdio => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content).context("Failed to write to stdout")?;
                stdout.flush().context("Failed to flush stdout")?;
                Ok(())
            }
            Endpoint::File(path) => Self::write_atomic(path, content),
        }
    }

    /// Write a file through a temporary sibling so a failed write never
    /// leaves a truncated destination behind
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(dir)?;

        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in: {}", dir.display()))?;
        temp.write_all(content)
            .with_context(|| format!("Failed to write temporary file for: {}", path.display()))?;
        temp.as_file().sync_all()
            .with_context(|| format!("Failed to sync temporary file for: {}", path.display()))?;
        temp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace file: {}", path.display()))?;

        Ok(())
    }
}
