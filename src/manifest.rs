//! Read and rewrite the version field of a package manifest.
//!
//! Only the version value is touched; every other byte of the file is
//! preserved. `package.json` is rewritten by splicing the new value into the
//! span of its top-level version string, TOML manifests through `toml_edit`.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use toml_edit::DocumentMut;

use crate::error::{GitSemverError, Result};
use crate::reconcile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    PackageJson,
    CargoToml,
}

impl ManifestFormat {
    /// Detect the format from the file name; anything that is not TOML is
    /// treated as `package.json`.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ManifestFormat::CargoToml,
            _ => ManifestFormat::PackageJson,
        }
    }
}

/// A manifest loaded into memory
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    format: ManifestFormat,
    contents: String,
}

/// Byte range of the top-level `"version"` string value, quotes excluded
///
/// Scans the text once, tracking nesting depth and skipping over string
/// contents, so `"version"` keys inside nested objects are never matched.
fn top_level_version_span(text: &str) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut expect_key = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'[' => {
                depth += 1;
                expect_key = depth == 1 && bytes[i] == b'{';
                i += 1;
            }
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                i += 1;
            }
            b',' => {
                expect_key = depth == 1;
                i += 1;
            }
            b'"' => {
                let end = string_end(bytes, i)?;
                if depth == 1 && expect_key {
                    expect_key = false;
                    if &bytes[i + 1..end] == b"version" {
                        let value = skip_whitespace(bytes, end + 1);
                        if bytes.get(value) != Some(&b':') {
                            return None;
                        }
                        let start = skip_whitespace(bytes, value + 1);
                        if bytes.get(start) != Some(&b'"') {
                            return None;
                        }
                        return Some(start + 1..string_end(bytes, start)?);
                    }
                }
                i = end + 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Index of the quote closing the string that opens at `start`.
fn string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    i
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| GitSemverError::manifest(path, format!("cannot read: {}", e)))?;

        Ok(Manifest {
            path: path.to_path_buf(),
            format: ManifestFormat::detect(path),
            contents,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ManifestFormat {
        self.format
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// The declared version string
    pub fn version(&self) -> Result<String> {
        match self.format {
            ManifestFormat::PackageJson => self.json_version(),
            ManifestFormat::CargoToml => self.toml_version(),
        }
    }

    fn json_version(&self) -> Result<String> {
        let value: serde_json::Value = serde_json::from_str(&self.contents)
            .map_err(|e| self.error(format!("invalid JSON: {}", e)))?;

        value
            .get("version")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| self.error("no \"version\" field"))
    }

    fn toml_version(&self) -> Result<String> {
        let doc = self.toml_document()?;
        let package = doc
            .get("package")
            .or_else(|| doc.get("workspace").and_then(|w| w.get("package")));

        package
            .and_then(|p| p.get("version"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| self.error("no literal package version"))
    }

    fn toml_document(&self) -> Result<DocumentMut> {
        self.contents
            .parse::<DocumentMut>()
            .map_err(|e| self.error(format!("invalid TOML: {}", e)))
    }

    /// Replace the version value in memory.
    pub fn set_version(&mut self, version: &str) -> Result<()> {
        self.contents = match self.format {
            ManifestFormat::PackageJson => self.json_with_version(version)?,
            ManifestFormat::CargoToml => self.toml_with_version(version)?,
        };
        Ok(())
    }

    fn json_with_version(&self, version: &str) -> Result<String> {
        // Validates the field exists at the top level before rewriting text.
        self.json_version()?;

        let span = top_level_version_span(&self.contents)
            .ok_or_else(|| self.error("no top-level \"version\" string"))?;
        let mut contents = String::with_capacity(self.contents.len() + version.len());
        contents.push_str(&self.contents[..span.start]);
        contents.push_str(version);
        contents.push_str(&self.contents[span.end..]);

        let written = serde_json::from_str::<serde_json::Value>(&contents)
            .ok()
            .and_then(|value| value.get("version")?.as_str().map(str::to_string));
        if written.as_deref() != Some(version) {
            return Err(self.error(format!("could not write version {:?}", version)));
        }
        Ok(contents)
    }

    fn toml_with_version(&self, version: &str) -> Result<String> {
        let mut doc = self.toml_document()?;
        let in_package = doc
            .get("package")
            .and_then(|p| p.get("version"))
            .is_some_and(|v| v.is_str());

        let table = if in_package {
            doc.get_mut("package")
        } else {
            doc.get_mut("workspace").and_then(|w| w.get_mut("package"))
        };
        let item = table
            .and_then(|p| p.get_mut("version"))
            .filter(|v| v.is_str())
            .ok_or_else(|| self.error("no literal package version"))?;

        let decor = item.as_value().map(|v| v.decor().clone());
        *item = toml_edit::value(version);
        if let (Some(decor), Some(value)) = (decor, item.as_value_mut()) {
            *value.decor_mut() = decor;
        }
        Ok(doc.to_string())
    }

    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, &self.contents)
            .map_err(|e| self.error(format!("cannot write: {}", e)))
    }

    fn error(&self, reason: impl Into<String>) -> GitSemverError {
        GitSemverError::manifest(&self.path, reason)
    }
}

/// Reconcile `candidate` against the version declared in the manifest at `path`.
pub fn adjusted_version(candidate: &str, path: impl AsRef<Path>) -> Result<String> {
    let manifest = Manifest::load(path)?;
    let declared = manifest.version()?;
    reconcile::reconcile(candidate, &declared)
}

/// Write `version` into the manifest at `path`.
pub fn update_version(path: impl AsRef<Path>, version: &str) -> Result<Manifest> {
    let mut manifest = Manifest::load(path)?;
    manifest.set_version(version)?;
    manifest.save()?;
    tracing::info!(path = %manifest.path().display(), version, "stamped manifest version");
    Ok(manifest)
}
