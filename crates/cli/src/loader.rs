//! Loading settings and descriptor files

use adminkit_core::AdminSettings;
use adminkit_meta::{EntityRegistry, RegistryBuilder, TypeDescriptor};
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Load settings from a file, or use defaults when no path is given
pub fn load_settings(path: Option<&Path>) -> Result<AdminSettings> {
    match path {
        Some(path) => AdminSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(AdminSettings::default()),
    }
}

/// Collect descriptor files: the file itself, or every `.json` file under a directory
pub fn descriptor_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("Descriptor path not found: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read {}", path.display()))?;
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Load every descriptor found at a path
pub fn load_descriptors(path: &Path) -> Result<Vec<TypeDescriptor>> {
    let mut descriptors = Vec::new();
    for file in descriptor_files(path)? {
        let loaded = TypeDescriptor::load(&file)?;
        debug!("Loaded {} descriptors from {}", loaded.len(), file.display());
        descriptors.extend(loaded);
    }
    if descriptors.is_empty() {
        bail!("No descriptors found in {}", path.display());
    }
    info!("Loaded {} descriptors", descriptors.len());
    Ok(descriptors)
}

/// Build a registry from the descriptors at `path` (or the settings' descriptor directory)
pub fn build_registry(settings: &AdminSettings, path: Option<&Path>) -> Result<EntityRegistry> {
    let Some(path) = path.or(settings.descriptor_dir.as_deref()) else {
        bail!("No descriptor path given and no descriptor_dir configured");
    };
    let descriptors = load_descriptors(path)?;
    let registry = RegistryBuilder::new()
        .with_settings(settings.clone())
        .register_all(descriptors)
        .build()
        .context("Failed to build entity metadata")?;
    Ok(registry)
}
