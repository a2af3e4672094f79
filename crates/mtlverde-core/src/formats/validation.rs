use std::path::Path;

/// Component files missing next to `base_path`, as `.ext` strings
pub fn missing_components(base_path: &Path, extensions: &[&str]) -> Vec<String> {
    extensions
        .iter()
        .filter(|ext| !base_path.with_extension(ext).exists())
        .map(|ext| format!(".{}", ext))
        .collect()
}
