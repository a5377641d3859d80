//! Directory import: walk a tree, turn each supported file into a
//! catalogue entry. Lives outside the engine: every discovered file goes
//! through the ordinary `add_item` path and gets the same uniqueness and
//! indexing treatment as a hand-entered item.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::CarrelError;
use crate::library::Library;
use crate::model::{Category, Item};

static SUPPORTED_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [".txt", ".md", ".pdf", ".mp3", ".wav", ".mp4", ".avi", ".mov"]
        .into_iter()
        .collect()
});

#[derive(Debug, Default)]
pub struct ImportReport {
    /// Supported files encountered.
    pub total: usize,
    pub imported: usize,
    /// Files skipped because their path is already catalogued.
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// Recursively import every supported file under `directory`. When
/// `extensions` is empty the built-in table applies.
pub fn import_directory(
    library: &mut Library,
    directory: &Path,
    extensions: &[String],
) -> ImportReport {
    let mut report = ImportReport::default();
    walk(library, directory, extensions, &mut report);
    report
}

fn walk(library: &mut Library, dir: &Path, extensions: &[String], report: &mut ImportReport) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            report
                .errors
                .push(format!("Cannot access {}: {}", dir.display(), err));
            return;
        }
    };

    for entry in entries {
        let Ok(entry) = entry else {
            report
                .errors
                .push(format!("Cannot read an entry under {}", dir.display()));
            continue;
        };
        let path = entry.path();
        if path.is_dir() {
            walk(library, &path, extensions, report);
        } else if path.is_file() {
            let ext = file_extension(&path);
            if !is_supported(&ext, extensions) {
                continue;
            }
            report.total += 1;
            match import_file(library, &path, &ext) {
                Ok(()) => report.imported += 1,
                Err(CarrelError::DuplicatePath(_)) => report.skipped += 1,
                Err(err) => report
                    .errors
                    .push(format!("{}: {}", path.display(), err)),
            }
        }
    }
}

fn import_file(library: &mut Library, path: &Path, ext: &str) -> crate::error::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(file_name);

    let category = category_for_extension(ext);
    let absolute = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned();

    let mut item = Item::new(title, category, Some(absolute));
    if let Some(tag) = ext.strip_prefix('.') {
        item.add_tag(tag);
    }
    item.add_tag(category.key());

    library.add_item(item)?;
    Ok(())
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

fn is_supported(ext: &str, extensions: &[String]) -> bool {
    if ext.is_empty() {
        return false;
    }
    if extensions.is_empty() {
        SUPPORTED_EXTENSIONS.contains(ext)
    } else {
        extensions.iter().any(|e| e == ext)
    }
}

fn category_for_extension(ext: &str) -> Category {
    match ext {
        ".pdf" => Category::Reference,
        ".mp3" | ".wav" => Category::AudioRecording,
        ".mp4" | ".avi" | ".mov" => Category::VideoTutorial,
        ".txt" | ".md" => Category::LectureNotes,
        _ => Category::Other,
    }
}
