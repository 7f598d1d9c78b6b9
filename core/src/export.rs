//! Bulk export and import of a workspace.

use crate::models::{system_time_to_datetime, Note};
use crate::storage::{is_hidden_name, is_note_file, NoteRepository, Store};
use crate::{Error, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{info, warn};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
    Tar,
    TarGz,
    Zip,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            "tar" => Ok(ExportFormat::Tar),
            "tar.gz" | "tgz" => Ok(ExportFormat::TarGz),
            "zip" => Ok(ExportFormat::Zip),
            other => Err(Error::Validation(format!("unsupported export format: {}", other))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Json => "json",
            ExportFormat::Tar => "tar",
            ExportFormat::TarGz => "tar.gz",
            ExportFormat::Zip => "zip",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Markdown,
    Json,
}

impl FromStr for ImportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ImportFormat::Markdown),
            "json" => Ok(ImportFormat::Json),
            other => Err(Error::Validation(format!("unsupported import format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// A stored note document found while walking the workspace
struct Document {
    path: PathBuf,
    relative: PathBuf,
}

fn documents(store: &Store) -> Vec<Document> {
    WalkDir::new(store.root())
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !e.file_name().to_str().map(is_hidden_name).unwrap_or(false)
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Export skipped an entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_note_file(e.path()))
        .map(|e| Document {
            relative: store.relative(e.path()).to_path_buf(),
            path: e.into_path(),
        })
        .collect()
}

/// Write every note in the workspace to `destination`. Returns how many
/// notes were exported.
pub fn export_all(store: &Store, format: ExportFormat, destination: &Path) -> Result<usize> {
    let docs = documents(store);
    let count = match format {
        ExportFormat::Markdown => export_markdown(store, &docs, destination)?,
        ExportFormat::Json => export_json(store, &docs, destination)?,
        ExportFormat::Tar => {
            let (file, count) = write_tar(File::create(destination)?, &docs)?;
            file.sync_all()?;
            count
        }
        ExportFormat::TarGz => {
            let encoder = GzEncoder::new(File::create(destination)?, Compression::default());
            let (encoder, count) = write_tar(encoder, &docs)?;
            encoder.finish()?;
            count
        }
        ExportFormat::Zip => export_zip(&docs, destination)?,
    };
    info!("Exported {} notes as {} to {}", count, format, destination.display());
    Ok(count)
}

fn load_for_export(store: &Store, doc: &Document) -> Option<Note> {
    match NoteRepository::load(store, &doc.path) {
        Ok(note) => Some(note),
        Err(err) => {
            warn!("Not exporting {}: {}", doc.path.display(), err);
            None
        }
    }
}

fn markdown_document(note: &Note) -> String {
    let mut out = format!("# {}\n\n", note.title);
    if !note.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n\n", note.tags.join(", ")));
    }
    out.push_str(&format!(
        "Created: {}\nUpdated: {}\n\n",
        note.created_at.to_rfc3339(),
        note.updated_at.to_rfc3339()
    ));
    out.push_str(&note.content);
    out
}

fn export_markdown(store: &Store, docs: &[Document], destination: &Path) -> Result<usize> {
    fs::create_dir_all(destination)?;
    let mut count = 0;
    for doc in docs {
        let Some(note) = load_for_export(store, doc) else { continue };
        let target = destination.join(doc.relative.with_extension("md"));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, markdown_document(&note))?;
        count += 1;
    }
    Ok(count)
}

fn export_json(store: &Store, docs: &[Document], destination: &Path) -> Result<usize> {
    let notes: Vec<Note> = docs.iter().filter_map(|doc| load_for_export(store, doc)).collect();
    fs::write(destination, serde_json::to_vec_pretty(&notes)?)?;
    Ok(notes.len())
}

/// Raw stored bytes of a document that still decodes as a note
fn raw_document(doc: &Document) -> Option<(Note, Vec<u8>)> {
    let data = fs::read(&doc.path).ok()?;
    let note = serde_json::from_slice(&data).ok()?;
    Some((note, data))
}

fn archive_name(relative: &Path) -> String {
    relative.to_string_lossy().replace('\\', "/")
}

fn write_tar<W: Write>(writer: W, docs: &[Document]) -> Result<(W, usize)> {
    let mut builder = tar::Builder::new(writer);
    let mut count = 0;
    for doc in docs {
        let Some((note, data)) = raw_document(doc) else { continue };
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(note.updated_at.timestamp().max(0) as u64);
        header.set_cksum();
        builder.append_data(&mut header, archive_name(&doc.relative), data.as_slice())?;
        count += 1;
    }
    Ok((builder.into_inner()?, count))
}

fn export_zip(docs: &[Document], destination: &Path) -> Result<usize> {
    let mut zip = zip::ZipWriter::new(File::create(destination)?);
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut count = 0;
    for doc in docs {
        let Some((_, data)) = raw_document(doc) else { continue };
        zip.start_file(archive_name(&doc.relative), options)?;
        zip.write_all(&data)?;
        count += 1;
    }
    zip.finish()?;
    Ok(count)
}

/// Import notes from `source` into the workspace root. Notes that fail
/// validation are skipped and counted.
pub fn import_all(store: &Store, format: ImportFormat, source: &Path) -> Result<ImportReport> {
    let candidates = match format {
        ImportFormat::Markdown => markdown_candidates(store, source)?,
        ImportFormat::Json => json_candidates(store, source)?,
    };

    let mut report = ImportReport::default();
    for candidate in candidates {
        let Some(mut note) = candidate else {
            report.skipped += 1;
            continue;
        };
        match NoteRepository::save(store, &mut note) {
            Ok(()) => report.imported += 1,
            Err(err) => {
                warn!("Skipping imported note '{}': {}", note.title, err);
                report.skipped += 1;
            }
        }
    }
    info!(
        "Imported {} notes from {} ({} skipped)",
        report.imported,
        source.display(),
        report.skipped
    );
    Ok(report)
}

/// Split a markdown file into title and body: a leading `# ` line is the
/// title, otherwise the file stem is.
fn parse_markdown(text: &str, stem: &str) -> (String, String) {
    let mut lines = text.lines().peekable();
    let heading = lines
        .peek()
        .and_then(|first| first.strip_prefix("# "))
        .map(|t| t.trim().to_string());
    if heading.is_some() {
        lines.next();
    }
    let body: Vec<&str> = lines.skip_while(|l| l.trim().is_empty()).collect();
    (heading.unwrap_or_else(|| stem.to_string()), body.join("\n"))
}

fn markdown_candidates(store: &Store, source: &Path) -> Result<Vec<Option<Note>>> {
    let mut candidates = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!("Skipping unreadable file {}: {}", path.display(), err);
                candidates.push(None);
                continue;
            }
        };
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let (title, content) = parse_markdown(&text, stem);

        let mut note = store.new_note(title, store.root())?;
        note.content = content;
        if let Some(modified) = entry.metadata().ok().and_then(|m| m.modified().ok()) {
            note.created_at = system_time_to_datetime(modified);
        }
        candidates.push(Some(note));
    }
    Ok(candidates)
}

fn json_candidates(store: &Store, source: &Path) -> Result<Vec<Option<Note>>> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(&fs::read(source)?)?;
    let mut candidates = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<Note>(value) {
            Ok(mut note) => {
                note.path = store.fresh_note_path(store.root())?;
                note.encrypted = store.has_key();
                candidates.push(Some(note));
            }
            Err(err) => {
                warn!("Skipping undecodable note in {}: {}", source.display(), err);
                candidates.push(None);
            }
        }
    }
    Ok(candidates)
}
