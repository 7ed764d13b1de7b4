//! JSONL corpus import/export
//!
//! A corpus file holds one entity per line in its wire shape:
//!
//! ```text
//! {"type":"tasks","id":1,"name":"Fix payment bug","status":"pending","tags":["bug"]}
//! {"type":"contacts","id":1,"name":"Ada","email":"ada@example.com"}
//! ```
//!
//! Blank lines are ignored. Output is written in corpus order so exports
//! diff cleanly.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::domain::search::{Corpus, Entity};
use crate::error::{Error, Result};

/// Read a corpus from JSONL
///
/// Fails on the first malformed line or duplicate `(type, id)`, naming the
/// line number.
pub fn read_corpus_jsonl<R: BufRead>(reader: R) -> Result<Corpus> {
    let mut corpus = Corpus::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let entity: Entity = serde_json::from_str(&line).map_err(|e| Error::CorpusLine {
            line: line_no,
            message: e.to_string(),
        })?;
        let key = entity.key();
        if corpus.insert(entity).is_some() {
            return Err(Error::CorpusLine {
                line: line_no,
                message: format!("duplicate entity {}#{}", key.0, key.1),
            });
        }
    }

    Ok(corpus)
}

/// Load a corpus file from disk
pub fn load_corpus_jsonl(path: &Path) -> Result<Corpus> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::CorpusNotFound(path.display().to_string()),
        _ => Error::Io(e),
    })?;

    let corpus = read_corpus_jsonl(BufReader::new(file))?;
    info!(
        path = %path.display(),
        entities = corpus.len(),
        types = corpus.type_counts().len(),
        "Corpus loaded"
    );
    Ok(corpus)
}

/// Write entities as JSONL
pub fn write_corpus<W: Write>(writer: W, corpus: &Corpus) -> Result<usize> {
    let mut writer = BufWriter::new(writer);
    let mut written = 0;
    for entity in corpus.iter() {
        serde_json::to_writer(&mut writer, entity)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Write a corpus file to disk, replacing any existing file
pub fn write_corpus_jsonl(path: &Path, corpus: &Corpus) -> Result<usize> {
    let written = write_corpus(File::create(path)?, corpus)?;
    info!(path = %path.display(), entities = written, "Corpus exported");
    Ok(written)
}
