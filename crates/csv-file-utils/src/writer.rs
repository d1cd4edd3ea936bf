/*!
# CSV Writing

Array-form and object-form writers. Both refuse to touch an existing file
unless `overwrite` is set; the existence check and the write are not atomic
with respect to other processes.
*/

use crate::{
    codec::encode_record,
    errors::{CsvError, CsvResult},
    file_name,
    values::{ArrayRow, HeaderField, ObjectRow},
};
use std::path::Path;
use tokio::{
    fs::{self, File},
    io::{AsyncWriteExt as _, BufWriter},
};
use tracing::{debug, error, info};

/// Options for the `*_with` writers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Replace an existing destination file
    pub overwrite: bool,

    /// Quote every field, not only those that need it
    pub always_quote: bool,
}

impl WriteOptions {
    pub fn new(overwrite: bool) -> Self {
        Self {
            overwrite,
            ..Default::default()
        }
    }

    pub fn with_always_quote(mut self, always_quote: bool) -> Self {
        self.always_quote = always_quote;
        self
    }
}

// ================================================================================================
// Array Form
// ================================================================================================

/// Write positional rows, no header line
pub async fn write_csv_array<P: AsRef<Path>>(
    path: P,
    rows: &[ArrayRow],
    overwrite: bool,
) -> CsvResult<()> {
    write_csv_array_with(path, rows, &WriteOptions::new(overwrite)).await
}

pub async fn write_csv_array_with<P: AsRef<Path>>(
    path: P,
    rows: &[ArrayRow],
    options: &WriteOptions,
) -> CsvResult<()> {
    let path = path.as_ref();
    debug!("Writing {} records to {}", rows.len(), path.display());

    let result = write_array(path, rows, options).await;
    log_outcome(path, rows.len(), result)
}

async fn write_array(path: &Path, rows: &[ArrayRow], options: &WriteOptions) -> CsvResult<()> {
    ensure_writable(path, options.overwrite).await?;

    let lines = rows.iter().map(|row| {
        encode_record(row.iter().map(|value| value.to_string()), options.always_quote)
    });
    persist(path, lines).await
}

// ================================================================================================
// Object Form
// ================================================================================================

/// Write keyed rows under a header line built from each field's `title`
pub async fn write_csv_objects<P: AsRef<Path>>(
    path: P,
    header: &[HeaderField],
    rows: &[ObjectRow],
    overwrite: bool,
) -> CsvResult<()> {
    write_csv_objects_with(path, header, rows, &WriteOptions::new(overwrite)).await
}

pub async fn write_csv_objects_with<P: AsRef<Path>>(
    path: P,
    header: &[HeaderField],
    rows: &[ObjectRow],
    options: &WriteOptions,
) -> CsvResult<()> {
    let path = path.as_ref();
    debug!(
        "Writing {} records with {} columns to {}",
        rows.len(),
        header.len(),
        path.display()
    );

    let result = write_objects(path, header, rows, options).await;
    log_outcome(path, rows.len(), result)
}

async fn write_objects(
    path: &Path,
    header: &[HeaderField],
    rows: &[ObjectRow],
    options: &WriteOptions,
) -> CsvResult<()> {
    ensure_writable(path, options.overwrite).await?;

    let title_line = encode_record(header.iter().map(|field| &field.title), options.always_quote);

    // Absent ids become empty fields
    let lines = rows.iter().map(|row| {
        encode_record(
            header.iter().map(|field| {
                row.get(&field.id)
                    .map(|value| value.to_string())
                    .unwrap_or_default()
            }),
            options.always_quote,
        )
    });
    persist(path, std::iter::once(title_line).chain(lines)).await
}

// ================================================================================================
// Shared
// ================================================================================================

async fn ensure_writable(path: &Path, overwrite: bool) -> CsvResult<()> {
    if !overwrite && fs::try_exists(path).await? {
        return Err(CsvError::FileExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

async fn persist<I>(path: &Path, lines: I) -> CsvResult<()>
where
    I: IntoIterator<Item = String>,
{
    let file = File::create(path).await?;
    let mut writer = BufWriter::new(file);

    for line in lines {
        writer.write_all(line.as_bytes()).await?;
    }
    writer.flush().await?;

    Ok(())
}

fn log_outcome(path: &Path, row_count: usize, result: CsvResult<()>) -> CsvResult<()> {
    match &result {
        Ok(()) => info!(
            "CSV file ({}) successfully created with {} rows",
            file_name(path),
            row_count
        ),
        Err(err) => error!("Create CSV error for {}: {}", file_name(path), err),
    }
    result
}

// ================================================================================================
// Tests
// ================================================================================================
