/*!
# CSV Reading

Streams a file line by line through [`RecordDecoder`], applies scalar
coercion, and returns every row in file order. Callers get either the full
result or an error; rows accumulated before a failure are dropped.
*/

use crate::{
    codec::RecordDecoder,
    coercion::CoercionPolicy,
    errors::{CsvError, CsvResult},
    file_name,
    values::{ArrayRow, ObjectRow, Row},
};
use std::path::Path;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt as _, BufReader},
};
use tracing::{debug, error, info};

/// Options for [`read_csv_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Drop the first record. Implied when `as_object` is set, since the
    /// first record then supplies the field names.
    pub skip_header: bool,

    /// Map each record onto the header's field names
    pub as_object: bool,

    /// Ignore empty or whitespace-only lines instead of yielding a single field
    pub skip_empty_lines: bool,

    /// How raw tokens become values
    pub coercion: CoercionPolicy,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            skip_header: false,
            as_object: false,
            skip_empty_lines: true,
            coercion: CoercionPolicy::default(),
        }
    }
}

impl ReadOptions {
    pub fn new(skip_header: bool, as_object: bool) -> Self {
        Self {
            skip_header,
            as_object,
            ..Default::default()
        }
    }

    pub fn with_skip_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    pub fn with_as_object(mut self, as_object: bool) -> Self {
        self.as_object = as_object;
        self
    }

    pub fn with_skip_empty_lines(mut self, skip_empty_lines: bool) -> Self {
        self.skip_empty_lines = skip_empty_lines;
        self
    }

    pub fn with_coercion(mut self, coercion: CoercionPolicy) -> Self {
        self.coercion = coercion;
        self
    }
}

// ================================================================================================
// Public API
// ================================================================================================

/// Read a CSV file into rows using the default coercion policy
pub async fn read_csv<P: AsRef<Path>>(
    path: P,
    skip_header: bool,
    as_object: bool,
) -> CsvResult<Vec<Row>> {
    read_csv_with(path, &ReadOptions::new(skip_header, as_object)).await
}

/// Read a CSV file into rows
pub async fn read_csv_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> CsvResult<Vec<Row>> {
    let path = path.as_ref();
    debug!(?options, "Reading CSV file {}", path.display());

    match read_rows(path, options).await {
        Ok(rows) => {
            info!("CSV file {} is read with {} rows", file_name(path), rows.len());
            Ok(rows)
        }
        Err(err) => {
            error!("Error reading CSV file {}: {}", file_name(path), err);
            Err(err)
        }
    }
}

/// Read a CSV file as positional rows (`as_object` is ignored)
pub async fn read_csv_arrays<P: AsRef<Path>>(
    path: P,
    options: &ReadOptions,
) -> CsvResult<Vec<ArrayRow>> {
    let rows = read_csv_with(path, &options.with_as_object(false)).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match row {
            Row::Array(fields) => Some(fields),
            Row::Object(_) => None,
        })
        .collect())
}

/// Read a CSV file as rows keyed by the first record's field names
pub async fn read_csv_objects<P: AsRef<Path>>(
    path: P,
    options: &ReadOptions,
) -> CsvResult<Vec<ObjectRow>> {
    let rows = read_csv_with(path, &options.with_as_object(true)).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match row {
            Row::Object(fields) => Some(fields),
            Row::Array(_) => None,
        })
        .collect())
}

// ================================================================================================
// Streaming
// ================================================================================================

async fn read_rows(path: &Path, options: &ReadOptions) -> CsvResult<Vec<Row>> {
    let file = File::open(path).await?;
    let mut reader = BufReader::new(file);
    let mut decoder = RecordDecoder::new(options.skip_empty_lines);
    let mut assembler = RowAssembler::new(options);
    let mut rows = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        if let Some(record) = decoder.decode_line(&line)? {
            if let Some(row) = assembler.push(record, decoder.records())? {
                rows.push(row);
            }
        }
    }
    decoder.finish()?;

    Ok(rows)
}

/// Turns raw records into rows according to the header flags
struct RowAssembler<'a> {
    options: &'a ReadOptions,
    header: Option<Vec<String>>,
    seen_first: bool,
}

impl<'a> RowAssembler<'a> {
    fn new(options: &'a ReadOptions) -> Self {
        Self {
            options,
            header: None,
            seen_first: false,
        }
    }

    fn push(&mut self, record: Vec<String>, record_no: usize) -> CsvResult<Option<Row>> {
        let first = !self.seen_first;
        self.seen_first = true;
        let options = self.options;
        let coercion = &options.coercion;

        if !options.as_object {
            if first && options.skip_header {
                return Ok(None);
            }
            return Ok(Some(Row::Array(
                record.iter().map(|field| coercion.coerce(field)).collect(),
            )));
        }

        let Some(header) = &self.header else {
            self.header = Some(
                record
                    .into_iter()
                    .map(|name| {
                        if coercion.trim {
                            name.trim().to_string()
                        } else {
                            name
                        }
                    })
                    .collect(),
            );
            return Ok(None);
        };

        if record.len() != header.len() {
            return Err(CsvError::parse(
                record_no,
                format!(
                    "expected {} fields to match the header, found {}",
                    header.len(),
                    record.len()
                ),
            ));
        }

        Ok(Some(Row::Object(
            header
                .iter()
                .cloned()
                .zip(record.iter().map(|field| coercion.coerce(field)))
                .collect(),
        )))
    }
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::CsvValue;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn object(pairs: &[(&str, CsvValue)]) -> ObjectRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_read_as_arrays() {
        let file = csv_file("name,age\nAlice,30\n");
        let rows = read_csv(file.path(), false, false).await.unwrap();

        assert_eq!(
            rows,
            vec![
                Row::Array(vec![CsvValue::from("name"), CsvValue::from("age")]),
                Row::Array(vec![CsvValue::from("Alice"), CsvValue::from(30)]),
            ]
        );
    }

    #[tokio::test]
    async fn test_read_skip_header_arrays() {
        let file = csv_file("name,age\nAlice,30\nBob,25\n");
        let rows = read_csv(file.path(), true, false).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            Row::Array(vec![CsvValue::from("Alice"), CsvValue::from(30)])
        );
    }

    #[tokio::test]
    async fn test_read_as_objects() {
        let file = csv_file(" name , active\n Alice ,true\n");
        let rows = read_csv(file.path(), false, true).await.unwrap();

        assert_eq!(
            rows,
            vec![Row::Object(object(&[
                ("name", CsvValue::from("Alice")),
                ("active", CsvValue::from(true)),
            ]))]
        );
    }

    #[tokio::test]
    async fn test_skip_header_with_objects_consumes_only_header() {
        let file = csv_file("a,b\n1,2\n3,4\n");
        let with_skip = read_csv(file.path(), true, true).await.unwrap();
        let without_skip = read_csv(file.path(), false, true).await.unwrap();

        assert_eq!(with_skip.len(), 2);
        assert_eq!(with_skip, without_skip);
    }

    #[tokio::test]
    async fn test_field_count_mismatch_is_parse_error() {
        let file = csv_file("a,b\n1,2\n3\n");
        let err = read_csv(file.path(), false, true).await.unwrap_err();

        match err {
            CsvError::Parse { record, message } => {
                assert_eq!(record, 3);
                assert!(message.contains("expected 2 fields"));
            }
            other => panic!("Expected parse error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ragged_rows_allowed_for_arrays() {
        let file = csv_file("a,b\n1\n");
        let rows = read_csv(file.path(), false, false).await.unwrap();
        assert_eq!(rows[1], Row::Array(vec![CsvValue::from(1)]));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_csv(dir.path().join("missing.csv"), false, false)
            .await
            .unwrap_err();
        assert!(matches!(err, CsvError::Io(_)));
    }

    #[tokio::test]
    async fn test_unterminated_quote_discards_partial_rows() {
        let file = csv_file("a,b\n1,2\n\"open,3\n");
        let result = read_csv(file.path(), false, false).await;
        assert!(matches!(result, Err(CsvError::Parse { record: 3, .. })));
    }

    #[tokio::test]
    async fn test_read_with_custom_options() {
        let file = csv_file("code,flag\n007,true\n\n");
        let options = ReadOptions::default()
            .with_skip_header(true)
            .with_skip_empty_lines(false)
            .with_coercion(CoercionPolicy {
                parse_booleans: false,
                preserve_leading_zeros: true,
                ..Default::default()
            });

        let rows = read_csv_arrays(file.path(), &options).await.unwrap();
        assert_eq!(
            rows,
            vec![
                vec![CsvValue::from("007"), CsvValue::from("true")],
                vec![CsvValue::from("")],
            ]
        );
    }

    #[tokio::test]
    async fn test_read_csv_objects_helper() {
        let file = csv_file("id,note\n1,\"multi\nline\"\n");
        let rows = read_csv_objects(file.path(), &ReadOptions::default())
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![object(&[
                ("id", CsvValue::from(1)),
                ("note", CsvValue::from("multi\nline")),
            ])]
        );
    }

    #[tokio::test]
    async fn test_whitespace_only_trailing_line_is_skipped() {
        let file = csv_file("a,b\n1,2\n   \n");

        let objects = read_csv(file.path(), false, true).await.unwrap();
        assert_eq!(
            objects,
            vec![Row::Object(object(&[
                ("a", CsvValue::from(1)),
                ("b", CsvValue::from(2)),
            ]))]
        );

        let arrays = read_csv(file.path(), false, false).await.unwrap();
        assert_eq!(arrays.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_file() {
        let file = csv_file("");
        assert!(read_csv(file.path(), false, true).await.unwrap().is_empty());
        assert!(read_csv(file.path(), true, false).await.unwrap().is_empty());
    }
}
