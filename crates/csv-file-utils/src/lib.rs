/*!
# CSV File Utilities

Read a CSV file into rows and write rows back out, without pulling in a full
CSV engine.

## Reading

[`read_csv`] streams a file and returns every record in file order, either as
positional rows or, with `as_object`, keyed by the first record's field names.
Each field is trimmed and coerced: `true`/`false` become booleans, numeric
literals become numbers, everything else stays a string (see
[`CoercionPolicy`]).

## Writing

[`write_csv_array`] writes positional rows with no header line.
[`write_csv_objects`] writes a header line from each [`HeaderField`]'s `title`
and then one line per row, looking values up by `id`. Both fail with
[`CsvError::FileExists`] instead of replacing an existing file unless
`overwrite` is set.

## Usage

```rust,no_run
use csv_file_utils::{read_csv, write_csv_objects, CsvResult, HeaderField, Row};

async fn example() -> CsvResult<()> {
    // [{name: "Alice", age: 30}, {name: "Bob", age: 25}]
    let people = read_csv("people.csv", false, true).await?;

    let header = vec![HeaderField::new("name", "Name"), HeaderField::new("age", "Age")];
    let rows: Vec<_> = people.iter().filter_map(Row::as_object).cloned().collect();
    write_csv_objects("people_copy.csv", &header, &rows, false).await?;

    Ok(())
}
```

## Logging

Progress and failures are reported through `tracing`; install a subscriber to
see them.
*/

pub mod codec;
pub mod coercion;
pub mod errors;
pub mod reader;
pub mod values;
pub mod writer;

use std::borrow::Cow;
use std::path::Path;

// Re-export main types for convenience
pub use coercion::CoercionPolicy;
pub use errors::{CsvError, CsvResult};
pub use reader::{read_csv, read_csv_arrays, read_csv_objects, read_csv_with, ReadOptions};
pub use values::{ArrayRow, CsvValue, HeaderField, ObjectRow, Row};
pub use writer::{
    write_csv_array, write_csv_array_with, write_csv_objects, write_csv_objects_with, WriteOptions,
};

/// Last path component, for log lines
pub(crate) fn file_name(path: &Path) -> Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}
