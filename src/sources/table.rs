//! Delimited extract reader
//!
//! Every statistics office extract goes through the same steps: decode the
//! bytes from the file's declared encoding, skip any title lines above the
//! header, tokenize with the file's delimiter, then hand the rows to a
//! country-specific normalizer. Quirks shared by more than one source
//! (forward-filled label columns, one column per year, missing-value markers)
//! are handled here.

use std::path::Path;

use encoding_rs::Encoding;
use itertools::Itertools;

use crate::config::SourceFile;
use crate::error::util::safe_read_bytes;
use crate::error::{IssueLog, PipelineError, Result, SoftIssue};
use crate::sources::names::NameCanonicalizer;

/// Cell contents statistics offices use for "no value"
pub const MISSING_VALUE_MARKERS: [&str; 3] = ["", "..", "-"];

/// A tokenized extract: header cells and data rows, all trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Name used in error messages
    pub source_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One value cell of a wide table after reshaping to long format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongRecord {
    pub municipality: String,
    pub age_label: Option<String>,
    pub year: i32,
    pub value: i64,
}

/// Decode raw bytes using a WHATWG encoding label
///
/// A leading byte order mark is removed. Bytes that are not valid in the
/// declared encoding make the whole extract unusable.
pub fn decode(bytes: &[u8], encoding_label: &str, source_name: &str) -> Result<String> {
    let encoding = Encoding::for_label(encoding_label.trim().as_bytes()).ok_or_else(|| {
        PipelineError::source_format(source_name, format!("unknown encoding '{encoding_label}'"))
    })?;

    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(PipelineError::source_format(
            source_name,
            format!("content is not valid {}", encoding.name()),
        ));
    }
    Ok(text.into_owned())
}

/// Read, decode and tokenize an extract from disk
pub fn read_table(path: &Path, file: &SourceFile, source_name: &str) -> Result<RawTable> {
    let bytes = safe_read_bytes(path, source_name)?;
    let text = decode(&bytes, &file.encoding, source_name)?;
    let delimiter = file.delimiter_byte(source_name)?;
    RawTable::parse(&text, delimiter, file.header_row, source_name)
}

impl RawTable {
    /// Tokenize decoded text
    ///
    /// Lines above `header_row` are discarded. Rows are padded to the header
    /// width so short rows read as empty cells. With a space delimiter, runs of
    /// spaces outside quotes separate one pair of cells.
    pub fn parse(text: &str, delimiter: u8, header_row: usize, source_name: &str) -> Result<Self> {
        let text = if delimiter == b' ' {
            collapse_spaces(text)
        } else {
            text.to_string()
        };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = reader.records().skip(header_row);

        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(|cell| cell.trim().to_string()).collect(),
            None => {
                return Err(PipelineError::source_format(
                    source_name,
                    format!("no header found on line {}", header_row + 1),
                ));
            }
        };

        let width = headers.len();
        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|cell| cell.trim().to_string()).collect();
            row.resize(width.max(row.len()), String::new());
            rows.push(row);
        }

        log::debug!("{source_name}: {} columns, {} rows", width, rows.len());

        Ok(Self {
            source_name: source_name.to_string(),
            headers,
            rows,
        })
    }

    /// Index of a named column (case-insensitive)
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                PipelineError::source_format(&self.source_name, format!("missing column '{name}'"))
            })
    }

    /// Ensure a positional column exists
    pub fn require_width(&self, columns: usize) -> Result<()> {
        if self.headers.len() < columns {
            return Err(PipelineError::source_format(
                &self.source_name,
                format!("expected at least {columns} columns, found {}", self.headers.len()),
            ));
        }
        Ok(())
    }

    /// Columns whose header is a year, skipping the given label columns
    ///
    /// Any other header is ignored with a warning.
    #[must_use]
    pub fn year_columns(&self, label_columns: &[usize]) -> Vec<(usize, i32)> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !label_columns.contains(idx))
            .filter_map(|(idx, header)| match header.parse::<i32>() {
                Ok(year) => Some((idx, year)),
                Err(_) => {
                    log::warn!(
                        "{}: ignoring non-year column '{}'",
                        self.source_name,
                        header
                    );
                    None
                }
            })
            .collect()
    }

    /// Fill blank cells of `column` from the closest non-blank cell above
    ///
    /// Wholly blank rows neither receive nor provide a value. A blank cell
    /// before any non-blank one breaks the convention and is an error.
    pub fn forward_fill(&mut self, column: usize) -> Result<()> {
        let mut last: Option<String> = None;
        for (line, row) in self.rows.iter_mut().enumerate() {
            if is_blank_row(row) {
                continue;
            }
            let Some(cell) = row.get_mut(column) else {
                continue;
            };
            if cell.is_empty() {
                match &last {
                    Some(value) => cell.clone_from(value),
                    None => {
                        return Err(PipelineError::source_format(
                            &self.source_name,
                            format!(
                                "row {} has a blank label in column {} with no earlier value to inherit",
                                line + 1,
                                column + 1
                            ),
                        ));
                    }
                }
            } else {
                last = Some(cell.clone());
            }
        }
        Ok(())
    }

    /// Remove rows in which every cell is empty
    pub fn drop_blank_rows(&mut self) {
        let before = self.rows.len();
        self.rows.retain(|row| !is_blank_row(row));
        let dropped = before - self.rows.len();
        if dropped > 0 {
            log::debug!("{}: dropped {dropped} blank rows", self.source_name);
        }
    }

    /// Reshape a table with one column per year into one record per value cell
    ///
    /// Municipality names go through `names`. Missing-value cells are skipped and
    /// counted.
    pub fn melt_years(
        &self,
        municipality_column: usize,
        age_column: usize,
        names: &NameCanonicalizer,
        issues: &mut IssueLog,
    ) -> Result<Vec<LongRecord>> {
        let years = self.year_columns(&[municipality_column, age_column]);
        if years.is_empty() {
            return Err(PipelineError::source_format(
                &self.source_name,
                "no year columns found",
            ));
        }

        let mut records = Vec::with_capacity(self.rows.len() * years.len());
        for row in &self.rows {
            let municipality = names.canonical(&row[municipality_column]);
            let age_label = non_empty(&row[age_column]);

            for &(idx, year) in &years {
                let Some(value) = parse_count(&row[idx], &self.source_name, issues)? else {
                    continue;
                };
                records.push(LongRecord {
                    municipality: municipality.clone(),
                    age_label: age_label.clone(),
                    year,
                    value,
                });
            }
        }
        Ok(records)
    }
}

/// Squeeze unquoted runs of spaces to one and strip them at line ends
fn collapse_spaces(text: &str) -> String {
    text.lines()
        .map(|line| {
            let mut out = String::with_capacity(line.len());
            let mut quoted = false;
            for c in line.trim_matches([' ', '\r']).chars() {
                if c == '"' {
                    quoted = !quoted;
                } else if c == ' ' && !quoted && out.ends_with(' ') {
                    continue;
                }
                out.push(c);
            }
            out
        })
        .join("\n")
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(String::is_empty)
}

/// `None` for an empty cell
#[must_use]
pub fn non_empty(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}

/// Parse a count cell; missing-value markers yield `None`
pub fn parse_count(cell: &str, source_name: &str, issues: &mut IssueLog) -> Result<Option<i64>> {
    let cell = cell.trim();
    if MISSING_VALUE_MARKERS.contains(&cell) {
        issues.record(SoftIssue::MissingValue {
            source_name: source_name.to_string(),
        });
        return Ok(None);
    }
    cell.parse::<i64>().map(Some).map_err(|_| {
        PipelineError::source_format(source_name, format!("unparseable value '{cell}'"))
    })
}

/// Parse a year cell
pub fn parse_year(cell: &str, source_name: &str) -> Result<i32> {
    cell.trim().parse::<i32>().map_err(|_| {
        PipelineError::source_format(source_name, format!("unparseable year '{cell}'"))
    })
}
