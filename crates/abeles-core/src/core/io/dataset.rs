use super::IoError;
use std::path::Path;

/// Columns of a reflectivity data file.
///
/// Only `q` is required. The optional columns are present for every row or for none.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub q: Vec<f64>,
    pub r: Option<Vec<f64>>,
    pub dr: Option<Vec<f64>>,
    pub dq: Option<Vec<f64>>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self, IoError> {
        let content = std::fs::read_to_string(path).map_err(|e| IoError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// Parses column text. `label` names the source in error messages.
    ///
    /// Columns are separated by commas, tabs or runs of spaces. Lines starting with
    /// `#` are comments, and a first row that is not numeric is taken as a header.
    pub fn parse(content: &str, label: &str) -> Result<Self, IoError> {
        let delimiter = sniff_delimiter(content);
        let content = if delimiter == b' ' {
            content.replace('\t', " ")
        } else {
            content.to_string()
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(content.as_bytes());

        let mut columns: Option<usize> = None;
        let mut rows: Vec<Vec<f64>> = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|e| IoError::Csv {
                path: label.to_string(),
                source: e,
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
            if fields.is_empty() {
                continue;
            }

            let parsed: Result<Vec<f64>, _> = fields.iter().map(|f| f.parse::<f64>()).collect();
            let values = match parsed {
                Ok(values) => values,
                Err(_) if rows.is_empty() && columns.is_none() => {
                    columns = Some(fields.len().min(4));
                    continue;
                }
                Err(e) => {
                    return Err(IoError::InvalidValue {
                        path: label.to_string(),
                        line,
                        message: e.to_string(),
                    });
                }
            };

            let expected = *columns.get_or_insert(values.len().min(4));
            if values.len() < expected {
                return Err(IoError::InvalidValue {
                    path: label.to_string(),
                    line,
                    message: format!("expected {expected} columns, found {}", values.len()),
                });
            }
            rows.push(values.into_iter().take(expected).collect());
        }

        let columns = columns.unwrap_or(1);
        let column = |k: usize| -> Option<Vec<f64>> {
            (columns > k).then(|| rows.iter().map(|row| row[k]).collect())
        };

        Ok(Self {
            q: column(0).unwrap_or_default(),
            r: column(1),
            dr: column(2),
            dq: column(3),
        })
    }
}

fn sniff_delimiter(content: &str) -> u8 {
    let first = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
        .unwrap_or("");
    if first.contains(',') { b',' } else { b' ' }
}

/// Writes named columns as comma-separated text with a header row.
pub fn write_columns(path: &Path, headers: &[&str], columns: &[&[f64]]) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_columns_to(file, &path.to_string_lossy(), headers, columns)
}

/// As [`write_columns`], to any writer. `label` names the destination in error messages.
pub fn write_columns_to<W: std::io::Write>(
    writer: W,
    label: &str,
    headers: &[&str],
    columns: &[&[f64]],
) -> Result<(), IoError> {
    let csv_error = |e: csv::Error| IoError::Csv {
        path: label.to_string(),
        source: e,
    };

    let rows = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(headers).map_err(csv_error)?;
    for i in 0..rows {
        writer
            .write_record(columns.iter().map(|c| format!("{:e}", c[i])))
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|e| IoError::Io {
        path: label.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parse_reads_whitespace_columns_with_comments() {
        let content = "# reduced data\n0.01   0.9  0.01  0.0005\n0.02\t0.5  0.02  0.001\n\n0.03 0.1 0.01 0.0015\n";
        let data = Dataset::parse(content, "test").unwrap();
        assert_eq!(data.q, vec![0.01, 0.02, 0.03]);
        assert_eq!(data.r, Some(vec![0.9, 0.5, 0.1]));
        assert_eq!(data.dr, Some(vec![0.01, 0.02, 0.01]));
        assert_eq!(data.dq, Some(vec![0.0005, 0.001, 0.0015]));
    }

    #[test]
    fn parse_reads_comma_columns_with_header() {
        let content = "q,r\n0.01,1.0\n0.02, 0.25\n";
        let data = Dataset::parse(content, "test").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.q, vec![0.01, 0.02]);
        assert_eq!(data.r, Some(vec![1.0, 0.25]));
        assert_eq!(data.dr, None);
        assert_eq!(data.dq, None);
    }

    #[test]
    fn parse_reads_single_q_column() {
        let data = Dataset::parse("0.01\n0.02\n0.05\n", "test").unwrap();
        assert_eq!(data.q, vec![0.01, 0.02, 0.05]);
        assert!(data.r.is_none());
    }

    #[test]
    fn parse_ignores_columns_beyond_the_fourth() {
        let data = Dataset::parse("1 2 3 4 5\n6 7 8 9 10\n", "test").unwrap();
        assert_eq!(data.dq, Some(vec![4.0, 9.0]));
    }

    #[test]
    fn parse_fails_for_short_row() {
        let result = Dataset::parse("0.01 1.0 0.1\n0.02 0.5\n", "test");
        assert!(matches!(result, Err(IoError::InvalidValue { .. })));
    }

    #[test]
    fn parse_fails_for_non_numeric_value_after_data() {
        let result = Dataset::parse("0.01 1.0\n0.02 abc\n", "test");
        assert!(matches!(result, Err(IoError::InvalidValue { .. })));
    }

    #[test]
    fn parse_empty_input_gives_empty_dataset() {
        let data = Dataset::parse("# nothing here\n", "test").unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = Dataset::load(&dir.path().join("missing.dat"));
        assert!(matches!(result, Err(IoError::Io { .. })));
    }

    #[test]
    fn columns_are_truncated_to_the_shortest() {
        let z: &[f64] = &[1.0, 2.0, 3.0];
        let sld: &[f64] = &[0.5, 1.5];
        let mut buffer = Vec::new();
        write_columns_to(&mut buffer, "buffer", &["z", "sld"], &[z, sld]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "z,sld\n1e0,5e-1\n2e0,1.5e0\n");
    }

    #[test]
    fn written_columns_can_be_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let q = [0.01, 0.02, 0.03];
        let r = [1.0, 1.25e-3, 7.5e-7];
        write_columns(&path, &["q", "r"], &[&q[..], &r[..]]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("q,r\n"));

        let data = Dataset::load(&path).unwrap();
        assert_eq!(data.q, q.to_vec());
        assert_eq!(data.r, Some(r.to_vec()));
    }
}
