//! Comma-separated output for a [`ResultTable`].
//!
//! Fields are quoted only when they contain the delimiter, a double quote or a
//! line break; embedded quotes are doubled. Files are replaced atomically.

use std::borrow::Cow;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::error::BenchError;
use crate::table::ResultTable;

const DELIMITER: char = ',';
const QUOTE: char = '"';

fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r');
    if !needs_quotes {
        return Cow::Borrowed(field);
    }
    Cow::Owned(format!("\"{}\"", field.replace(QUOTE, "\"\"")))
}

/// Writes every row of `table`, header first, one line each.
pub fn write_table<W: Write>(table: &ResultTable, mut writer: W) -> io::Result<()> {
    for row in table.rows() {
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                write!(writer, "{DELIMITER}")?;
            }
            writer.write_all(escape_field(field).as_bytes())?;
        }
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

pub fn to_csv_string(table: &ResultTable) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_table(table, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Temporary file in `dir` that will become `dest` on rename.
///
/// Carries `dest`'s permissions when it already exists; otherwise the mode a
/// plain create would get (0o666 less the umask) instead of tempfile's 0o600.
fn staging_file(dir: &Path, dest: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".hash-speed-test.");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(dest) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(tmp)
}

/// Writes `table` to `path` all-or-nothing.
///
/// Output goes to a temporary file next to `path`, which is renamed over the
/// destination only after a complete, synced write. On error the destination
/// is untouched and the temporary file is removed.
pub fn persist_table(table: &ResultTable, path: &Path) -> Result<(), BenchError> {
    let storage = |source: io::Error| BenchError::Storage {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = staging_file(dir, path).map_err(storage)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write_table(table, &mut writer).map_err(storage)?;
    }
    tmp.as_file().sync_all().map_err(storage)?;
    tmp.persist(path).map_err(|e| storage(e.error))?;

    debug!(path = %path.display(), rows = table.rows().count(), "table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::aggregate;
    use crate::table::ResultRow;
    use crate::Algorithm;
    use tempfile::tempdir;

    fn sample_table() -> ResultTable {
        let mut table = ResultTable::new();
        table
            .append_row(ResultRow::new(Algorithm::Md5, &aggregate(&[7, 10, 20, 30, 40])))
            .unwrap()
            .append_row(ResultRow::new(Algorithm::Sha1, &aggregate(&[7, 1, 2, 3, 4])))
            .unwrap();
        table
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("Run #"), "Run #");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_field("cr\r"), "\"cr\r\"");
    }

    #[test]
    fn test_csv_layout() {
        let text = to_csv_string(&sample_table());
        assert_eq!(
            text,
            "Run #,0,1,2,3,Average (ns)\nMD5,10,20,30,40,25.0\nSHA1,1,2,3,4,2.5\n"
        );
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        assert_eq!(to_csv_string(&ResultTable::new()), "");
    }

    #[test]
    fn test_persist_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        persist_table(&sample_table(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_csv_string(&sample_table()));
        // Only the destination remains; the temp file was renamed.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_persist_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale contents that are longer than the new table\n".repeat(10)).unwrap();

        persist_table(&sample_table(), &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            to_csv_string(&sample_table())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_default_create_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let plain = dir.path().join("plain.txt");

        persist_table(&sample_table(), &path).unwrap();
        fs::write(&plain, "x").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_file_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        persist_table(&sample_table(), &path).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);
        assert_eq!(fs::read_to_string(&path).unwrap(), to_csv_string(&sample_table()));
    }

    #[test]
    fn test_persist_into_missing_directory_fails_cleanly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = persist_table(&sample_table(), &path).unwrap_err();
        match err {
            BenchError::Storage { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
