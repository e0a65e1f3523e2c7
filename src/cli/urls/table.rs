//! CSV table of legacy urls.
//!
//! Every column of the input is kept in its original order. The existence
//! flag is appended as a new column, or written over an existing column of
//! the same name.

use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::StringRecord;

/// One row of the table.
#[derive(Debug, Clone)]
pub struct UrlRecord {
    /// All original fields, in column order.
    pub row: StringRecord,
    /// Value of the url column (empty when the row is short).
    pub url: String,
    /// Whether the page exists on the target site.
    pub exists: bool,
}

/// A loaded table, ready to be annotated and written back.
#[derive(Debug)]
pub struct UrlTable {
    headers: StringRecord,
    flag_index: Option<usize>,
    pub records: Vec<UrlRecord>,
}

impl UrlTable {
    /// Read a table from disk.
    pub fn load(path: &Path, url_column: &str, flag_column: &str) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("cannot open url table `{}`", path.display()))?;
        Self::from_reader(reader, url_column, flag_column)
            .with_context(|| format!("cannot parse url table `{}`", path.display()))
    }

    fn from_reader<R: std::io::Read>(
        mut reader: csv::Reader<R>,
        url_column: &str,
        flag_column: &str,
    ) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let Some(url_index) = headers.iter().position(|h| h == url_column) else {
            bail!("missing column `{url_column}`");
        };
        let flag_index = headers.iter().position(|h| h == flag_column);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let url = row.get(url_index).unwrap_or_default().to_string();
            records.push(UrlRecord {
                row,
                url,
                exists: false,
            });
        }

        Ok(Self {
            headers,
            flag_index,
            records,
        })
    }

    /// Parse a table from an in-memory string.
    #[cfg(test)]
    pub fn parse(content: &str, url_column: &str, flag_column: &str) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        Self::from_reader(reader, url_column, flag_column)
    }

    /// Write the table, with the flag column, to `path`.
    pub fn save(&self, path: &Path, flag_column: &str) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("cannot write url table `{}`", path.display()))?;
        self.write_to(&mut writer, flag_column)?;
        writer
            .flush()
            .with_context(|| format!("cannot write url table `{}`", path.display()))
    }

    fn write_to<W: std::io::Write>(
        &self,
        writer: &mut csv::Writer<W>,
        flag_column: &str,
    ) -> Result<()> {
        let flag_index = self.flag_index.unwrap_or(self.headers.len());

        writer.write_record(&with_field(&self.headers, flag_index, flag_column))?;
        for record in &self.records {
            writer.write_record(&with_field(
                &record.row,
                flag_index,
                flag_label(record.exists),
            ))?;
        }
        Ok(())
    }

    /// Render the annotated table as a string.
    #[cfg(test)]
    pub fn to_csv_string(&self, flag_column: &str) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        self.write_to(&mut writer, flag_column)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("cannot flush url table: {}", e.error()))?;
        Ok(String::from_utf8(bytes)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[inline]
const fn flag_label(exists: bool) -> &'static str {
    if exists { "True" } else { "False" }
}

/// Copy `row`, setting the field at `index` to `value`. Short rows are padded.
fn with_field(row: &StringRecord, index: usize, value: &str) -> StringRecord {
    let fields = row.len().max(index + 1);
    let mut out = StringRecord::with_capacity(row.as_slice().len() + value.len(), fields);
    for i in 0..fields {
        if i == index {
            out.push_field(value);
        } else {
            out.push_field(row.get(i).unwrap_or_default());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const URL: &str = "cleaned_url";
    const FLAG: &str = "exists in mint docs";

    #[test]
    fn test_load_keeps_all_columns() {
        let table = UrlTable::parse(
            "f0_,cleaned_url,notes\n1,docs.statsig.com/a,x\n2,docs.statsig.com/b,y\n",
            URL,
            FLAG,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].url, "docs.statsig.com/a");
        assert_eq!(&table.records[1].row[2], "y");
    }

    #[test]
    fn test_missing_url_column() {
        let err = UrlTable::parse("f0_,url\n1,a\n", URL, FLAG).unwrap_err();
        assert!(err.to_string().contains("cleaned_url"));
    }

    #[test]
    fn test_flag_column_appended() {
        let mut table = UrlTable::parse("f0_,cleaned_url\n1,/a\n2,/b\n", URL, FLAG).unwrap();
        table.records[0].exists = true;

        assert_eq!(
            table.to_csv_string(FLAG).unwrap(),
            "f0_,cleaned_url,exists in mint docs\n1,/a,True\n2,/b,False\n"
        );
    }

    #[test]
    fn test_flag_column_overwritten_in_place() {
        let mut table = UrlTable::parse(
            "exists in mint docs,cleaned_url\nTrue,/a\nFalse,/b\n",
            URL,
            FLAG,
        )
        .unwrap();
        table.records[0].exists = false;
        table.records[1].exists = true;

        assert_eq!(
            table.to_csv_string(FLAG).unwrap(),
            "exists in mint docs,cleaned_url\nFalse,/a\nTrue,/b\n"
        );
    }

    #[test]
    fn test_short_row_is_padded() {
        let table = UrlTable::parse("f0_,cleaned_url,extra\n1\n", URL, FLAG).unwrap();
        assert_eq!(table.records[0].url, "");
        assert_eq!(
            table.to_csv_string(FLAG).unwrap(),
            "f0_,cleaned_url,extra,exists in mint docs\n1,,,False\n"
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.csv");
        fs::write(&path, "cleaned_url\n\"/a,b\"\n").unwrap();

        let mut table = UrlTable::load(&path, URL, FLAG).unwrap();
        table.records[0].exists = true;
        table.save(&path, FLAG).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "cleaned_url,exists in mint docs\n\"/a,b\",True\n"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(UrlTable::load(&dir.path().join("none.csv"), URL, FLAG).is_err());
    }
}
