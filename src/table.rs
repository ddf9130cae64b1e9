use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: IndexMap<String, usize>,
    synthetic: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = IndexMap::new();
        for name in headers {
            let name = name.into();
            let idx = columns.len();
            if columns.insert(name.clone(), idx).is_some() {
                return Err(Error::DuplicateColumn(name));
            }
        }
        let synthetic = vec![false; columns.len()];
        Ok(Table {
            columns,
            synthetic,
            rows: Vec::new(),
        })
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let load = || -> Result<Self> {
            let file = File::open(path)?;
            Self::from_reader(BufReader::new(file))
        };
        load().map_err(|e| Error::input(path, e))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut table = Table::new(headers.iter())?;
        let width = table.width();

        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            if record.len() > width {
                return Err(Error::RaggedRow {
                    record: i + 1,
                    found: record.len(),
                    expected: width,
                });
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            // Short records read as empty trailing fields
            row.resize(width, String::new());
            table.rows.push(row);
        }

        Ok(table)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let save = || -> Result<()> {
            let file = File::create(path)?;
            self.to_writer(BufWriter::new(file))
        };
        save().map_err(|e| Error::output(path, e))
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let visible: Vec<usize> = (0..self.width()).filter(|&i| !self.synthetic[i]).collect();
        let mut wtr = csv::Writer::from_writer(writer);

        let names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        wtr.write_record(visible.iter().map(|&i| names[i]))?;
        for row in &self.rows {
            wtr.write_record(visible.iter().map(|&i| row[i].as_str()))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn is_synthetic(&self, name: &str) -> bool {
        self.column_index(name).is_some_and(|i| self.synthetic[i])
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn push_row<I, S>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = values.into_iter().map(Into::into).collect();
        if row.len() != self.width() {
            return Err(Error::RaggedRow {
                record: self.rows.len() + 1,
                found: row.len(),
                expected: self.width(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    // Overwrites a same-named column and marks it synthetic
    pub fn derive_column<F>(&mut self, source: usize, name: &str, f: F)
    where
        F: Fn(&str) -> String,
    {
        match self.column_index(name) {
            Some(target) => {
                for row in &mut self.rows {
                    row[target] = f(&row[source]);
                }
                self.synthetic[target] = true;
            }
            None => {
                self.columns.insert(name.to_string(), self.columns.len());
                self.synthetic.push(true);
                for row in &mut self.rows {
                    let value = f(&row[source]);
                    row.push(value);
                }
            }
        }
    }

    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.rows.len());
        let mut flags = keep.iter();
        self.rows.retain(|_| flags.next().copied().unwrap_or(false));
    }
}
