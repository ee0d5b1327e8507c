use std::io::Write;

use dsv_schema::Record;

use crate::error::Error;

// -----------------------------------------------------------------------------
// Encoder

/// Writes records and an optional header line to an output stream.
///
/// The header is computed once — from explicit columns or from the first
/// record type seen — and fixes the field order of every subsequent record.
/// It is computed even when header writing is disabled.
///
/// ```
/// use dsv_codec::Encoder;
/// use dsv_schema::Record;
///
/// #[derive(Record, Default)]
/// struct Pair {
///     #[record(name = "a")]
///     a: i64,
///     #[record(name = "b")]
///     b: i64,
/// }
///
/// let mut out = Vec::new();
/// let mut encoder = Encoder::new(&mut out);
/// encoder.encode(&[Pair { a: 1, b: 2 }, Pair { a: 3, b: 4 }]).unwrap();
/// assert_eq!(out, b"a,b\n1,2\n3,4\n");
/// ```
///
/// Output values are not quoted: a value containing the separator produces
/// a line the decoder's restricted quote handling will not round-trip.
pub struct Encoder<W> {
    writer: W,
    separator: char,
    write_header: bool,
    trim: bool,
    header: Vec<String>,
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            separator: ',',
            write_header: true,
            trim: true,
            header: Vec::new(),
        }
    }

    /// Controls whether the header line is written. Defaults to `true`.
    pub fn header(mut self, write: bool) -> Self {
        self.write_header = write;
        self
    }

    /// Sets the field separator. Defaults to `,`.
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Controls whitespace trimming of formatted values. Defaults to `true`.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Returns the header columns, empty until a header has been built.
    pub fn header_columns(&self) -> &[String] {
        &self.header
    }

    /// Builds the header from `T`'s schema (once) and writes the header
    /// line when header writing is enabled.
    pub fn encode_header<T: Record>(&mut self) -> Result<(), Error> {
        if self.header.is_empty() {
            let info = T::record_info()?;
            self.header = info.columns().map(str::to_owned).collect();
            if self.header.is_empty() {
                return Err(Error::EmptyHeader);
            }
        }
        self.write_header_line()
    }

    /// Adopts `columns` as the header verbatim (once) and writes the header
    /// line when header writing is enabled.
    ///
    /// Explicit columns decide which record fields are written and in which
    /// order; names matching no field produce empty tokens.
    pub fn encode_header_with(&mut self, columns: &[&str]) -> Result<(), Error> {
        if self.header.is_empty() {
            if columns.is_empty() {
                return Err(Error::EmptyHeader);
            }
            self.header = columns.iter().map(|c| (*c).to_owned()).collect();
        }
        self.write_header_line()
    }

    /// Encodes one record as one output line.
    ///
    /// Builds (and, when enabled, writes) the header from the record's type
    /// if none exists yet. A [`to_row`](Record::to_row) override supplies
    /// the line verbatim; otherwise each header column is resolved against
    /// the record's schema and formatted through its [`Cell`] — unmatched
    /// columns and empty optionals become empty tokens.
    ///
    /// [`Cell`]: dsv_schema::Cell
    pub fn encode_record<T: Record>(&mut self, record: &T) -> Result<(), Error> {
        if self.header.is_empty() {
            self.encode_header::<T>()?;
        }

        if let Some(row) = record.to_row(&self.header) {
            let row = row.map_err(|source| Error::Encode {
                column: String::new(),
                source,
            })?;
            return Self::output(&mut self.writer, self.separator, &row);
        }

        let info = T::record_info()?;
        let mut row = Vec::with_capacity(self.header.len());
        for column in &self.header {
            let token = match info.resolve(column) {
                Some(field) if field.flags().element() => match record.cell(field.path()) {
                    Some(cell) => {
                        let text = cell.encode_cell().map_err(|source| Error::Encode {
                            column: column.clone(),
                            source,
                        })?;
                        if self.trim {
                            text.trim().to_owned()
                        } else {
                            text
                        }
                    }
                    None => String::new(),
                },
                _ => String::new(),
            };
            row.push(token);
        }
        Self::output(&mut self.writer, self.separator, &row)
    }

    /// Encodes a sequence of records, header first.
    ///
    /// An empty input writes nothing at all — not even the header.
    pub fn encode<T: Record>(&mut self, records: &[T]) -> Result<(), Error> {
        if records.is_empty() {
            return Ok(());
        }
        self.encode_header::<T>()?;
        for record in records {
            self.encode_record(record)?;
        }
        Ok(())
    }

    fn write_header_line(&mut self) -> Result<(), Error> {
        if !self.write_header {
            return Ok(());
        }
        Self::output(&mut self.writer, self.separator, &self.header)
    }

    // One line: tokens joined by the separator, then a newline, straight to
    // the sink.
    fn output(writer: &mut W, separator: char, row: &[String]) -> Result<(), Error> {
        let mut line = String::new();
        for (index, token) in row.iter().enumerate() {
            if index > 0 {
                line.push(separator);
            }
            line.push_str(token);
        }
        line.push('\n');
        writer.write_all(line.as_bytes())?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
