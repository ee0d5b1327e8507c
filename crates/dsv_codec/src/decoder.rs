use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};

use dsv_schema::Record;

use crate::error::Error;
use crate::tokenizer;

// -----------------------------------------------------------------------------
// Decoder

/// Reads and decodes records from a delimited text stream.
///
/// A `Decoder` is only required when the default behaviour of
/// [`from_str`](crate::from_str)/[`from_reader`](crate::from_reader) is not
/// enough: headerless input, non-default separators, or stream processing of
/// files too large to decode in one go.
///
/// With a header present, the header fixes the number and order of fields
/// for every following record, and columns map to record fields by name.
/// Without one, the header is derived from the record type's own schema, in
/// field declaration order.
///
/// Configuration is fluent and must happen before the first read:
///
/// ```
/// use dsv_codec::Decoder;
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
/// let pairs: Vec<Pair> = Decoder::new("1;2\n3;4".as_bytes())
///     .header(false)
///     .separator(';')
///     .decode()
///     .unwrap();
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[1].a, 3);
/// ```
///
/// The streaming form hands out one line at a time:
///
/// ```no_run
/// # use dsv_codec::{Decoder, Error};
/// # use dsv_schema::Record;
/// # #[derive(Record, Default)]
/// # struct Item { #[record(name = "n")] n: i64 }
/// # fn stream(reader: impl std::io::Read) -> Result<(), Error> {
/// let mut decoder = Decoder::new(reader);
/// let line = decoder.read_line()?.ok_or(Error::EmptyHeader)?;
/// decoder.decode_header(&line)?;
/// while let Some(line) = decoder.read_line()? {
///     let mut item = Item::default();
///     decoder.decode_record(&mut item, &line)?;
///     // ...
/// }
/// # Ok(())
/// # }
/// ```
pub struct Decoder<R> {
    reader: BufReader<R>,
    separator: char,
    comment: char,
    quote: char,
    expect_header: bool,
    skip_unknown: bool,
    trim: bool,
    line_no: usize,
    header: Vec<String>,
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self::from_buf(BufReader::new(reader))
    }

    /// Creates a decoder with a pre-sized read buffer.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self::from_buf(BufReader::with_capacity(capacity, reader))
    }

    fn from_buf(reader: BufReader<R>) -> Self {
        Self {
            reader,
            separator: ',',
            comment: '#',
            quote: '"',
            expect_header: true,
            skip_unknown: true,
            trim: true,
            line_no: 0,
            header: Vec::new(),
        }
    }

    /// Controls whether the input is expected to start with a header line.
    /// Defaults to `true`.
    pub fn header(mut self, expect: bool) -> Self {
        self.expect_header = expect;
        self
    }

    /// Sets the field separator. Defaults to `,`.
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the comment character: lines starting with it are skipped.
    /// Defaults to `#`.
    pub fn comment(mut self, comment: char) -> Self {
        self.comment = comment;
        self
    }

    /// Sets the quote character for the field-merging pass. Defaults to `"`.
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Controls whitespace trimming of header names and field values.
    /// Defaults to `true`.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Controls whether header columns that match no record field are
    /// silently ignored (`true`, the default) or an error.
    pub fn skip_unknown(mut self, skip: bool) -> Self {
        self.skip_unknown = skip;
        self
    }

    /// Returns the header columns, empty until a header has been read or
    /// derived.
    pub fn header_columns(&self) -> &[String] {
        &self.header
    }

    /// Returns the next non-blank, non-comment line, or `None` at the end
    /// of the stream.
    ///
    /// One trailing newline is stripped, as is a carriage return before it.
    /// Skipped lines still count for the line numbers reported in errors.
    pub fn read_line(&mut self) -> Result<Option<String>, Error> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if line.ends_with('\n') {
                line.pop();
            }
            if line.ends_with('\r') {
                line.pop();
            }
            if line.is_empty() || line.starts_with(self.comment) {
                continue;
            }
            return Ok(Some(line));
        }
    }

    /// Splits `line` into header columns and stores them as the decoder's
    /// header.
    ///
    /// The header line is split without the quote-merging pass. Names are
    /// trimmed when trimming is enabled.
    pub fn decode_header(&mut self, line: &str) -> Result<&[String], Error> {
        let mut columns: Vec<String> = line.split(self.separator).map(str::to_owned).collect();
        if self.trim {
            for column in &mut columns {
                *column = column.trim().to_owned();
            }
        }
        if columns.is_empty() {
            return Err(Error::EmptyHeader);
        }
        self.header = columns;
        Ok(&self.header)
    }

    /// Decodes one record line into `target`.
    ///
    /// When no header exists yet, one is derived from `target`'s own schema
    /// first. Fails without touching the remaining fields on the first
    /// problem: a field-count mismatch against the header, an unmatched
    /// column with [`skip_unknown`](Decoder::skip_unknown) disabled, or a
    /// value conversion error (reported with line number and 1-based field
    /// position).
    pub fn decode_record<T: Record>(&mut self, target: &mut T, line: &str) -> Result<(), Error> {
        if self.header.is_empty() {
            self.derive_header::<T>()?;
        }

        let row = tokenizer::split_record(line, self.separator, self.quote);
        if row.len() != self.header.len() {
            return Err(Error::FieldCount {
                line: self.line_no,
                expected: self.header.len(),
                found: row.len(),
            });
        }

        // Whole-record capability first: the hook sees the raw tokens.
        if let Some(result) = target.from_row(&self.header, &row) {
            return result.map_err(|source| Error::Decode {
                line: self.line_no,
                field: 0,
                column: String::new(),
                source,
            });
        }

        // Header-keyed container targets capture every column verbatim.
        if let Some(map) = target.as_column_map() {
            for (column, token) in self.header.iter().zip(&row) {
                let text = prepare(token, self.trim, self.quote);
                map.insert_column(column, &text);
            }
            return Ok(());
        }

        let info = T::record_info()?;
        for (position, (column, token)) in self.header.iter().zip(&row).enumerate() {
            let text = prepare(token, self.trim, self.quote);

            let Some(field) = info.resolve(column) else {
                if self.skip_unknown {
                    continue;
                }
                return Err(Error::UnknownColumn {
                    line: self.line_no,
                    field: position + 1,
                    column: column.clone(),
                });
            };

            // An empty token leaves the field at its current value, without
            // allocating optional records along the path.
            if text.is_empty() {
                continue;
            }

            let Some(cell) = target.cell_mut(field.path()) else {
                continue;
            };

            // Associative containers (the catch-all, or a map field matched
            // by name) take the column name with the value; everything else
            // converts the token alone.
            let result = match cell.insert_entry(column, &text) {
                Some(result) => result,
                None => cell.decode_cell(&text),
            };
            result.map_err(|source| Error::Decode {
                line: self.line_no,
                field: position + 1,
                column: column.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Decodes every remaining record into a new `Vec`.
    ///
    /// See [`decode_into`](Decoder::decode_into).
    pub fn decode<T: Record + Default>(&mut self) -> Result<Vec<T>, Error> {
        let mut records = Vec::new();
        self.decode_into(&mut records)?;
        Ok(records)
    }

    /// Decodes every remaining record of the stream, appending to `out`.
    ///
    /// With a header expected, the first surviving line becomes the header;
    /// otherwise the header is derived from `T`'s schema up front. Each
    /// record is decoded into a fresh `T::default()`. The first error stops
    /// the loop immediately; records already appended stay in `out`.
    pub fn decode_into<T: Record + Default>(&mut self, out: &mut Vec<T>) -> Result<(), Error> {
        if !self.expect_header && self.header.is_empty() {
            self.derive_header::<T>()?;
        }
        while let Some(line) = self.read_line()? {
            if self.expect_header && self.header.is_empty() {
                self.decode_header(&line)?;
                continue;
            }
            let mut record = T::default();
            self.decode_record(&mut record, &line)?;
            out.push(record);
        }
        Ok(())
    }

    fn derive_header<T: Record>(&mut self) -> Result<(), Error> {
        let info = T::record_info()?;
        self.header = info.columns().map(str::to_owned).collect();
        if self.header.is_empty() {
            return Err(Error::EmptyHeader);
        }
        Ok(())
    }
}

// Trims (when enabled) and unescapes one raw token.
fn prepare(token: &str, trim: bool, quote: char) -> Cow<'_, str> {
    let token = if trim { token.trim() } else { token };
    tokenizer::unescape_quotes(token, quote)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use dsv_schema::{ConvertError, Record};

    use super::Decoder;
    use crate::error::Error;

    #[derive(Record, Default, Debug, PartialEq)]
    struct Plain {
        #[record(name = "s")]
        text: String,
        #[record(name = "b")]
        flag: bool,
        #[record(name = "i")]
        num: i64,
        #[record(name = "f")]
        ratio: f64,
    }

    fn plain(text: &str, flag: bool, num: i64, ratio: f64) -> Plain {
        Plain {
            text: text.to_owned(),
            flag,
            num,
            ratio,
        }
    }

    const WITH_HEADER: &str = "s,i,f,b\nHello,42,23.45,true";
    const WITHOUT_HEADER: &str = "Hello,true,42,23.45";

    #[test]
    fn decode_with_header() {
        let records: Vec<Plain> = Decoder::new(WITH_HEADER.as_bytes()).decode().unwrap();
        assert_eq!(records, [plain("Hello", true, 42, 23.45)]);
    }

    #[test]
    fn decode_without_header() {
        let records: Vec<Plain> = Decoder::new(WITHOUT_HEADER.as_bytes())
            .header(false)
            .decode()
            .unwrap();
        assert_eq!(records, [plain("Hello", true, 42, 23.45)]);
    }

    #[test]
    fn decode_trims_whitespace() {
        let input = "  Hello  ,  true   ,  42  ,  23.45";
        let records: Vec<Plain> = Decoder::new(input.as_bytes())
            .header(false)
            .decode()
            .unwrap();
        assert_eq!(records, [plain("Hello", true, 42, 23.45)]);
    }

    #[test]
    fn trim_disabled_keeps_strings_verbatim() {
        let input = "s,b\n  Hello  ,true";
        #[derive(Record, Default)]
        struct Pair {
            #[record(name = "s")]
            text: String,
            #[record(name = "b")]
            flag: bool,
        }
        let records: Vec<Pair> = Decoder::new(input.as_bytes())
            .trim(false)
            .decode()
            .unwrap();
        assert_eq!(records[0].text, "  Hello  ");
        assert!(records[0].flag);
    }

    #[test]
    fn decode_with_separator() {
        let records: Vec<Plain> = Decoder::new("Hello;true;42;23.45".as_bytes())
            .header(false)
            .separator(';')
            .decode()
            .unwrap();
        assert_eq!(records, [plain("Hello", true, 42, 23.45)]);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let input = "# Comment line\nHello,true,42,23.45\n#\n# another comment\nHello World,false,43,24.56";
        let records: Vec<Plain> = Decoder::new(input.as_bytes())
            .header(false)
            .decode()
            .unwrap();
        assert_eq!(
            records,
            [
                plain("Hello", true, 42, 23.45),
                plain("Hello World", false, 43, 24.56),
            ]
        );
    }

    #[test]
    fn empty_lines_are_skipped() {
        let input = "\nHello,true,42,23.45\n\nHello World,false,43,24.56";
        let records: Vec<Plain> = Decoder::new(input.as_bytes())
            .header(false)
            .decode()
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn empty_fields_keep_zero_values() {
        let input = ",true,42,23.45\nHello,,42,23.45\nHello,true,,23.45\nHello,true,42,\n,,,";
        let records: Vec<Plain> = Decoder::new(input.as_bytes())
            .header(false)
            .decode()
            .unwrap();
        assert_eq!(
            records,
            [
                plain("", true, 42, 23.45),
                plain("Hello", false, 42, 23.45),
                plain("Hello", true, 0, 23.45),
                plain("Hello", true, 42, 0.0),
                plain("", false, 0, 0.0),
            ]
        );
    }

    #[test]
    fn crlf_input() {
        let input = "s,i,f,b\r\nHello,42,23.45,true\r\nHello World,43,24.56,false\r\n";
        let records: Vec<Plain> = Decoder::new(input.as_bytes()).decode().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], plain("Hello World", false, 43, 24.56));
    }

    #[test]
    fn last_record_without_newline() {
        let input = "s,i,f,b\nHello,42,23.45,true\nHello World,43,24.56,false";
        let records: Vec<Plain> = Decoder::new(input.as_bytes()).decode().unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn unknown_column_is_skipped_by_default() {
        let input = "s,i,f,b,x\nHello,42,23.45,true,Unknown";
        let records: Vec<Plain> = Decoder::new(input.as_bytes()).decode().unwrap();
        assert_eq!(records, [plain("Hello", true, 42, 23.45)]);
    }

    #[test]
    fn unknown_column_errors_when_skipping_is_off() {
        let input = "s,i,f,b,x\nHello,42,23.45,true,Unknown";
        let err = Decoder::new(input.as_bytes())
            .skip_unknown(false)
            .decode::<Plain>()
            .unwrap_err();
        match err {
            Error::UnknownColumn { line, field, column } => {
                assert_eq!(line, 2);
                assert_eq!(field, 5);
                assert_eq!(column, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn field_count_mismatch() {
        let input = "s,i,f,b\nHello,42,23.45";
        let err = Decoder::new(input.as_bytes())
            .decode::<Plain>()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::FieldCount {
                line: 2,
                expected: 4,
                found: 3,
            }
        ));
    }

    #[test]
    fn errors_keep_previously_decoded_records() {
        let input = "s,i,f,b\nHello,42,23.45,true\nHello,nope,23.45,true";
        let mut records: Vec<Plain> = Vec::new();
        let err = Decoder::new(input.as_bytes())
            .decode_into(&mut records)
            .unwrap_err();
        assert_eq!(records, [plain("Hello", true, 42, 23.45)]);
        match err {
            Error::Decode { line, field, column, source } => {
                assert_eq!(line, 3);
                assert_eq!(field, 2);
                assert_eq!(column, "i");
                assert!(matches!(source, ConvertError::Int { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[derive(Record, Default)]
    struct WithRest {
        #[record(name = "s")]
        text: String,
        #[record(name = "b")]
        flag: bool,
        #[record(name = "i")]
        num: i64,
        #[record(name = "f")]
        ratio: f64,
        #[record(any)]
        rest: HashMap<String, String>,
    }

    #[test]
    fn catch_all_captures_unmatched_columns() {
        let input = "s,i,f,b,x,y\nHello,42,23.45,true,X,Y";
        let records: Vec<WithRest> = Decoder::new(input.as_bytes()).decode().unwrap();
        let record = &records[0];
        assert_eq!(record.text, "Hello");
        assert_eq!(record.num, 42);
        assert_eq!(record.rest.len(), 2);
        assert_eq!(record.rest["x"], "X");
        assert_eq!(record.rest["y"], "Y");
    }

    #[derive(Default, PartialEq, Debug)]
    struct Tag(String);

    impl dsv_schema::Cell for Tag {
        fn decode_cell(&mut self, text: &str) -> Result<(), ConvertError> {
            self.0 = text.to_owned();
            Ok(())
        }

        fn encode_cell(&self) -> Result<String, ConvertError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Record, Default)]
    struct WithTaggedRest {
        #[record(name = "s")]
        text: String,
        #[record(name = "b")]
        flag: bool,
        #[record(name = "i")]
        num: i64,
        #[record(name = "f")]
        ratio: f64,
        #[record(any)]
        rest: HashMap<String, Tag>,
    }

    #[test]
    fn catch_all_converts_values_per_entry() {
        let input = "s,i,f,b,x,y\nHello,42,23.45,true,X,Y";
        let records: Vec<WithTaggedRest> = Decoder::new(input.as_bytes()).decode().unwrap();
        assert_eq!(records[0].rest["x"], Tag("X".to_owned()));
        assert_eq!(records[0].rest["y"], Tag("Y".to_owned()));
    }

    #[test]
    fn map_targets_capture_whole_records() {
        let mut decoder = Decoder::new(WITH_HEADER.as_bytes());
        let line = decoder.read_line().unwrap().unwrap();
        decoder.decode_header(&line).unwrap();
        let line = decoder.read_line().unwrap().unwrap();

        let mut record: HashMap<String, String> = HashMap::new();
        decoder.decode_record(&mut record, &line).unwrap();
        assert_eq!(record.len(), 4);
        assert_eq!(record["s"], "Hello");
        assert_eq!(record["i"], "42");
        assert_eq!(record["f"], "23.45");
        assert_eq!(record["b"], "true");
    }

    #[test]
    fn streaming_decode() {
        let mut decoder = Decoder::new(WITH_HEADER.as_bytes());
        let line = decoder.read_line().unwrap().unwrap();
        assert_eq!(decoder.decode_header(&line).unwrap(), &["s", "i", "f", "b"]);

        let line = decoder.read_line().unwrap().unwrap();
        let mut record = Plain::default();
        decoder.decode_record(&mut record, &line).unwrap();
        assert_eq!(record, plain("Hello", true, 42, 23.45));

        assert!(decoder.read_line().unwrap().is_none());
    }

    #[test]
    fn decode_record_derives_missing_header() {
        // No header decoded first: field order comes from the type.
        let mut decoder = Decoder::new("".as_bytes());
        let mut record = Plain::default();
        decoder
            .decode_record(&mut record, "Hello,true,42,23.45")
            .unwrap();
        assert_eq!(record, plain("Hello", true, 42, 23.45));
    }

    #[test]
    fn quoted_fields_merge() {
        let input = "s,i,f,b\n\"Hello, World\",42,23.45,true";
        let records: Vec<Plain> = Decoder::new(input.as_bytes()).decode().unwrap();
        assert_eq!(records[0].text, "Hello, World");
    }

    #[test]
    fn doubled_quotes_unescape_during_decode() {
        let input = "s,i,f,b\n\"say \"\"hi\"\"\",42,23.45,true";
        let records: Vec<Plain> = Decoder::new(input.as_bytes()).decode().unwrap();
        assert_eq!(records[0].text, "say \"hi\"");
    }

    #[test]
    fn row_hook_takes_precedence() {
        #[derive(Default)]
        struct Summed {
            total: i64,
        }

        impl Record for Summed {
            fn build_record_info()
            -> Result<dsv_schema::RecordInfo, dsv_schema::SchemaError> {
                let mut builder = dsv_schema::info::RecordInfoBuilder::new::<Self>();
                builder.column(0, "a", dsv_schema::FieldFlags::ELEMENT)?;
                builder.column(1, "b", dsv_schema::FieldFlags::ELEMENT)?;
                Ok(builder.finish())
            }

            fn cell(&self, _path: &[usize]) -> Option<&dyn dsv_schema::Cell> {
                None
            }

            fn cell_mut(&mut self, _path: &[usize]) -> Option<&mut dyn dsv_schema::Cell> {
                None
            }

            fn from_row(
                &mut self,
                _header: &[String],
                row: &[String],
            ) -> Option<Result<(), ConvertError>> {
                let mut total = 0;
                for token in row {
                    match token.parse::<i64>() {
                        Ok(value) => total += value,
                        Err(_) => {
                            return Some(Err(ConvertError::custom("row hook parse failure")));
                        }
                    }
                }
                self.total = total;
                Some(Ok(()))
            }
        }

        let records: Vec<Summed> = Decoder::new("a,b\n19,23".as_bytes()).decode().unwrap();
        assert_eq!(records[0].total, 42);
    }

    #[derive(Record, Default, Debug, PartialEq)]
    struct Nested {
        #[record(name = "id")]
        id: u32,
        #[record(flatten)]
        position: Position,
        #[record(flatten)]
        velocity: Option<Velocity>,
    }

    #[derive(Record, Default, Debug, PartialEq)]
    struct Position {
        #[record(name = "x")]
        x: f64,
        #[record(name = "y")]
        y: f64,
    }

    #[derive(Record, Default, Debug, PartialEq)]
    struct Velocity {
        #[record(name = "vx")]
        vx: f64,
        #[record(name = "vy")]
        vy: f64,
    }

    #[test]
    fn flattened_fields_decode_in_place() {
        let input = "id,x,y,vx,vy\n7,1.5,2.5,0.25,0.75";
        let records: Vec<Nested> = Decoder::new(input.as_bytes()).decode().unwrap();
        assert_eq!(
            records[0],
            Nested {
                id: 7,
                position: Position { x: 1.5, y: 2.5 },
                velocity: Some(Velocity { vx: 0.25, vy: 0.75 }),
            }
        );
    }

    #[test]
    fn optional_flatten_stays_none_for_empty_columns() {
        let input = "id,x,y,vx,vy\n7,1.5,2.5,,";
        let records: Vec<Nested> = Decoder::new(input.as_bytes()).decode().unwrap();
        assert_eq!(records[0].velocity, None);
    }

    #[derive(Record, Default, Debug, PartialEq)]
    struct Sparse {
        #[record(name = "s")]
        text: String,
        #[record(name = "n")]
        num: Option<i64>,
    }

    #[test]
    fn optional_fields_allocate_on_first_value() {
        let input = "s,n\nHello,42\nWorld,";
        let records: Vec<Sparse> = Decoder::new(input.as_bytes()).decode().unwrap();
        assert_eq!(records[0].num, Some(42));
        assert_eq!(records[1].num, None);
    }
}
