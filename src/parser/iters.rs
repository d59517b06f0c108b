/*!
Iterator over the MRT records of a stream.

Records are parsed one at a time from the underlying reader, so a dump never has to be held in
memory as a whole. The iterator is fallible: every item is a `Result`, and iteration stops after
the first error or at a clean end of input.
*/
use crate::error::ParserError;
use crate::models::MrtRecord;
use crate::parser::parse_mrt_record;
use log::error;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct RecordIterator<R> {
    reader: R,
    count: u64,
    done: bool,
}

impl<R: Read> RecordIterator<R> {
    pub fn new(reader: R) -> Self {
        RecordIterator {
            reader,
            count: 0,
            done: false,
        }
    }

    /// Number of records returned so far.
    pub fn count_read(&self) -> u64 {
        self.count
    }
}

impl RecordIterator<BufReader<File>> {
    /// Opens an MRT file for reading.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParserError> {
        let file = File::open(path)?;
        Ok(RecordIterator::new(BufReader::new(file)))
    }
}

impl<R: Read> Iterator for RecordIterator<R> {
    type Item = Result<MrtRecord, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match parse_mrt_record(&mut self.reader) {
            Ok(record) => {
                self.count += 1;
                Some(Ok(record))
            }
            Err(ParserError::EofExpected) => {
                // normal end of file
                self.done = true;
                None
            }
            Err(e) => {
                error!("parser error after {} records: {}", self.count, e);
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let mut iter = RecordIterator::new(&[0u8; 0][..]);
        assert!(iter.next().is_none());
        assert_eq!(iter.count_read(), 0);
    }

    #[test]
    fn test_stops_after_error() {
        let data = [0u8, 0, 0, 1, 0, 13, 0, 1, 0, 0, 0, 5, 0, 0];
        let mut iter = RecordIterator::new(&data[..]);
        assert!(matches!(iter.next(), Some(Err(ParserError::IoError(_)))));
        assert!(iter.next().is_none());
    }
}
