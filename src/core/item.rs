use crate::error::CsvError;

/// Result of a single read: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<R> = Result<Option<R>, CsvError>;

pub type ItemWriterResult = Result<(), CsvError>;

/// Source of records, read one at a time.
pub trait ItemReader<R> {
    fn read(&self) -> ItemReaderResult<R>;
}

/// Sink of records, written a slice at a time.
pub trait ItemWriter<W> {
    fn write(&self, items: &[W]) -> ItemWriterResult;

    fn flush(&self) -> ItemWriterResult;

    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}
