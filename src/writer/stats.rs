use std::fmt;

/// Statistics from a completed write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of array datasets written
    pub datasets_written: usize,
    /// Number of chunks written across all datasets
    pub chunks_written: usize,
    /// Uncompressed bytes pulled from the array sources
    pub bytes_written: u64,
    /// Largest buffer held in memory at once, in bytes
    pub peak_buffer_bytes: u64,
}

impl WriterStats {
    pub(crate) fn record_buffer(&mut self, bytes: usize) {
        self.bytes_written += bytes as u64;
        self.peak_buffer_bytes = self.peak_buffer_bytes.max(bytes as u64);
    }
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} datasets ({} chunks, {} bytes uncompressed)",
            self.datasets_written, self.chunks_written, self.bytes_written
        )
    }
}
