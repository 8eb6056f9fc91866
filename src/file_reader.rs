//! Range file reader with automatic gzip decompression
//!
//! Range lists are often shipped compressed, and not always under a `.gz`
//! name (registry dumps, `curl -o ranges.csv`). [`open`] sniffs the gzip
//! magic bytes instead of trusting the extension and hands back a buffered
//! reader, which the CLI feeds into its CSV record reader.
//!
//! # Example
//!
//! ```rust,no_run
//! use geotree::file_reader;
//! use std::io::BufRead;
//!
//! let reader = file_reader::open("country-ranges.csv.gz")?;
//!
//! for line in reader.lines() {
//!     println!("{}", line?);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{self, stdin, BufRead, BufReader, Read};
use std::path::Path;

/// Buffer size for file reading (128KB)
const BUFFER_SIZE: usize = 128 * 1024;

/// First two bytes of every gzip member
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open a range file, decompressing gzip content transparently
///
/// The path `-` reads from stdin.
pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();

    if path.to_str() == Some("-") {
        return decode(stdin());
    }

    decode(File::open(path)?)
}

/// Buffer `source`, inserting a gzip decoder if it starts with the gzip magic
///
/// Concatenated gzip members (`cat a.gz b.gz`) decode as one stream. Corrupt
/// gzip data surfaces as an I/O error on a later read.
pub fn decode<R: Read + Send + 'static>(source: R) -> io::Result<Box<dyn BufRead + Send>> {
    let mut buffered = BufReader::with_capacity(BUFFER_SIZE, source);

    if buffered.fill_buf()?.starts_with(&GZIP_MAGIC) {
        let decoder = MultiGzDecoder::new(buffered);
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(buffered))
    }
}
