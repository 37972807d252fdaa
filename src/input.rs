use anyhow::{Context, Result};
use bstr::ByteSlice;
use camino::Utf8PathBuf;
use ripline::{
    line_buffer::{LineBufferBuilder, LineBufferReader},
    lines::LineIter,
};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};

/// A source that can be either a file or stdin.
#[derive(Default, Clone, Debug)]
pub enum FileOrStdin {
    /// Input from a file.
    File(Utf8PathBuf),
    /// Input from stdin.
    #[default]
    Stdin,
}

impl fmt::Display for FileOrStdin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOrStdin::File(path) => write!(f, "{}", path),
            FileOrStdin::Stdin => write!(f, "<stdin>"),
        }
    }
}

impl FileOrStdin {
    /// Create a new FileOrStdin from a path.
    ///
    /// If the path is "-", stdin is used.
    pub fn from_path(path: Utf8PathBuf) -> Self {
        if path.as_str() == "-" {
            FileOrStdin::Stdin
        } else {
            FileOrStdin::File(path)
        }
    }

    /// Open the input source as a reader.
    pub fn reader(&self) -> Result<InputReader> {
        match self {
            FileOrStdin::File(path) => {
                let file =
                    File::open(path).with_context(|| format!("failed to open file: {}", path))?;
                Ok(InputReader::File(file))
            }
            FileOrStdin::Stdin => Ok(InputReader::Stdin(io::stdin())),
        }
    }
}

/// A reader for input from either a file or stdin.
///
/// The file handle is closed when the reader is dropped.
pub enum InputReader {
    File(File),
    Stdin(io::Stdin),
}

impl Read for InputReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputReader::File(rdr) => rdr.read(buf),
            InputReader::Stdin(rdr) => rdr.read(buf),
        }
    }
}

impl InputReader {
    /// Call `f` with each line and its 1-based number, in input order.
    ///
    /// Line terminators (`\n` or `\r\n`) are removed and invalid UTF-8 is
    /// replaced. An error from `f` stops the iteration and is returned.
    pub fn for_each_line<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(u64, &str) -> Result<()>,
    {
        let mut line_buffer = LineBufferBuilder::new().capacity(65536).build();
        let mut lb_reader = LineBufferReader::new(self, &mut line_buffer);
        let mut number = 0;

        while lb_reader.fill().context("failed to read line")? {
            for line in LineIter::new(b'\n', lb_reader.buffer()) {
                number += 1;
                f(number, &trim_terminator(line).to_str_lossy())?;
            }
            lb_reader.consume_all();
        }
        Ok(())
    }
}

#[inline(always)]
fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
