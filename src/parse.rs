use bstr::{BStr, ByteSlice};

/// The `FromStr` analog for `&[u8]`.
pub trait FromBytes: Sized {
    type Err;

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Err>;
}

/// A simple extension trait that adds some methods to byte slices.
///
/// `bstr` already gives us most of what we need.
pub trait BytesExt {
    // This would be more naturally named `as_bytes()`, but that creates
    // conflicts with other `as_bytes()` methods.
    fn as_byte_slice(&self) -> &[u8];

    fn parse<T: FromBytes>(&self) -> Result<T, <T as FromBytes>::Err> {
        FromBytes::from_bytes(self.as_byte_slice())
    }
}

impl BytesExt for [u8] {
    fn as_byte_slice(&self) -> &[u8] {
        self
    }
}

/// A borrowed line parsed from a stream.
///
/// This is meant to give you access to various
/// parts of the line including the *full* line.
/// It absolves callers of needing to futz with
/// line terminators or line numbers.
#[derive(Clone, Copy, Debug)]
pub struct Line<'a> {
    /// The line number, 1-indexed.
    number: usize,
    /// The full line including its line terminator if present.
    full: &'a BStr,
}

impl<'a> Line<'a> {
    pub fn new(number: usize, full: &'a [u8]) -> Line<'a> {
        Line { number, full: full.as_bstr() }
    }

    /// Return the one-indexed line number of this line.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Return the full line including its optional terminator.
    pub fn full(&self) -> &'a BStr {
        self.full
    }

    /// Return only the content of the line, i.e., the line without its
    /// terminator (if present).
    pub fn content(&self) -> &'a BStr {
        let (content, _) = split_line_terminator(self.full);
        content.as_bstr()
    }
}

/// An extension trait for `std::io::BufRead` which provides convenience APIs
/// for dealing with byte strings.
///
/// This is a stripped down version of what's in `bstr::io`. It's copied here
/// instead of just using `bstr::io` because having a `std::io::Result`
/// return type is supremely annoying when working with `anyhow`. This is just
/// supremely annoying and it feels like an API design mistake in `bstr`. But
/// it's not totally clear how to fix it without more API machinery to make
/// the error type generic but still support propagating `std::io::Error`.
pub trait BufReadExt: std::io::BufRead {
    /// Executes the given closure on each (`\n`|`\r\n`)-terminated line in the
    /// underlying reader.
    fn for_byte_line<F>(&mut self, mut for_each_line: F) -> anyhow::Result<()>
    where
        Self: Sized,
        F: FnMut(Line<'_>) -> anyhow::Result<bool>,
    {
        let mut number = 0;
        let mut bytes = vec![];
        let mut res = Ok(());
        let mut consumed = 0;
        'outer: loop {
            // Lend out complete record slices from our buffer
            {
                let mut buf = self.fill_buf()?;
                if buf.is_empty() {
                    break;
                }
                while let Some(index) = buf.find_byte(b'\n') {
                    let (record, rest) = buf.split_at(index + 1);
                    buf = rest;
                    consumed += record.len();
                    number += 1;
                    match for_each_line(Line::new(number, record)) {
                        Ok(false) => break 'outer,
                        Err(err) => {
                            res = Err(err);
                            break 'outer;
                        }
                        _ => (),
                    }
                }

                // Copy the final record fragment to our local buffer. This
                // saves read_until() from re-scanning a buffer we know
                // contains no remaining terminators.
                bytes.extend_from_slice(buf);
                consumed += buf.len();
            }

            self.consume(consumed);
            consumed = 0;

            // N.B. read_until uses a different version of memchr that may
            // be slower than the memchr crate that bstr uses. However, this
            // should only run for a fairly small number of records, assuming a
            // decent buffer size.
            self.read_until(b'\n', &mut bytes)?;
            if bytes.is_empty() {
                break;
            }
            number += 1;
            if !for_each_line(Line::new(number, &bytes))? {
                break;
            }
            bytes.clear();
        }
        self.consume(consumed);
        res
    }
}

impl<B: std::io::BufRead> BufReadExt for B {}

fn split_line_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    let mut terminator_at = line.len();
    if line.last_byte() == Some(b'\n') {
        terminator_at -= 1;
        if line[..terminator_at].last_byte() == Some(b'\r') {
            terminator_at -= 1;
        }
    }
    (&line[..terminator_at], &line[terminator_at..])
}
