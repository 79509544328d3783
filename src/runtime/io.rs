use log::warn;
use std::io::{self, Read, Write};

/// Value returned by byte reads once the input is exhausted.
pub const END_OF_INPUT: i64 = -1;

/// Byte input with a single byte of pushback.
#[derive(Clone, Debug)]
pub struct InputReader<R> {
    reader: R,
    pushed_back: Option<i64>,
}

impl<R: Read> InputReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pushed_back: None,
        }
    }

    pub fn read_byte(&mut self) -> i64 {
        if let Some(byte) = self.pushed_back.take() {
            return byte;
        }
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return END_OF_INPUT,
                Ok(_) => return i64::from(buf[0]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return END_OF_INPUT,
            }
        }
    }

    pub fn push_back(&mut self, byte: i64) {
        self.pushed_back = Some(byte);
    }

    /// Skips bytes until a sign or digit, then reads a decimal integer. The
    /// first byte after the digits stays in the input.
    pub fn read_integer(&mut self) -> i64 {
        let mut positive = true;
        loop {
            let byte = self.read_byte();
            match byte {
                b if b == i64::from(b'+') => break,
                b if b == i64::from(b'-') => {
                    positive = false;
                    break;
                }
                b if is_digit(b) || b == END_OF_INPUT => {
                    self.push_back(b);
                    break;
                }
                _ => continue,
            }
        }

        let mut value: i64 = 0;
        loop {
            let byte = self.read_byte();
            if is_digit(byte) {
                value = value.wrapping_mul(10).wrapping_add(byte - i64::from(b'0'));
            } else {
                self.push_back(byte);
                break;
            }
        }

        if positive {
            value
        } else {
            value.wrapping_neg()
        }
    }
}

fn is_digit(byte: i64) -> bool {
    (i64::from(b'0')..=i64::from(b'9')).contains(&byte)
}

/// Receives program output when no target string is being checked.
pub trait OutputSink {
    fn write_char(&mut self, ch: char);
}

impl<F: FnMut(char)> OutputSink for F {
    fn write_char(&mut self, ch: char) {
        self(ch)
    }
}

/// Writes output to `writer`, flushing after every newline. The first write
/// error is logged and all later output is dropped.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    failed: bool,
}

pub type StdoutSink = WriterSink<io::Stdout>;

impl StdoutSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    /// True once a write has failed.
    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn write_char(&mut self, ch: char) {
        if self.failed {
            return;
        }
        let mut buf = [0u8; 4];
        let mut result = self.writer.write_all(ch.encode_utf8(&mut buf).as_bytes());
        if result.is_ok() && ch == '\n' {
            result = self.writer.flush();
        }
        if let Err(err) = result {
            warn!("dropping program output after write error: {err}");
            self.failed = true;
        }
    }
}

/// Collects output in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringSink(pub String);

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl OutputSink for StringSink {
    fn write_char(&mut self, ch: char) {
        self.0.push(ch);
    }
}

/// Discards output. Useful when only a target comparison matters.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write_char(&mut self, _ch: char) {}
}

/// Either forwards output to the sink or checks it, character by character,
/// against a target string.
#[derive(Clone, Debug)]
pub struct OutputValidator<S> {
    sink: S,
    target: Option<Vec<char>>,
    length: usize,
    success: bool,
}

impl<S> OutputValidator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            target: None,
            length: 0,
            success: true,
        }
    }

    pub fn set_target(&mut self, target: Option<&str>) {
        self.target = target.map(|t| t.chars().collect());
    }

    pub fn target(&self) -> Option<String> {
        self.target.as_ref().map(|t| t.iter().collect())
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: OutputSink> OutputValidator<S> {
    pub fn append(&mut self, ch: char) {
        let Some(target) = &self.target else {
            self.sink.write_char(ch);
            self.length += 1;
            return;
        };

        match target.get(self.length) {
            None => {
                // Trailing newlines past the end of the target are tolerated.
                if ch != '\n' {
                    self.success = false;
                }
            }
            Some(&expected) if expected == ch => self.length += 1,
            Some('\n') if ch == ' ' => self.length += 1,
            Some(_) => self.success = false,
        }
    }

    pub fn append_integer(&mut self, value: i64) {
        for ch in value.to_string().chars() {
            self.append(ch);
            if !self.success {
                break;
            }
        }
    }

    /// Final verdict on termination: all of the target must have been produced.
    pub fn finish(&mut self) {
        if let Some(target) = &self.target {
            self.success = self.success && self.length == target.len();
        }
    }
}
