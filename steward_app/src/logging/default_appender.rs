//! A buffered stderr appender.
//!
//! Every record is encoded into a stack buffer first and then written with a
//! single locked write, so records from concurrent command tasks don't
//! interleave.

use std::io::{self, IsTerminal as _, Write as _};

use arrayvec::ArrayVec;
use log::Record;
use log4rs::append::Append;
use log4rs::config::{Deserialize, Deserializers};
use log4rs::encode::{self, Color, Encode, EncoderConfig, Style};

use super::WRITE_BUF_SIZE;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Debug)]
pub struct StderrAppender {
    encoder: Box<dyn Encode>,
    color: bool,
}

impl Append for StderrAppender {
    fn append(&self, record: &Record<'_>) -> anyhow::Result<()> {
        let mut writer = RecordWriter {
            color: self.color,
            buf: ArrayVec::new_const(),
        };

        self.encoder.encode(&mut writer, record)?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) {
        _ = io::stderr().flush();
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct StderrAppenderConfig {
    /// Forces color on or off. Detected from the terminal if unset.
    color: Option<bool>,
    encoder: EncoderConfig,
}

pub struct StderrAppenderDeserializer;

impl Deserialize for StderrAppenderDeserializer {
    type Trait = dyn Append;
    type Config = StderrAppenderConfig;

    fn deserialize(
        &self,
        config: Self::Config,
        deserializers: &Deserializers,
    ) -> anyhow::Result<Box<Self::Trait>> {
        let encoder = deserializers.deserialize(&config.encoder.kind, config.encoder.config)?;
        let color = config.color.unwrap_or_else(|| io::stderr().is_terminal());

        Ok(Box::new(StderrAppender { encoder, color }))
    }
}

#[derive(Debug)]
struct RecordWriter {
    color: bool,
    buf: ArrayVec<u8, WRITE_BUF_SIZE>,
}

impl RecordWriter {
    fn push(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.buf.remaining_capacity() < bytes.len() {
            self.flush()?;
        }

        if bytes.len() > self.buf.capacity() {
            // oversized record, write straight through
            io::stderr().write_all(bytes)
        } else {
            self.buf.write_all(bytes)
        }
    }
}

impl io::Write for RecordWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.push(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(&self.buf)?;
        self.buf.clear();
        stderr.flush()
    }
}

impl encode::Write for RecordWriter {
    fn set_style(&mut self, style: &Style) -> io::Result<()> {
        if !self.color {
            return Ok(());
        }

        self.push(RESET.as_bytes())?;

        if let Some(text) = style.text {
            let code = format!("\x1b[{}m", 30 + color_offset(text));
            self.push(code.as_bytes())?;
        }

        if let Some(background) = style.background {
            let code = format!("\x1b[{}m", 40 + color_offset(background));
            self.push(code.as_bytes())?;
        }

        if style.intense == Some(true) {
            self.push(BOLD.as_bytes())?;
        }

        Ok(())
    }
}

fn color_offset(color: Color) -> u8 {
    match color {
        Color::Black => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Yellow => 3,
        Color::Blue => 4,
        Color::Magenta => 5,
        Color::Cyan => 6,
        Color::White => 7,
    }
}
