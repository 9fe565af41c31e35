//! Output sinks for forwarded events

use std::io::{self, Write};

use crate::WatchEvent;

/// Destination for events that passed the filter
pub trait EventSink {
    fn emit(&mut self, event: &WatchEvent) -> io::Result<()>;
}

/// Writes one formatted line per event, flushing after each
#[derive(Debug)]
pub struct LineSink<W: Write> {
    writer: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl LineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> EventSink for LineSink<W> {
    fn emit(&mut self, event: &WatchEvent) -> io::Result<()> {
        writeln!(self.writer, "{event}")?;
        self.writer.flush()
    }
}

impl<F> EventSink for F
where
    F: FnMut(&WatchEvent) -> io::Result<()>,
{
    fn emit(&mut self, event: &WatchEvent) -> io::Result<()> {
        self(event)
    }
}
