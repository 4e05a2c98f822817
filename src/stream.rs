//! Stream objects: a dict whose body is produced lazily, push-mode, at
//! write time, rather than built up in memory ahead of serialization.

use std::io::{self, Write};

use crate::dict::Dict;
use crate::value::DictHandle;

/// The push-mode consumer handed to a stream's producer closure.
///
/// Wraps an arbitrary `Write` so that [`Dict`] (and its producer closure
/// type) stay free of a sink type parameter.
pub struct DataSink<'a> {
    sink: &'a mut dyn Write,
    bytes_written: u64,
}

impl<'a> DataSink<'a> {
    pub fn new(sink: &'a mut dyn Write) -> Self {
        DataSink { sink, bytes_written: 0 }
    }

    pub fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.sink.write_all(buf)?;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

/// Marks `dict` as a stream object whose body is produced by `producer`
/// when the object is serialized.
pub fn make_stream(dict: &DictHandle, producer: impl FnMut(&mut DataSink) -> io::Result<()> + 'static) {
    dict.borrow_mut().make_stream(producer);
}

/// Invokes `dict`'s producer against `sink`, returning the number of bytes
/// written. Does nothing (and returns `0`) if `dict` is not a stream or
/// carries no producer.
pub fn run_producer(dict: &DictHandle, sink: &mut dyn Write) -> io::Result<u64> {
    let mut dict = dict.borrow_mut();
    if !dict.is_stream() {
        return Ok(0);
    }
    let Some(producer) = dict.producer_mut() else {
        return Ok(0);
    };
    let mut data_sink = DataSink::new(sink);
    producer(&mut data_sink)?;
    Ok(data_sink.bytes_written())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn producer_runs_against_the_given_sink_and_reports_length() {
        let dict = Dict::handle();
        make_stream(&dict, |sink| sink.write(b"hello"));
        let mut buf = Vec::new();
        let written = run_producer(&dict, &mut buf).unwrap();
        assert_eq!(buf, b"hello");
        assert_eq!(written, 5);
    }

    #[test]
    fn non_stream_dict_produces_nothing() {
        let dict = Dict::handle();
        let mut buf = Vec::new();
        let written = run_producer(&dict, &mut buf).unwrap();
        assert!(buf.is_empty());
        assert_eq!(written, 0);
    }
}
