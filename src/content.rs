//! A pull-based content-stream generator: callers invoke the few operators
//! a PDF/raster page body needs (`q`/`cm`/`Do`/`Q`), and the generator
//! serializes each one space-separated into the underlying sink.

use std::io::{self, Write};

use crate::outstream::OutStream;

pub struct ContentGenerator<W: Write> {
    out: OutStream<W>,
}

impl<W: Write> ContentGenerator<W> {
    pub fn new(sink: W) -> Self {
        ContentGenerator { out: OutStream::new(sink) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn token(&mut self, s: &str) -> io::Result<()> {
        self.out.put_byte(b' ')?;
        self.out.put_cstr(s)
    }

    fn number(&mut self, value: f64) -> io::Result<()> {
        self.out.put_byte(b' ')?;
        self.out.put_float(value)
    }

    /// `q`: push the graphics state.
    pub fn gsave(&mut self) -> io::Result<()> {
        self.token("q")
    }

    /// `Q`: pop the graphics state.
    pub fn grestore(&mut self) -> io::Result<()> {
        self.token("Q")
    }

    /// `a b c d e f cm`: concatenate a matrix onto the current transform.
    pub fn concat_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> io::Result<()> {
        for v in [a, b, c, d, e, f] {
            self.number(v)?;
        }
        self.token("cm")
    }

    /// `/name Do`: paint the named XObject.
    pub fn xobject(&mut self, name: &str) -> io::Result<()> {
        self.token(&format!("/{name}"))?;
        self.token("Do")
    }
}
