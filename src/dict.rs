//! Key/value dictionaries, including the stream-object variant.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crate::atom::Atom;
use crate::stream::DataSink;
use crate::value::{DictHandle, Value};

type Producer = Box<dyn FnMut(&mut DataSink) -> io::Result<()>>;

/// A PDF dictionary. When [`Dict::is_stream`] is set, the dictionary also
/// carries a producer closure invoked at write time to fill a stream body;
/// see `crate::stream`.
pub struct Dict {
    entries: Vec<(Atom, Value)>,
    is_stream: bool,
    producer: Option<Producer>,
}

impl Dict {
    pub fn new() -> Self {
        Dict { entries: Vec::new(), is_stream: false, producer: None }
    }

    pub fn handle() -> DictHandle {
        Rc::new(RefCell::new(Dict::new()))
    }

    /// Inserts or overwrites `key`. A no-op if `key` is the undefined atom:
    /// the undefined atom can never appear as a dict key after a successful put.
    pub fn put(&mut self, key: Atom, value: Value) {
        if key.is_undefined() {
            return;
        }
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Returns the value for `key`, or [`Value::Error`] if absent.
    pub fn get(&self, key: Atom) -> Value {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Error)
    }

    pub fn contains(&self, key: Atom) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Visits each entry in insertion order; stops early if `f` returns `false`.
    pub fn foreach(&self, mut f: impl FnMut(Atom, &Value) -> bool) {
        for (k, v) in &self.entries {
            if !f(*k, v) {
                break;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Atom, Value)> {
        self.entries.iter()
    }

    pub fn is_stream(&self) -> bool {
        self.is_stream
    }

    /// Marks this dict as a stream object, installing the producer that
    /// will be called to write the stream body at serialization time.
    pub fn make_stream(&mut self, producer: impl FnMut(&mut DataSink) -> io::Result<()> + 'static) {
        self.is_stream = true;
        self.producer = Some(Box::new(producer));
    }

    pub fn producer_mut(&mut self) -> Option<&mut Producer> {
        self.producer.as_mut()
    }
}

impl Default for Dict {
    fn default() -> Self {
        Dict::new()
    }
}
