//! The tagged-union value model shared by arrays, dicts, and indirect objects.

use std::io::{self, Write};
use std::rc::Rc;
use std::cell::RefCell;

use crate::atom::Atom;
use crate::outstream::OutStream;
use crate::xref::Reference;

pub type ArrayHandle = Rc<RefCell<crate::array::PdfArray>>;
pub type DictHandle = Rc<RefCell<crate::dict::Dict>>;

/// A PDF string, literal `(...)` or hex `<...>`. FileID components and other
/// binary payloads use [`PdfString::hex`]; text uses [`PdfString::literal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PdfString {
    Literal(Vec<u8>),
    Hex(Vec<u8>),
}

impl PdfString {
    pub fn literal(bytes: impl Into<Vec<u8>>) -> Self {
        PdfString::Literal(bytes.into())
    }

    pub fn hex(bytes: impl Into<Vec<u8>>) -> Self {
        PdfString::Hex(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PdfString::Literal(b) | PdfString::Hex(b) => b,
        }
    }

    /// Writes the string in its PDF textual representation.
    pub fn write<W: Write>(&self, out: &mut OutStream<W>) -> io::Result<()> {
        match self {
            PdfString::Literal(bytes) => {
                out.put_byte(b'(')?;
                for &b in bytes {
                    match b {
                        b'(' => out.put_cstr("\\(")?,
                        b')' => out.put_cstr("\\)")?,
                        b'\\' => out.put_cstr("\\\\")?,
                        0x00..=0x1F => out.put_cstr(&format!("\\{b:03o}"))?,
                        _ => out.put_byte(b)?,
                    }
                }
                out.put_byte(b')')
            }
            PdfString::Hex(bytes) => {
                out.put_byte(b'<')?;
                for &b in bytes {
                    out.put_hex(b)?;
                }
                out.put_byte(b'>')
            }
        }
    }
}

/// The tagged-union value stored in arrays, dict entries, and indirect objects.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Real(f64),
    Atom(Atom),
    String(PdfString),
    Array(ArrayHandle),
    Dict(DictHandle),
    /// A non-owning, cycle-safe pointer to an indirect object in the xref table.
    Reference(Reference),
    /// The sentinel returned by fallible accessors instead of propagating.
    Error,
}

impl Value {
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<Atom> {
        match self {
            Value::Atom(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayHandle> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&DictHandle> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<Reference> {
        match self {
            Value::Reference(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Real(n)
    }
}

impl From<Atom> for Value {
    fn from(a: Atom) -> Self {
        Value::Atom(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(s: &PdfString) -> String {
        let mut out = OutStream::new(Vec::new());
        s.write(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn literal_escapes_parens_and_backslash() {
        let s = PdfString::literal(*b"a(b)c\\d");
        assert_eq!(rendered(&s), r"(a\(b\)c\\d)");
    }

    #[test]
    fn literal_escapes_control_bytes_as_octal() {
        let s = PdfString::literal(vec![0x00, 0x09, 0x1F]);
        assert_eq!(rendered(&s), "(\\000\\011\\037)");
    }

    #[test]
    fn hex_renders_uppercase_pairs() {
        let s = PdfString::hex(vec![0xDE, 0xAD, 0x00, 0xFF]);
        assert_eq!(rendered(&s), "<DEAD00FF>");
    }

    #[test]
    fn accessors_narrow_by_variant() {
        assert_eq!(Value::Int(5).as_int(), Some(5));
        assert_eq!(Value::Bool(true).as_int(), None);
        assert!(Value::Error.is_error());
        assert!(Value::Null.is_null());
    }
}
