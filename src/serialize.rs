//! Recursive textual serialization of [`Value`] trees.
//!
//! Stream bodies are not handled here: a stream dict is only ever written
//! through [`crate::xref::Xref::write_reference_declaration`], since PDF
//! requires stream objects to be indirect.

use std::io::{self, Write};

use crate::atom::AtomTable;
use crate::outstream::OutStream;
use crate::value::{DictHandle, Value};

pub fn write_value<W: Write>(out: &mut OutStream<W>, atoms: &AtomTable, value: &Value) -> io::Result<()> {
    match value {
        Value::Null => out.put_cstr("null"),
        Value::Error => out.put_cstr("null"),
        Value::Bool(b) => out.put_cstr(if *b { "true" } else { "false" }),
        Value::Int(n) => out.put_int(*n),
        Value::Real(f) => out.put_float(*f),
        Value::Atom(a) => {
            out.put_byte(b'/')?;
            out.put_cstr(atoms.name(*a).unwrap_or(""))
        }
        Value::String(s) => s.write(out),
        Value::Array(arr) => {
            let arr = arr.borrow();
            if arr.count() == 0 {
                return out.put_cstr("[ ]");
            }
            out.put_byte(b'[')?;
            for v in arr.iter() {
                out.put_byte(b' ')?;
                write_value(out, atoms, v)?;
            }
            out.put_cstr(" ]")
        }
        Value::Dict(d) => write_dict(out, atoms, d),
        Value::Reference(r) => {
            out.put_int(r.object_number as i32)?;
            out.put_byte(b' ')?;
            out.put_int(r.generation as i32)?;
            out.put_cstr(" R")
        }
    }
}

fn write_dict<W: Write>(out: &mut OutStream<W>, atoms: &AtomTable, handle: &DictHandle) -> io::Result<()> {
    let dict = handle.borrow();
    if dict.count() == 0 {
        return out.put_cstr("<< >>");
    }
    out.put_cstr("<<")?;
    for (k, v) in dict.iter() {
        out.put_cstr(" /")?;
        out.put_cstr(atoms.name(*k).unwrap_or(""))?;
        out.put_byte(b' ')?;
        write_value(out, atoms, v)?;
    }
    out.put_cstr(" >>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::PdfArray;
    use crate::atom::StdAtom;
    use crate::dict::Dict;
    use crate::value::PdfString;

    fn rendered(atoms: &AtomTable, value: &Value) -> String {
        let mut out = OutStream::new(Vec::new());
        write_value(&mut out, atoms, value).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn scalars_render_as_expected() {
        let atoms = AtomTable::with_standard_atoms();
        assert_eq!(rendered(&atoms, &Value::Null), "null");
        assert_eq!(rendered(&atoms, &Value::Bool(true)), "true");
        assert_eq!(rendered(&atoms, &Value::Int(-7)), "-7");
        assert_eq!(rendered(&atoms, &Value::Atom(StdAtom::Catalog.atom())), "/Catalog");
        assert_eq!(
            rendered(&atoms, &Value::String(PdfString::literal(*b"hi"))),
            "(hi)"
        );
    }

    #[test]
    fn empty_dict_renders_with_a_space() {
        let atoms = AtomTable::with_standard_atoms();
        let dict = Dict::handle();
        assert_eq!(rendered(&atoms, &Value::Dict(dict)), "<< >>");
    }

    #[test]
    fn dict_renders_entries_in_insertion_order() {
        let atoms = AtomTable::with_standard_atoms();
        let dict = Dict::handle();
        dict.borrow_mut().put(StdAtom::Type.atom(), Value::Atom(StdAtom::Catalog.atom()));
        dict.borrow_mut().put(StdAtom::Count.atom(), Value::Int(3));
        assert_eq!(
            rendered(&atoms, &Value::Dict(dict)),
            "<< /Type /Catalog /Count 3 >>"
        );
    }

    #[test]
    fn array_renders_space_bracketed_elements() {
        let atoms = AtomTable::with_standard_atoms();
        let arr = PdfArray::build_ints(&[0, 0, 1600, 2200]);
        assert_eq!(rendered(&atoms, &Value::Array(arr)), "[ 0 0 1600 2200 ]");
    }

    #[test]
    fn empty_array_renders_with_a_space() {
        let atoms = AtomTable::with_standard_atoms();
        let arr = PdfArray::handle(0);
        assert_eq!(rendered(&atoms, &Value::Array(arr)), "[ ]");
    }

    #[test]
    fn array_of_floats_matches_the_documented_golden_output() {
        let atoms = AtomTable::with_standard_atoms();
        let arr = PdfArray::build_floats(&[-1.0, 0.0 * -1.0, 0.376739502, 987654321.5]);
        assert_eq!(
            rendered(&atoms, &Value::Array(arr)),
            "[ -1 0 0.376739502 987654321.5 ]"
        );
    }
}
