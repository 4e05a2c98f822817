//! The outermost PDF/raster file shell: header, body, xref table, trailer.

use std::io::{self, Write};

use md5::{Digest, Md5};

use crate::atom::AtomTable;
use crate::outstream::OutStream;
use crate::serialize::write_value;
use crate::standard;
use crate::value::{PdfString, Value};
use crate::xref::{Reference, Xref};

/// Emits the fixed two-line PDF header plus the PDF/raster marker comment
/// that the recognizer looks for "near the header".
pub fn write_pdf_header<W: Write>(out: &mut OutStream<W>, major: u32, minor: u32) -> io::Result<()> {
    out.put_cstr(&format!("%PDF-{major}.{minor}\n"))?;
    out.put_byte(b'%')?;
    out.put_n(&[0xE2, 0xE3, 0xCF, 0xD3], 0, 4)?;
    out.put_byte(b'\n')?;
    out.put_cstr(&format!("%PDF-raster_{major}.{minor}\n"))
}

/// Writes the remaining pending indirect objects, the xref table, and the
/// trailer, finishing the file.
///
/// `xref: None` is "test mode": emits an empty xref and a `/Size 0` trailer
/// with the MD5-of-empty-input FileID, without any `/Root`.
pub fn write_endofdocument<W: Write>(
    out: &mut OutStream<W>,
    xref: Option<&mut Xref>,
    atoms: &AtomTable,
    root: Option<Reference>,
    info: Option<Reference>,
) -> io::Result<()> {
    let Some(xref) = xref else {
        let startxref = out.position();
        out.put_cstr("xref\n0 1\n0000000000 65535 f\r\n")?;
        let empty_digest = Md5::new().finalize();
        let id = Value::Array(crate::array::PdfArray::build(vec![
            Value::String(PdfString::hex(empty_digest.to_vec())),
            Value::String(PdfString::hex(empty_digest.to_vec())),
        ]));
        out.put_cstr("trailer\n<< /Size 0 /ID ")?;
        write_value(out, atoms, &id)?;
        out.put_cstr(" >>\n")?;
        out.put_cstr("startxref\n")?;
        out.put_cstr(&startxref.to_string())?;
        return out.put_cstr("\n%%EOF\n");
    };

    xref.write_all_pending(out, atoms)?;
    let startxref = out.position();
    xref.write_table(out)?;

    out.put_cstr("trailer\n<< /Size ")?;
    out.put_int((xref.count() + 1) as i32)?;
    if let Some(root) = root {
        out.put_cstr(" /Root ")?;
        write_value(out, atoms, &Value::Reference(root))?;
    }
    if let Some(info) = info {
        out.put_cstr(" /Info ")?;
        write_value(out, atoms, &Value::Reference(info))?;
    }
    out.put_cstr(" /ID ")?;
    let file_id = standard::generate_file_id(xref, info);
    write_value(out, atoms, &file_id)?;
    out.put_cstr(" >>\n")?;

    out.put_cstr("startxref\n")?;
    out.put_cstr(&startxref.to_string())?;
    out.put_cstr("\n%%EOF\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::StdAtom;

    #[test]
    fn header_contains_the_raster_marker_comment() {
        let mut out = OutStream::new(Vec::new());
        write_pdf_header(&mut out, 1, 4).unwrap();
        let text = String::from_utf8_lossy(&out.into_inner()).into_owned();
        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.contains("%PDF-raster_1.4\n"));
    }

    #[test]
    fn test_mode_trailer_uses_size_zero_and_empty_md5() {
        let atoms = AtomTable::with_standard_atoms();
        let mut out = OutStream::new(Vec::new());
        write_endofdocument(&mut out, None, &atoms, None, None).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("/Size 0"));
        assert!(text.contains("D41D8CD98F00B204E9800998ECF8427E"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn full_document_ends_with_startxref_and_eof() {
        let atoms = AtomTable::with_standard_atoms();
        let mut xref = Xref::new();
        let catalog = standard::catalog_new(&mut xref);
        let info = standard::info_new(&mut xref);
        {
            let info_dict = xref.reference_get_value(info);
            if let Value::Dict(d) = info_dict {
                d.borrow_mut().put(StdAtom::Producer.atom(), Value::String(PdfString::literal("pdfraster_core")));
            }
        }
        let page = standard::page_new_simple(&mut xref, catalog, 100.0, 100.0);
        standard::catalog_add_page(&xref, catalog, page);

        let mut out = OutStream::new(Vec::new());
        write_pdf_header(&mut out, 1, 4).unwrap();
        write_endofdocument(&mut out, Some(&mut xref), &atoms, Some(catalog), Some(info)).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.contains("trailer\n<< /Size "));
        assert!(text.contains("/Root "));
        assert!(text.contains("/ID "));
        assert!(text.trim_end().ends_with("%%EOF"));
    }
}
