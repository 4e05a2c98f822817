//! The read side: signature sniffing, xref/trailer location, and page
//! counting. Deliberately narrow — not a general PDF parser, only enough
//! structure-walking to answer "is this PDF/raster" and "how many pages".
//!
//! Grounded on `examples/original_source/pdfras_reader/pdfrasread_files.c`'s
//! file-based convenience wrappers (`recognize_file`, `page_count_file`,
//! `open_file`), adapted to a source-agnostic [`ByteSource`].

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::PdfError;
use crate::xref::Reference;

/// The read-side equivalent of the platform `read`/`size`/`close` triad.
pub trait ByteSource {
    fn size(&self) -> u64;
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;
}

/// A [`ByteSource`] backed by an open file, in the style of the C original's
/// `file_reader`/`file_sizer` pair (seek-then-read).
pub struct FileSource {
    file: File,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(FileSource { file: File::open(path)? })
    }
}

impl ByteSource for FileSource {
    fn size(&self) -> u64 {
        self.file.metadata().map(|m| m.len()).unwrap_or(0)
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read(buf)
    }
}

/// A [`ByteSource`] backed by an in-memory byte slice.
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data }
    }
}

impl<'a> ByteSource for SliceSource<'a> {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let offset = offset as usize;
        if offset >= self.data.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.data.len() - offset);
        buf[..n].copy_from_slice(&self.data[offset..offset + n]);
        Ok(n)
    }
}

fn starts_with_pdf_signature(text: &str) -> bool {
    let Some(rest) = text.strip_prefix("%PDF-") else { return false };
    let bytes = rest.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

fn contains_raster_marker(text: &str) -> bool {
    const MARKER: &str = "%PDF-raster_";
    let mut search_from = 0;
    while let Some(pos) = text[search_from..].find(MARKER) {
        let start = search_from + pos + MARKER.len();
        let bytes = text.as_bytes();
        if start + 3 <= bytes.len()
            && bytes[start].is_ascii_digit()
            && bytes[start + 1] == b'.'
            && bytes[start + 2].is_ascii_digit()
        {
            return true;
        }
        search_from = start;
    }
    false
}

fn read_all(source: &mut dyn ByteSource) -> io::Result<Vec<u8>> {
    let len = source.size() as usize;
    let mut data = vec![0u8; len];
    let mut total = 0;
    while total < len {
        let n = source.read_at(total as u64, &mut data[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    data.truncate(total);
    Ok(data)
}

/// Returns true iff `source`'s first bytes carry a recognizable PDF/raster signature.
pub fn recognize(source: &mut dyn ByteSource) -> bool {
    let mut head = vec![0u8; 1024.min(source.size() as usize)];
    if source.read_at(0, &mut head).unwrap_or(0) == 0 {
        return false;
    }
    let text = String::from_utf8_lossy(&head);
    starts_with_pdf_signature(&text) && contains_raster_marker(&text)
}

struct XrefEntry {
    offset: u64,
    #[allow(dead_code)]
    generation: u16,
    in_use: bool,
}

/// A recognized document, positioned enough to answer structural queries.
pub struct Reader {
    data: Vec<u8>,
    entries: Vec<XrefEntry>,
    root: Reference,
    size: u32,
}

fn find_int_after(text: &str, key: &str) -> Option<i64> {
    let pos = text.find(key)?;
    let rest = text[pos + key.len()..].trim_start();
    let end = rest.find(|c: char| !(c.is_ascii_digit() || c == '-')).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    rest[..end].parse().ok()
}

fn find_reference_after(text: &str, key: &str) -> Option<Reference> {
    let pos = text.find(key)?;
    let rest = text[pos + key.len()..].trim_start();
    let mut parts = rest.split_whitespace();
    let object_number: u32 = parts.next()?.parse().ok()?;
    let generation: u16 = parts.next()?.parse().ok()?;
    (parts.next()? == "R").then_some(Reference { object_number, generation })
}

impl Reader {
    /// Locates `%%EOF` / `startxref` / the xref subsection / the trailer,
    /// and decodes just enough to support [`Reader::page_count`].
    pub fn open(source: &mut dyn ByteSource) -> Result<Self, PdfError> {
        let data = read_all(source)?;
        let text = String::from_utf8_lossy(&data);

        if !starts_with_pdf_signature(&text) || !contains_raster_marker(&text) {
            return Err(PdfError::NotRecognized);
        }

        let eof_pos = text.rfind("%%EOF").ok_or(PdfError::Malformed("missing %%EOF"))?;
        let startxref_kw =
            text[..eof_pos].rfind("startxref").ok_or(PdfError::Malformed("missing startxref"))?;
        let offset_text = &text[startxref_kw + "startxref".len()..eof_pos];
        let startxref: usize =
            offset_text.trim().parse().map_err(|_| PdfError::Malformed("bad startxref offset"))?;

        let xref_text = text.get(startxref..).ok_or(PdfError::Malformed("startxref out of range"))?;
        let mut lines = xref_text.lines();
        if lines.next() != Some("xref") {
            return Err(PdfError::Malformed("expected xref keyword"));
        }
        let header = lines.next().ok_or(PdfError::Malformed("missing xref subsection header"))?;
        let mut header_parts = header.split_whitespace();
        let _start: u32 = header_parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(PdfError::Malformed("bad xref header"))?;
        let count: u32 = header_parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(PdfError::Malformed("bad xref header"))?;

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let line = lines.next().ok_or(PdfError::Malformed("truncated xref"))?;
            let mut parts = line.split_whitespace();
            let offset: u64 =
                parts.next().and_then(|s| s.parse().ok()).ok_or(PdfError::Malformed("bad xref entry"))?;
            let generation: u16 =
                parts.next().and_then(|s| s.parse().ok()).ok_or(PdfError::Malformed("bad xref entry"))?;
            let kind = parts.next().ok_or(PdfError::Malformed("bad xref entry"))?;
            entries.push(XrefEntry { offset, generation, in_use: kind == "n" });
        }

        let trailer_pos = xref_text.find("trailer").ok_or(PdfError::Malformed("missing trailer"))?;
        let trailer_text = &xref_text[trailer_pos..];
        let size = find_int_after(trailer_text, "/Size").ok_or(PdfError::Malformed("missing /Size"))?;
        let root = find_reference_after(trailer_text, "/Root").ok_or(PdfError::Malformed("missing /Root"))?;

        Ok(Reader { data, entries, root, size: size as u32 })
    }

    fn object_body(&self, r: Reference) -> Option<&str> {
        let entry = self.entries.get((r.object_number as usize).checked_sub(1)?)?;
        if !entry.in_use {
            return None;
        }
        let text = std::str::from_utf8(&self.data).ok()?;
        let slice = text.get(entry.offset as usize..)?;
        let obj_kw = slice.find("obj")?;
        let end = slice.find("endobj")?;
        slice.get(obj_kw + 3..end)
    }

    /// `/Root → /Pages → /Count`.
    pub fn page_count(&self) -> Option<u32> {
        let root_body = self.object_body(self.root)?;
        let pages_ref = find_reference_after(root_body, "/Pages")?;
        let pages_body = self.object_body(pages_ref)?;
        find_int_after(pages_body, "/Count").map(|n| n as u32)
    }

    pub fn trailer_size(&self) -> u32 {
        self.size
    }

    pub fn root(&self) -> Reference {
        self.root
    }
}
