//! Construction of the standard PDF/raster objects: Catalog, Pages, Page,
//! Contents, Info, Metadata, and the trailer's FileID.
//!
//! Grounded on `examples/original_source/pdfras_writer/PdfStandardObjects.c`.

use std::io;

use chrono::{DateTime, Datelike, Local, Timelike};
use md5::{Digest, Md5};

use crate::array::PdfArray;
use crate::atom::{Atom, AtomTable, StdAtom};
use crate::dict::Dict;
use crate::stream::DataSink;
use crate::value::{DictHandle, PdfString, Value};
use crate::xref::{Reference, Xref};

/// Resolves `value` to the dict it denotes, following one reference if needed.
/// Mirrors the C original's implicit reference-dereferencing in `pd_dict_get`.
fn resolve_dict(xref: &Xref, value: &Value) -> Option<DictHandle> {
    match value {
        Value::Dict(d) => Some(d.clone()),
        Value::Reference(r) => xref.reference_get_value(*r).as_dict().cloned(),
        _ => None,
    }
}

/// Creates the `/Catalog` and its `/Pages` node, both as indirect objects.
pub fn catalog_new(xref: &mut Xref) -> Reference {
    let pages_dict = Dict::handle();
    pages_dict.borrow_mut().put(StdAtom::Type.atom(), Value::Atom(StdAtom::Pages.atom()));
    pages_dict.borrow_mut().put(StdAtom::Kids.atom(), Value::Array(PdfArray::handle(10)));
    pages_dict.borrow_mut().put(StdAtom::Count.atom(), Value::Int(0));
    let pages_ref = xref.make_reference(Value::Dict(pages_dict));

    let catalog_dict = Dict::handle();
    catalog_dict.borrow_mut().put(StdAtom::Type.atom(), Value::Atom(StdAtom::Catalog.atom()));
    catalog_dict.borrow_mut().put(StdAtom::Pages.atom(), Value::Reference(pages_ref));
    xref.make_reference(Value::Dict(catalog_dict))
}

/// Creates an empty `/Info` dictionary as an indirect object.
pub fn info_new(xref: &mut Xref) -> Reference {
    xref.make_reference(Value::Dict(Dict::handle()))
}

/// Appends `page` to the catalog's page tree and bumps `/Count`.
pub fn catalog_add_page(xref: &Xref, catalog: Reference, page: Reference) {
    let catalog_dict = resolve_dict(xref, &Value::Reference(catalog)).expect("catalog must be a dict");
    let pages_value = catalog_dict.borrow().get(StdAtom::Pages.atom());
    let pages_dict = resolve_dict(xref, &pages_value).expect("catalog's /Pages must be a dict");

    let kids_value = pages_dict.borrow().get(StdAtom::Kids.atom());
    if let Value::Array(kids) = kids_value {
        kids.borrow_mut().add(Value::Reference(page));
    }
    let count = pages_dict.borrow().get(StdAtom::Count.atom()).as_int().unwrap_or(0);
    pages_dict.borrow_mut().put(StdAtom::Count.atom(), Value::Int(count + 1));
}

/// Creates a simple, single-MediaBox page with an empty `/Resources/XObject`
/// subdict ready to receive images, and links it to `catalog`'s page tree
/// node as its `/Parent`.
pub fn page_new_simple(xref: &mut Xref, catalog: Reference, width: f64, height: f64) -> Reference {
    let catalog_dict = resolve_dict(xref, &Value::Reference(catalog)).expect("catalog must be a dict");
    let pages_value = catalog_dict.borrow().get(StdAtom::Pages.atom());

    let xobject_dict = Dict::handle();
    let resources = Dict::handle();
    resources.borrow_mut().put(StdAtom::XObject.atom(), Value::Dict(xobject_dict));

    let page_dict = Dict::handle();
    page_dict.borrow_mut().put(StdAtom::Type.atom(), Value::Atom(StdAtom::Page.atom()));
    page_dict.borrow_mut().put(StdAtom::Parent.atom(), pages_value);
    page_dict.borrow_mut().put(
        StdAtom::MediaBox.atom(),
        Value::Array(PdfArray::build_floats(&[0.0, 0.0, width, height])),
    );
    page_dict.borrow_mut().put(StdAtom::Resources.atom(), Value::Dict(resources));

    xref.make_reference(Value::Dict(page_dict))
}

/// Registers `image` under `image_name` in `page`'s `/Resources/XObject` subdict.
pub fn page_add_image(xref: &Xref, page: Reference, image_name: Atom, image: Reference) {
    let page_dict = resolve_dict(xref, &Value::Reference(page)).expect("page must be a dict");
    let resources = resolve_dict(xref, &page_dict.borrow().get(StdAtom::Resources.atom()))
        .expect("page must have /Resources");
    let xobject = resolve_dict(xref, &resources.borrow().get(StdAtom::XObject.atom()))
        .expect("/Resources must have /XObject");
    xobject.borrow_mut().put(image_name, Value::Reference(image));
}

/// Creates a page content stream whose body is produced by `producer`, with
/// its `/Length` resolved automatically once the body has been written.
pub fn contents_new(
    xref: &mut Xref,
    producer: impl FnMut(&mut DataSink) -> io::Result<()> + 'static,
) -> Reference {
    let dict = Dict::handle();
    crate::stream::make_stream(&dict, producer);
    let length_ref = xref.create_forward_reference();
    dict.borrow_mut().put(StdAtom::Length.atom(), Value::Reference(length_ref));
    xref.make_reference(Value::Dict(dict))
}

/// Creates an XMP metadata stream (`/Type /Metadata /Subtype /XML`).
pub fn metadata_new(
    xref: &mut Xref,
    producer: impl FnMut(&mut DataSink) -> io::Result<()> + 'static,
) -> Reference {
    let dict = Dict::handle();
    crate::stream::make_stream(&dict, producer);
    dict.borrow_mut().put(StdAtom::Type.atom(), Value::Atom(StdAtom::Metadata.atom()));
    dict.borrow_mut().put(StdAtom::Subtype.atom(), Value::Atom(StdAtom::Xml.atom()));
    let length_ref = xref.create_forward_reference();
    dict.borrow_mut().put(StdAtom::Length.atom(), Value::Reference(length_ref));
    xref.make_reference(Value::Dict(dict))
}

/// Builds the trailer dict (`/Size`, `/Root`, optionally `/Info`). The
/// caller writes `/ID` and the explicit key order itself; see `envelope.rs`.
pub fn trailer_new(xref: &Xref, catalog: Reference, info: Option<Reference>) -> DictHandle {
    let trailer = Dict::handle();
    trailer.borrow_mut().put(StdAtom::Size.atom(), Value::Int((xref.count() + 1) as i32));
    trailer.borrow_mut().put(StdAtom::Root.atom(), Value::Reference(catalog));
    if let Some(info) = info {
        trailer.borrow_mut().put(StdAtom::Info.atom(), Value::Reference(info));
    }
    trailer
}

/// Hashes every string-valued entry of `info` into an MD5 digest and
/// returns a two-element array of the digest, as a binary (hex-string)
/// PDF string, repeated. This is the spec's FileID: same document produces
/// the same two halves unless and until it is genuinely modified.
pub fn generate_file_id(xref: &Xref, info: Option<Reference>) -> Value {
    let info_dict = info.and_then(|info| resolve_dict(xref, &Value::Reference(info)));
    let mut hasher = Md5::new();
    if let Some(info_dict) = info_dict {
        info_dict.borrow().foreach(|_atom, value| {
            if let Value::String(s) = value {
                hasher.update(s.as_bytes());
            }
            true
        });
    }
    let digest = hasher.finalize();
    let bytes = digest.to_vec();
    Value::Array(PdfArray::build(vec![
        Value::String(PdfString::hex(bytes.clone())),
        Value::String(PdfString::hex(bytes)),
    ]))
}

/// Formats a PDF date string: `D:YYYYMMDDHHmmSS<+|->HH'mm`.
pub fn make_time_string(time: DateTime<Local>) -> PdfString {
    let (sign, off_min) = utc_offset_minutes(time);
    PdfString::literal(format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{}{:02}'{:02}",
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second(),
        sign,
        off_min / 60,
        off_min % 60,
    ))
}

pub fn make_now_string() -> PdfString {
    make_time_string(Local::now())
}

/// Formats an XMP date string: `YYYY-MM-DDThh:mm:ss<+|->hh:mm`.
pub fn make_xmp_time_string(time: DateTime<Local>) -> String {
    let (sign, off_min) = utc_offset_minutes(time);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}{:02}:{:02}",
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second(),
        sign,
        off_min / 60,
        off_min % 60,
    )
}

pub fn make_now_xmp_string() -> String {
    make_xmp_time_string(Local::now())
}

fn utc_offset_minutes(time: DateTime<Local>) -> (char, i64) {
    let total = time.offset().local_minus_utc() as i64 / 60;
    if total < 0 { ('-', -total) } else { ('+', total) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn catalog_starts_with_an_empty_page_tree() {
        let mut xref = Xref::new();
        let catalog = catalog_new(&mut xref);
        let catalog_dict = resolve_dict(&xref, &Value::Reference(catalog)).unwrap();
        let pages_value = catalog_dict.borrow().get(StdAtom::Pages.atom());
        let pages_dict = resolve_dict(&xref, &pages_value).unwrap();
        assert_eq!(pages_dict.borrow().get(StdAtom::Count.atom()).as_int(), Some(0));
    }

    #[test]
    fn adding_pages_updates_kids_and_count() {
        let mut xref = Xref::new();
        let catalog = catalog_new(&mut xref);
        let page1 = page_new_simple(&mut xref, catalog, 1600.0, 2200.0);
        let page2 = page_new_simple(&mut xref, catalog, 1600.0, 2200.0);
        catalog_add_page(&xref, catalog, page1);
        catalog_add_page(&xref, catalog, page2);

        let catalog_dict = resolve_dict(&xref, &Value::Reference(catalog)).unwrap();
        let pages_dict = resolve_dict(&xref, &catalog_dict.borrow().get(StdAtom::Pages.atom())).unwrap();
        assert_eq!(pages_dict.borrow().get(StdAtom::Count.atom()).as_int(), Some(2));
        let kids = pages_dict.borrow().get(StdAtom::Kids.atom());
        if let Value::Array(kids) = kids {
            assert_eq!(kids.borrow().count(), 2);
        } else {
            panic!("expected array");
        }
    }

    #[test]
    fn page_add_image_registers_under_resources_xobject() {
        let mut atoms = AtomTable::with_standard_atoms();
        let mut xref = Xref::new();
        let catalog = catalog_new(&mut xref);
        let page = page_new_simple(&mut xref, catalog, 100.0, 100.0);
        let image = xref.make_reference(Value::Dict(Dict::handle()));
        let strip0 = atoms.intern("strip0");
        page_add_image(&xref, page, strip0, image);

        let page_dict = resolve_dict(&xref, &Value::Reference(page)).unwrap();
        let resources = resolve_dict(&xref, &page_dict.borrow().get(StdAtom::Resources.atom())).unwrap();
        let xobject = resolve_dict(&xref, &resources.borrow().get(StdAtom::XObject.atom())).unwrap();
        assert!(xobject.borrow().contains(strip0));
    }

    #[test]
    fn trailer_size_is_one_past_the_highest_object_number() {
        let mut xref = Xref::new();
        let catalog = catalog_new(&mut xref);
        let info = info_new(&mut xref);
        let trailer = trailer_new(&xref, catalog, Some(info));
        assert_eq!(
            trailer.borrow().get(StdAtom::Size.atom()).as_int(),
            Some((xref.count() + 1) as i32)
        );
    }

    #[test]
    fn metadata_stream_carries_type_and_subtype() {
        let mut xref = Xref::new();
        let metadata = metadata_new(&mut xref, |sink| sink.write(b"<x:xmpmeta/>"));
        let dict = resolve_dict(&xref, &Value::Reference(metadata)).unwrap();
        assert_eq!(dict.borrow().get(StdAtom::Type.atom()).as_atom(), Some(StdAtom::Metadata.atom()));
        assert_eq!(dict.borrow().get(StdAtom::Subtype.atom()).as_atom(), Some(StdAtom::Xml.atom()));
    }

    #[test]
    fn file_id_halves_are_identical_and_sixteen_bytes() {
        let mut xref = Xref::new();
        let info = info_new(&mut xref);
        let info_dict = resolve_dict(&xref, &Value::Reference(info)).unwrap();
        info_dict.borrow_mut().put(StdAtom::Producer.atom(), Value::String(PdfString::literal("pdfraster")));
        let id = generate_file_id(&xref, Some(info));
        let Value::Array(arr) = id else { panic!("expected array") };
        let arr = arr.borrow();
        assert_eq!(arr.count(), 2);
        let (Value::String(a), Value::String(b)) = (arr.get(0), arr.get(1)) else {
            panic!("expected strings")
        };
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.as_bytes().len(), 16);
    }

    #[test]
    fn pdf_date_string_has_the_expected_shape() {
        let t = Local.with_ymd_and_hms(2015, 3, 14, 1, 37, 59).unwrap();
        let s = make_time_string(t);
        let text = String::from_utf8(s.as_bytes().to_vec()).unwrap();
        assert!(text.starts_with("D:20150314013759"));
        assert_eq!(text.len(), "D:20150314013759+00'00".len());
    }
}
