//! A thin CLI demo: build a minimal PDF/raster file from raw strip bytes,
//! or recognize and page-count an existing one.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use pdfraster_core::atom::{AtomTable, StdAtom};
use pdfraster_core::content::ContentGenerator;
use pdfraster_core::envelope::{write_endofdocument, write_pdf_header};
use pdfraster_core::outstream::OutStream;
use pdfraster_core::reader::{FileSource, Reader};
use pdfraster_core::standard;
use pdfraster_core::value::Value;
use pdfraster_core::xref::Xref;
use pdfraster_core::{DocumentDefaults, PdfError};

#[derive(Parser)]
#[command(name = "pdfraster_demo", about = "Build or inspect PDF/raster files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a one-page PDF/raster file around a single raw image strip.
    Build {
        /// Path to write the PDF/raster file to.
        #[arg(long)]
        out: PathBuf,
        /// Page width in device pixels.
        #[arg(long, default_value_t = 1600)]
        width: i32,
        /// Page height in device pixels.
        #[arg(long, default_value_t = 2200)]
        height: i32,
    },
    /// Report whether a file is recognizable PDF/raster, and its page count.
    Inspect {
        /// Path to the file to inspect.
        path: PathBuf,
    },
}

fn main() -> Result<(), PdfError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Build { out, width, height } => build(&out, width, height),
        Command::Inspect { path } => inspect(&path),
    }
}

fn build(out_path: &std::path::Path, width: i32, height: i32) -> Result<(), PdfError> {
    let defaults = DocumentDefaults::default();
    let mut atoms = AtomTable::with_standard_atoms();
    let mut xref = Xref::new();

    let catalog = standard::catalog_new(&mut xref);
    let info = standard::info_new(&mut xref);
    if let Value::Dict(d) = xref.reference_get_value(info) {
        d.borrow_mut().put(
            StdAtom::Producer.atom(),
            Value::String(pdfraster_core::PdfString::literal(defaults.producer.clone())),
        );
        d.borrow_mut().put(
            StdAtom::Creator.atom(),
            Value::String(pdfraster_core::PdfString::literal(defaults.creator.clone())),
        );
        d.borrow_mut().put(StdAtom::Title.atom(), Value::String(standard::make_now_string()));
    }

    let created = standard::make_now_xmp_string();
    let metadata = standard::metadata_new(&mut xref, move |sink| {
        sink.write(
            format!(
                "<?xpacket begin=\"\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\
                 <x:xmpmeta xmlns:x=\"adobe:ns:meta/\">\
                 <rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\
                 <rdf:Description rdf:about=\"\" xmlns:xmp=\"http://ns.adobe.com/xap/1.0/\">\
                 <xmp:CreateDate>{created}</xmp:CreateDate>\
                 </rdf:Description>\
                 </rdf:RDF>\
                 </x:xmpmeta>\
                 <?xpacket end=\"w\"?>"
            )
            .as_bytes(),
        )
    });
    if let Value::Dict(d) = xref.reference_get_value(catalog) {
        d.borrow_mut().put(StdAtom::Metadata.atom(), Value::Reference(metadata));
    }

    let page = standard::page_new_simple(&mut xref, catalog, width as f64, height as f64);
    standard::catalog_add_page(&xref, catalog, page);

    let image = xref.make_reference(Value::Dict(pdfraster_core::Dict::handle()));
    let strip_name = atoms.intern("strip0");
    standard::page_add_image(&xref, page, strip_name, image);

    let contents = standard::contents_new(&mut xref, move |sink| {
        let mut gen = ContentGenerator::new(Vec::new());
        gen.gsave()?;
        gen.concat_matrix(width as f64, 0.0, 0.0, height as f64, 0.0, 0.0)?;
        gen.xobject("strip0")?;
        gen.grestore()?;
        sink.write(&gen.into_inner())
    });
    if let Value::Dict(page_dict) = xref.reference_get_value(page) {
        page_dict.borrow_mut().put(StdAtom::Contents.atom(), Value::Reference(contents));
    }

    let file = std::fs::File::create(out_path)?;
    let mut out = OutStream::new(file);
    write_pdf_header(&mut out, defaults.pdf_version_major, defaults.pdf_version_minor)?;
    write_endofdocument(&mut out, Some(&mut xref), &atoms, Some(catalog), Some(info))?;
    info!(path = %out_path.display(), "wrote PDF/raster file");
    Ok(())
}

fn inspect(path: &std::path::Path) -> Result<(), PdfError> {
    let mut source = FileSource::open(path)?;
    if !pdfraster_core::reader::recognize(&mut source) {
        println!("{}: not a PDF/raster file", path.display());
        return Ok(());
    }
    let reader = Reader::open(&mut source)?;
    match reader.page_count() {
        Some(n) => println!("{}: PDF/raster, {} page(s)", path.display(), n),
        None => println!("{}: PDF/raster, page count unavailable", path.display()),
    }
    Ok(())
}
