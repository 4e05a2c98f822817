//! Interned PDF names (atoms).
//!
//! Two mechanisms exist, mirroring the C original's split between a fixed,
//! globally-known set of standard names (`PDA_*` constants in
//! `PdfStandardAtoms.h`) and the general-purpose intern table
//! (`PdfAtoms.c`) used for arbitrary, document-specific names such as
//! XObject resource names.

use std::collections::HashMap;

use from_to_repr::from_to_other;

/// An immutable interned name. `Atom(0)` is the reserved "undefined atom".
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Atom(pub u32);

impl Atom {
    pub const UNDEFINED: Atom = Atom(0);

    pub fn is_undefined(&self) -> bool {
        *self == Atom::UNDEFINED
    }
}

impl Default for Atom {
    fn default() -> Self {
        Atom::UNDEFINED
    }
}

/// The closed set of standard PDF/raster names, each with a stable id.
/// When an [`AtomTable`] is built via [`AtomTable::with_standard_atoms`],
/// a standard atom's `Atom` identifier is exactly `Atom(self as u32)`.
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u32, derive_compare = "as_int")]
pub enum StdAtom {
    Undefined = 0,
    Type = 1,
    Catalog = 2,
    Pages = 3,
    Kids = 4,
    Count = 5,
    Page = 6,
    Parent = 7,
    MediaBox = 8,
    Resources = 9,
    XObject = 10,
    Length = 11,
    Size = 12,
    Root = 13,
    Info = 14,
    Metadata = 15,
    Subtype = 16,
    Xml = 17,
    DeviceRgb = 18,
    Producer = 19,
    Title = 20,
    Subject = 21,
    Creator = 22,
    Author = 23,
    Contents = 24,
    None = 25,
    Other(u32),
}

const STD_ATOM_NAMES: &[&str] = &[
    "", // 0: undefined, never interned as a real name
    "Type",
    "Catalog",
    "Pages",
    "Kids",
    "Count",
    "Page",
    "Parent",
    "MediaBox",
    "Resources",
    "XObject",
    "Length",
    "Size",
    "Root",
    "Info",
    "Metadata",
    "Subtype",
    "XML",
    "DeviceRGB",
    "Producer",
    "Title",
    "Subject",
    "Creator",
    "Author",
    "Contents",
    "None",
];

impl StdAtom {
    pub fn name(&self) -> &'static str {
        STD_ATOM_NAMES[u32::from(*self) as usize]
    }

    pub fn atom(&self) -> Atom {
        Atom(u32::from(*self))
    }
}

/// An intern table mapping name strings to stable [`Atom`] identifiers.
pub struct AtomTable {
    names: Vec<Box<str>>,
    lookup: HashMap<Box<str>, Atom>,
}

impl AtomTable {
    /// A table with no entries yet; `count()` is `0` until the first `intern`.
    pub fn new(initial_capacity: usize) -> Self {
        AtomTable {
            names: Vec::with_capacity(initial_capacity),
            lookup: HashMap::with_capacity(initial_capacity),
        }
    }

    /// A table pre-loaded with the standard names at their stable ids, so
    /// that `table.intern(StdAtom::Type.name()) == StdAtom::Type.atom()`.
    pub fn with_standard_atoms() -> Self {
        let mut table = AtomTable::new(STD_ATOM_NAMES.len());
        for &name in &STD_ATOM_NAMES[1..] {
            table.intern(name);
        }
        table
    }

    /// Interns `name`, returning its existing atom if already known.
    pub fn intern(&mut self, name: &str) -> Atom {
        if let Some(&atom) = self.lookup.get(name) {
            return atom;
        }
        let id = (self.names.len() + 1) as u32;
        let boxed: Box<str> = name.into();
        self.lookup.insert(boxed.clone(), Atom(id));
        self.names.push(boxed);
        Atom(id)
    }

    /// Looks up the spelling of a previously interned atom.
    pub fn name(&self, atom: Atom) -> Option<&str> {
        if atom.is_undefined() {
            return None;
        }
        self.names.get((atom.0 - 1) as usize).map(|s| s.as_ref())
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }
}
