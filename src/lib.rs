//! Slidedeck - command-line editing of PowerPoint packages
//!
//! This library mutates presentations in their unpacked OOXML form: a
//! working directory holding `[Content_Types].xml`, `ppt/presentation.xml`,
//! and the slide, layout, master, and theme parts. Every mutation keeps the
//! package's cross-references consistent in one step: the part on disk, the
//! relationship tables, the content-type registry, and the presentation
//! order list.
//!
//! # Example - adding a slide
//!
//! ```no_run
//! use slidedeck::package::Package;
//! use slidedeck::ops::add_slide;
//!
//! # fn main() -> slidedeck::Result<()> {
//! let pkg = Package::open("work-dir")?;
//! let added = add_slide(&pkg, 2, None)?;
//! println!("slide{}.xml as {}", added.slide_num, added.r_id);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - round-tripping a package file
//!
//! ```no_run
//! use slidedeck::archive;
//! use std::path::Path;
//!
//! # fn main() -> slidedeck::Result<()> {
//! archive::unpack(Path::new("deck.pptx"), Path::new("work-dir"))?;
//! // ... mutate ...
//! archive::pack(Path::new("work-dir"), Path::new("deck-out.pptx"))?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod emu;
pub mod error;
pub mod ids;
pub mod image;
pub mod inventory;
pub mod opc;
pub mod ops;
pub mod package;
pub mod render;
pub mod scaffold;
pub mod xml;

pub use error::{Error, Result};
pub use inventory::{LayoutEntry, SlideEntry, list_layouts, list_slides};
pub use package::Package;
