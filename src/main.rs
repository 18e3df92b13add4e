//! `slidedeck` binary: one subcommand per package operation.

use clap::{Parser, Subcommand, ValueEnum};
use slidedeck::ops::{
    self, Align, ImagePlacement, ShapeKind, ShapeSpec, TextTarget,
};
use slidedeck::{Package, Result, archive, emu, inventory, render, scaffold};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "slidedeck", version, about = "Edit PowerPoint packages in their unpacked form")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Expand a .pptx/.potx file into a working directory
    Unpack {
        package: PathBuf,
        dir: PathBuf,
    },

    /// Collapse a working directory back into a package file
    Pack {
        dir: PathBuf,
        package: PathBuf,
    },

    /// Scaffold a minimal presentation into a working directory
    Init {
        dir: PathBuf,
    },

    /// List slides in presentation order
    ListSlides {
        dir: PathBuf,
    },

    /// List the slide layouts available in the package
    ListLayouts {
        dir: PathBuf,
    },

    /// Add a slide built from a layout
    AddSlide {
        dir: PathBuf,
        /// Layout file number
        #[arg(long, default_value_t = 2)]
        layout: u32,
        /// 1-based presentation position; appended when omitted
        #[arg(long)]
        position: Option<usize>,
    },

    /// Duplicate an existing slide
    CloneSlide {
        dir: PathBuf,
        /// 1-based presentation position of the source slide
        #[arg(long)]
        source: usize,
        /// 1-based presentation position for the clone; appended when omitted
        #[arg(long)]
        position: Option<usize>,
    },

    /// Delete a slide and every reference to it
    DeleteSlide {
        dir: PathBuf,
        /// 1-based presentation position
        #[arg(long)]
        slide: usize,
    },

    /// Add a text box or rectangle to a slide
    AddShape {
        dir: PathBuf,
        /// 1-based presentation position
        #[arg(long)]
        slide: usize,
        #[arg(long, value_enum)]
        kind: ShapeKindArg,
        #[arg(long)]
        text: Option<String>,
        /// X position in inches
        #[arg(long, default_value_t = 1.0)]
        x: f64,
        /// Y position in inches
        #[arg(long, default_value_t = 1.0)]
        y: f64,
        /// Width in inches
        #[arg(long, default_value_t = 4.0)]
        width: f64,
        /// Height in inches
        #[arg(long, default_value_t = 1.0)]
        height: f64,
        /// Text color: theme slot (dk1, accent1, ...) or RGB hex
        #[arg(long)]
        color: Option<String>,
        /// Fill color: theme slot or RGB hex
        #[arg(long)]
        fill: Option<String>,
        /// Stroke color for rectangles
        #[arg(long)]
        stroke: Option<String>,
        /// Stroke width in points
        #[arg(long, default_value_t = 1.0)]
        stroke_width: f64,
        /// Font size in points
        #[arg(long, default_value_t = 18)]
        font_size: u32,
        #[arg(long)]
        bold: bool,
        #[arg(long)]
        italic: bool,
        #[arg(long, value_enum, default_value_t = AlignArg::Left)]
        align: AlignArg,
    },

    /// Embed an image on a slide
    AddImage {
        dir: PathBuf,
        /// 1-based presentation position
        #[arg(long)]
        slide: usize,
        #[arg(long)]
        image: PathBuf,
        /// X position in EMU (914400 = 1 inch)
        #[arg(long, default_value_t = emu::PER_INCH)]
        x: i64,
        /// Y position in EMU
        #[arg(long, default_value_t = emu::PER_INCH)]
        y: i64,
        /// Width in EMU; natural image width when omitted
        #[arg(long)]
        width: Option<i64>,
        /// Height in EMU; natural image height when omitted
        #[arg(long)]
        height: Option<i64>,
    },

    /// Replace the text of a placeholder or shape
    EditText {
        dir: PathBuf,
        /// 1-based presentation position
        #[arg(long)]
        slide: usize,
        /// Placeholder type: title, ctrTitle, subTitle, body, ...
        #[arg(long, conflicts_with = "shape_id")]
        placeholder: Option<String>,
        /// Shape id
        #[arg(long)]
        shape_id: Option<u32>,
        #[arg(long)]
        text: String,
    },

    /// Apply a template's theme, masters, and layouts
    ApplyTemplate {
        dir: PathBuf,
        template: PathBuf,
    },

    /// Render a slide's shapes as an ASCII grid
    Visualize {
        dir: PathBuf,
        /// Slide file number (the N in slideN.xml)
        #[arg(long, default_value_t = 1)]
        slide: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeKindArg {
    Textbox,
    Rect,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlignArg {
    Left,
    Center,
    Right,
}

impl From<AlignArg> for Align {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Left => Align::Left,
            AlignArg::Center => Align::Center,
            AlignArg::Right => Align::Right,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Unpack { package, dir } => {
            let entries = archive::unpack(&package, &dir)?;
            println!("Unpacked {} entries to {}", entries, dir.display());
        },
        Command::Pack { dir, package } => {
            let entries = archive::pack(&dir, &package)?;
            println!("Packed {} entries into {}", entries, package.display());
        },
        Command::Init { dir } => {
            scaffold::scaffold(&dir)?;
            println!("Initialized presentation in {}", dir.display());
        },
        Command::ListSlides { dir } => {
            let pkg = Package::open(dir)?;
            for slide in inventory::list_slides(&pkg)? {
                println!(
                    "{}. slide{}.xml (id {}, {}) - {}",
                    slide.position, slide.slide_num, slide.slide_id, slide.r_id, slide.title
                );
            }
        },
        Command::ListLayouts { dir } => {
            let pkg = Package::open(dir)?;
            for layout in inventory::list_layouts(&pkg)? {
                println!(
                    "{}. {} [{}]",
                    layout.layout_num,
                    layout.name.as_deref().unwrap_or("(unnamed)"),
                    layout.placeholders.join(", ")
                );
            }
        },
        Command::AddSlide {
            dir,
            layout,
            position,
        } => {
            let pkg = Package::open(dir)?;
            let added = ops::add_slide(&pkg, layout, position)?;
            println!("Added slide {} using layout {}", added.slide_num, layout);
        },
        Command::CloneSlide {
            dir,
            source,
            position,
        } => {
            let pkg = Package::open(dir)?;
            let added = ops::clone_slide(&pkg, source, position)?;
            println!("Cloned slide {} to new slide {}", source, added.slide_num);
        },
        Command::DeleteSlide { dir, slide } => {
            let pkg = Package::open(dir)?;
            let deleted = ops::delete_slide(&pkg, slide)?;
            println!(
                "Deleted slide {} (slide{}.xml)",
                deleted.position, deleted.slide_num
            );
        },
        Command::AddShape {
            dir,
            slide,
            kind,
            text,
            x,
            y,
            width,
            height,
            color,
            fill,
            stroke,
            stroke_width,
            font_size,
            bold,
            italic,
            align,
        } => {
            let pkg = Package::open(dir)?;
            let spec = ShapeSpec {
                x: emu::from_inches(x),
                y: emu::from_inches(y),
                width: emu::from_inches(width),
                height: emu::from_inches(height),
                text,
                color,
                fill,
                stroke,
                stroke_width_pt: stroke_width,
                font_size_pt: font_size,
                bold,
                italic,
                align: align.into(),
                ..ShapeSpec::new(match kind {
                    ShapeKindArg::Textbox => ShapeKind::TextBox,
                    ShapeKindArg::Rect => ShapeKind::Rectangle,
                })
            };
            let id = ops::add_shape(&pkg, slide, &spec)?;
            println!("Added shape (id={}) to slide {}", id, slide);
        },
        Command::AddImage {
            dir,
            slide,
            image,
            x,
            y,
            width,
            height,
        } => {
            let pkg = Package::open(dir)?;
            let placement = ImagePlacement {
                x,
                y,
                width,
                height,
            };
            let added = ops::add_image(&pkg, slide, &image, placement)?;
            println!("Added image to slide {}: {}", slide, added.media_name);
        },
        Command::EditText {
            dir,
            slide,
            placeholder,
            shape_id,
            text,
        } => {
            let target = match (placeholder, shape_id) {
                (Some(ph), _) => TextTarget::Placeholder(ph),
                (None, Some(id)) => TextTarget::ShapeId(id),
                (None, None) => {
                    return Err(slidedeck::Error::NotFound(
                        "either --placeholder or --shape-id must be specified".to_string(),
                    ));
                },
            };
            let pkg = Package::open(dir)?;
            let outcome = ops::edit_text(&pkg, slide, &target, &text)?;
            println!(
                "Updated text in slide {} (matched via {})",
                slide,
                outcome.strategy.as_str()
            );
        },
        Command::ApplyTemplate { dir, template } => {
            let pkg = Package::open(dir)?;
            ops::apply_template(&pkg, &template)?;
            println!("Template applied successfully");
        },
        Command::Visualize { dir, slide } => {
            let pkg = Package::open(dir)?;
            print!("{}", render::visualize(&pkg, slide)?);
        },
    }
    Ok(())
}
