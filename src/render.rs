//! ASCII rendering of a slide's shape geometry, for eyeballing positions
//! without opening the deck.

use crate::error::Result;
use crate::inventory;
use crate::package::Package;
use crate::xml::{Document, Element};
use crate::emu;
use std::fmt::Write as FmtWrite;

const GRID_WIDTH: usize = 72;
const GRID_HEIGHT: usize = 24;

struct ShapeInfo {
    index: usize,
    name: String,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    ph_type: Option<String>,
    text: String,
}

/// Render the slide with the given file number as a 72x24 grid plus a
/// legend. Geometry is projected against the standard 16:9 canvas.
pub fn visualize(pkg: &Package, slide_num: u32) -> Result<String> {
    let slide = Document::parse(&pkg.read_part(&pkg.slide_path(slide_num))?)?;
    let shapes = extract_shapes(&slide.root);

    let mut out = format!("\nSlide {} Layout:\n", slide_num);
    out.push_str(&render_grid(&shapes));
    out.push_str(&legend(&shapes));
    Ok(out)
}

fn extract_shapes(root: &Element) -> Vec<ShapeInfo> {
    inventory::shapes(root)
        .into_iter()
        .enumerate()
        .map(|(i, sp)| {
            let (x, y) = sp
                .descendant("a:off")
                .map(|off| (parse_attr(off, "x"), parse_attr(off, "y")))
                .unwrap_or((0, 0));
            let (width, height) = sp
                .descendant("a:ext")
                .map(|ext| (parse_attr(ext, "cx"), parse_attr(ext, "cy")))
                .unwrap_or((0, 0));

            let mut runs = Vec::new();
            sp.gather_text(&mut runs);
            let text: String = runs.join(" ").trim().chars().take(30).collect();

            ShapeInfo {
                index: i + 1,
                name: sp
                    .descendant("p:cNvPr")
                    .and_then(|el| el.attr("name"))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Shape {}", i + 1)),
                x,
                y,
                width,
                height,
                ph_type: sp
                    .descendant("p:ph")
                    .and_then(|ph| ph.attr("type"))
                    .map(str::to_string),
                text,
            }
        })
        .collect()
}

fn parse_attr(el: &Element, name: &str) -> i64 {
    el.attr(name).and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn to_grid(x: i64, y: i64) -> (usize, usize) {
    let gx = ((x as f64 / emu::SLIDE_WIDTH_16_9 as f64) * GRID_WIDTH as f64).round() as i64;
    let gy = ((y as f64 / emu::SLIDE_HEIGHT_16_9 as f64) * GRID_HEIGHT as f64).round() as i64;
    (
        (gx.max(0) as usize).min(GRID_WIDTH - 1),
        (gy.max(0) as usize).min(GRID_HEIGHT - 1),
    )
}

fn render_grid(shapes: &[ShapeInfo]) -> String {
    let mut grid = [[' '; GRID_WIDTH]; GRID_HEIGHT];

    for x in 0..GRID_WIDTH {
        grid[0][x] = '-';
        grid[GRID_HEIGHT - 1][x] = '-';
    }
    for row in grid.iter_mut() {
        row[0] = '|';
        row[GRID_WIDTH - 1] = '|';
    }
    grid[0][0] = '+';
    grid[0][GRID_WIDTH - 1] = '+';
    grid[GRID_HEIGHT - 1][0] = '+';
    grid[GRID_HEIGHT - 1][GRID_WIDTH - 1] = '+';

    for shape in shapes {
        let (sx, sy) = to_grid(shape.x, shape.y);
        let (ex, ey) = to_grid(shape.x + shape.width, shape.y + shape.height);

        // Keep shape outlines inside the border.
        let x1 = sx.clamp(1, GRID_WIDTH - 2);
        let y1 = sy.clamp(1, GRID_HEIGHT - 2);
        let x2 = ex.clamp(1, GRID_WIDTH - 2);
        let y2 = ey.clamp(1, GRID_HEIGHT - 2);

        for x in x1..=x2 {
            grid[y1][x] = '-';
            grid[y2][x] = '-';
        }
        for row in grid.iter_mut().take(y2 + 1).skip(y1) {
            row[x1] = '|';
            row[x2] = '|';
        }
        grid[y1][x1] = '+';
        grid[y1][x2] = '+';
        grid[y2][x1] = '+';
        grid[y2][x2] = '+';

        let label = format!("[{}]", shape.index);
        let cx = (x1 + x2) / 2;
        let cy = (y1 + y2) / 2;
        for (i, ch) in label.chars().enumerate() {
            if cx + i < GRID_WIDTH - 1 {
                grid[cy][cx + i] = ch;
            }
        }
    }

    let mut out = String::with_capacity((GRID_WIDTH + 1) * GRID_HEIGHT);
    for row in &grid {
        out.extend(row.iter());
        out.push('\n');
    }
    out
}

fn legend(shapes: &[ShapeInfo]) -> String {
    let mut out = String::from("\nShapes:\n");
    out.push_str(&"\u{2500}".repeat(70));
    out.push('\n');

    for shape in shapes {
        let ph = match &shape.ph_type {
            Some(t) => format!(" [{}]", t),
            None => String::new(),
        };
        let _ = writeln!(out, "[{}] {}{}", shape.index, shape.name, ph);
        let _ = writeln!(
            out,
            "    Position: ({:.2}\", {:.2}\")  Size: {:.2}\" \u{00d7} {:.2}\"",
            emu::to_inches(shape.x),
            emu::to_inches(shape.y),
            emu::to_inches(shape.width),
            emu::to_inches(shape.height),
        );
        if !shape.text.is_empty() {
            let _ = writeln!(out, "    Text: \"{}...\"", shape.text);
        }
    }

    out.push_str(&"\u{2500}".repeat(70));
    let _ = write!(
        out,
        "\nSlide: {:.2}\" \u{00d7} {:.2}\" (16:9)\n",
        emu::to_inches(emu::SLIDE_WIDTH_16_9),
        emu::to_inches(emu::SLIDE_HEIGHT_16_9),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{ShapeKind, ShapeSpec, add_shape};
    use crate::scaffold::scaffold;

    #[test]
    fn test_visualize_lists_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();
        add_shape(
            &pkg,
            1,
            &ShapeSpec {
                text: Some("Status update".to_string()),
                ..ShapeSpec::new(ShapeKind::TextBox)
            },
        )
        .unwrap();

        let out = visualize(&pkg, 1).unwrap();
        assert!(out.contains("[1] TextBox 2"));
        assert!(out.contains("Position: (1.00\", 1.00\")"));
        assert!(out.contains("Text: \"Status update...\""));
        assert!(out.contains("(16:9)"));
    }

    #[test]
    fn test_visualize_missing_slide() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = scaffold(dir.path()).unwrap();
        assert!(visualize(&pkg, 9).is_err());
    }
}
