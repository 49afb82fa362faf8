//! Single-page PDF writer.
//!
//! Replays a `RenderedPage` into one content stream. Text is written in the
//! same WinAnsi page encoding the engine measured with. Base-14 faces are
//! referenced by name and file-backed faces are embedded; both carry a
//! `Widths` array taken from the very table used during layout.
//!
//! Output is byte-for-byte deterministic: no dates, no document id.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::export::photo::PhotoImage;
use crate::layout::font_metrics::{encode_text, FaceMetrics, ProgramKind};
use crate::layout::page_writer::Rgb;
use crate::layout::{DrawCommand, FontPair, FontVariant, LayoutError, RenderedPage};

const REGULAR_RESOURCE: &str = "F1";
const BOLD_RESOURCE: &str = "F2";
const PHOTO_RESOURCE: &str = "Im1";
const FRAME_THICKNESS: f32 = 0.75;
/// Bézier control distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Writes `page` as a one-page PDF.
///
/// `photo` is only drawn where the page carries a `Photo` command.
pub fn write_pdf(
    page: &RenderedPage,
    fonts: &FontPair,
    photo: Option<&PhotoImage>,
) -> Result<Vec<u8>, LayoutError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = add_font(&mut doc, &fonts.regular);
    let bold_id = add_font(&mut doc, &fonts.bold);

    let mut resources = dictionary! {
        "Font" => dictionary! {
            REGULAR_RESOURCE => regular_id,
            BOLD_RESOURCE => bold_id,
        },
    };
    let photo = photo.filter(|_| page.has_photo());
    if let Some(image) = photo {
        let image_id = doc.add_object(image_stream(image));
        resources.set("XObject", dictionary! { PHOTO_RESOURCE => image_id });
    }

    let content = Content {
        operations: page_operations(page, photo.is_some()),
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width),
                Object::Real(page.height),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(lopdf::Error::from)?;
    Ok(buffer)
}

// ────────────────────────────────────────────────────────────────────────────
// Fonts
// ────────────────────────────────────────────────────────────────────────────

/// Every face carries explicit widths, so viewers advance glyphs exactly as
/// the layout measured them.
fn add_font(doc: &mut Document, face: &FaceMetrics) -> ObjectId {
    let Some(program) = &face.program else {
        return doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font.as_str(),
            "FirstChar" => 32,
            "LastChar" => 255,
            "Widths" => widths_array(face),
            "Encoding" => "WinAnsiEncoding",
        });
    };

    let mut file = Stream::new(dictionary! {}, program.data.to_vec());
    let (file_key, subtype) = match program.kind {
        ProgramKind::TrueType => {
            file.dict.set("Length1", program.data.len() as i64);
            ("FontFile2", "TrueType")
        }
        ProgramKind::OpenTypeCff => {
            file.dict.set("Subtype", "OpenType");
            ("FontFile3", "Type1")
        }
    };
    let file_id = doc.add_object(file);

    let [x_min, y_min, x_max, y_max] = program.bbox;
    let mut descriptor = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => face.base_font.as_str(),
        // Nonsymbolic
        "Flags" => 32,
        "FontBBox" => [x_min, y_min, x_max, y_max]
            .iter()
            .map(|v| Object::Integer(i64::from(*v)))
            .collect::<Vec<_>>(),
        "ItalicAngle" => 0,
        "Ascent" => program.ascent,
        "Descent" => program.descent,
        "CapHeight" => program.cap_height,
        "StemV" => 80,
    };
    descriptor.set(file_key, file_id);
    let descriptor_id = doc.add_object(descriptor);

    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => subtype,
        "BaseFont" => face.base_font.as_str(),
        "FirstChar" => 32,
        "LastChar" => 255,
        "Widths" => widths_array(face),
        "FontDescriptor" => descriptor_id,
        "Encoding" => "WinAnsiEncoding",
    })
}

fn widths_array(face: &FaceMetrics) -> Vec<Object> {
    (32u8..=255)
        .map(|code| Object::Integer(face.code_width_milli(code)))
        .collect()
}

fn image_stream(image: &PhotoImage) -> Stream {
    let dict: Dictionary = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(image.width),
        "Height" => i64::from(image.height),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };
    Stream::new(dict, image.rgb.clone())
}

// ────────────────────────────────────────────────────────────────────────────
// Content stream
// ────────────────────────────────────────────────────────────────────────────

fn page_operations(page: &RenderedPage, with_photo: bool) -> Vec<Operation> {
    let mut ops = Vec::new();
    for command in &page.commands {
        match command {
            DrawCommand::Text {
                x,
                y,
                variant,
                size,
                text,
                color,
            } => {
                let resource = match variant {
                    FontVariant::Regular => REGULAR_RESOURCE,
                    FontVariant::Bold => BOLD_RESOURCE,
                };
                ops.push(Operation::new("BT", vec![]));
                ops.push(fill_color(*color));
                ops.push(Operation::new("Tf", vec![resource.into(), (*size).into()]));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_text(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawCommand::Rule {
                x1,
                x2,
                y,
                thickness,
                color,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(stroke_color(*color));
                ops.push(Operation::new("w", vec![(*thickness).into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), (*y).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), (*y).into()]));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawCommand::Bullet {
                cx,
                cy,
                radius,
                color,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(fill_color(*color));
                circle_path(&mut ops, *cx, *cy, *radius);
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawCommand::Photo { x, y, size } if with_photo => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        (*size).into(),
                        Object::Integer(0),
                        Object::Integer(0),
                        (*size).into(),
                        (*x).into(),
                        (*y).into(),
                    ],
                ));
                ops.push(Operation::new("Do", vec![PHOTO_RESOURCE.into()]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawCommand::Photo { x, y, size } => {
                frame(&mut ops, *x, *y, *size, Rgb::MUTED);
            }
            DrawCommand::PhotoFrame { x, y, size, color } => {
                frame(&mut ops, *x, *y, *size, *color);
            }
        }
    }
    ops
}

fn frame(ops: &mut Vec<Operation>, x: f32, y: f32, size: f32, color: Rgb) {
    ops.push(Operation::new("q", vec![]));
    ops.push(stroke_color(color));
    ops.push(Operation::new("w", vec![FRAME_THICKNESS.into()]));
    ops.push(Operation::new(
        "re",
        vec![x.into(), y.into(), size.into(), size.into()],
    ));
    ops.push(Operation::new("S", vec![]));
    ops.push(Operation::new("Q", vec![]));
}

/// Four cubic segments, counter-clockwise from the rightmost point.
fn circle_path(ops: &mut Vec<Operation>, cx: f32, cy: f32, r: f32) {
    let k = r * KAPPA;
    ops.push(Operation::new("m", vec![(cx + r).into(), cy.into()]));
    let segments = [
        [cx + r, cy + k, cx + k, cy + r, cx, cy + r],
        [cx - k, cy + r, cx - r, cy + k, cx - r, cy],
        [cx - r, cy - k, cx - k, cy - r, cx, cy - r],
        [cx + k, cy - r, cx + r, cy - k, cx + r, cy],
    ];
    for points in segments {
        ops.push(Operation::new(
            "c",
            points.iter().map(|v| Object::Real(*v)).collect(),
        ));
    }
}

fn fill_color(c: Rgb) -> Operation {
    Operation::new("rg", vec![c.r.into(), c.g.into(), c.b.into()])
}

fn stroke_color(c: Rgb) -> Operation {
    Operation::new("RG", vec![c.r.into(), c.g.into(), c.b.into()])
}
