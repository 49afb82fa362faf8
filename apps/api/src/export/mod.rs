// Consumers of a finished layout: the PDF file and the preview payload.

pub mod pdf;
pub mod photo;
pub mod preview;

pub use pdf::write_pdf;
pub use photo::{decode_photo_base64, PhotoImage};
pub use preview::{build_preview, PreviewPayload};
