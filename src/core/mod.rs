pub mod document_processor;
pub mod extractor;
pub mod ocr_processor;
pub mod organizer;
pub mod taxonomy;


pub use document_processor::{LopdfReader, PdfPage, PdfReader};
pub use extractor::{SourceKind, TextExtractor};
pub use ocr_processor::{OcrEngine, OcrSession, TesseractEngine};
pub use organizer::{FileRemover, FsRemover, Organizer};
pub use taxonomy::TaxonomyStore;
