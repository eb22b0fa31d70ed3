mod gens_pdf_reader;
pub use gens_pdf_reader::{GensPdfReader, ReaderError, GENS_PDF_SEPARATORS};
