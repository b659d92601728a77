pub mod convert;

pub use convert::{convert_folder, midi_to_wav, ConversionReport, Synthesizer};
