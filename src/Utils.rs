/// structured diagnostic events emitted by the readers and writers
pub mod diagnostics;
/// declarative fixed-column field extraction
pub mod fixed_width;
/// reading files into lines, comment and section handling
pub mod load_from_file;
/// CHEMKIN style number formatting
pub mod number_format;
