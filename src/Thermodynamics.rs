#[allow(non_snake_case)]
/// handlers for the CHEMKIN formats of thermodynamic and transport data
pub mod DBhandlers;
