#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
/// errors of the CHEMKIN readers and writers
pub mod chemkin_error;
/// reader and writer options
pub mod settings;
