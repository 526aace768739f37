/// NASA-7 polynomials: Cp, dH, dS as values, closures and symbolic expressions
pub mod NASAdata;
/// fixed-column NASA records of THERMO sections and therm.dat files
pub mod chemkin_thermo;
/// Lennard-Jones transport data in tran.dat form
pub mod TRANSPORTdata;
