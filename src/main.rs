use ChemkinIO::Kinetics::chemkin_mechanism::{load_chemkin_file, print_summary, save_chemkin_file};
use ChemkinIO::Kinetics::species_dictionary::save_species_dictionary;
use ChemkinIO::Thermodynamics::DBhandlers::TRANSPORTdata::save_transport_file;
use ChemkinIO::Utils::diagnostics::{Diagnostics, Level};
use ChemkinIO::chemkin_error::ChemkinError;
use ChemkinIO::settings::{ChemkinOptions, WriterOptions};
use log::{LevelFilter, error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage:
    ChemkinIO summary <chem.inp> [species_dictionary.txt] [--options <options.json>]
    ChemkinIO roundtrip <chem.inp> <species_dictionary.txt> <out_dir> [--old-style] [--quiet] [--options <options.json>]";

struct Args {
    command: String,
    paths: Vec<PathBuf>,
    options: Option<PathBuf>,
    old_style: bool,
    quiet: bool,
}

fn parse_args(raw: &[String]) -> Option<Args> {
    let mut args = Args {
        command: raw.first()?.clone(),
        paths: Vec::new(),
        options: None,
        old_style: false,
        quiet: false,
    };
    let mut rest = raw[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--old-style" => args.old_style = true,
            "--quiet" => args.quiet = true,
            "--options" => args.options = Some(PathBuf::from(rest.next()?)),
            _ => args.paths.push(PathBuf::from(arg)),
        }
    }
    Some(args)
}

fn run(args: &Args) -> Result<(), ChemkinError> {
    let options = match &args.options {
        Some(path) => ChemkinOptions::from_json_file(path)?,
        None => ChemkinOptions::default(),
    };
    let mut diag = Diagnostics::new();
    match (args.command.as_str(), args.paths.as_slice()) {
        ("summary", [chem, rest @ ..]) if rest.len() <= 1 => {
            let dictionary = rest.first().map(PathBuf::as_path);
            let (species, reactions) = load_chemkin_file(chem, dictionary, &options, &mut diag)?;
            print_summary(&species, &reactions);
        }
        ("roundtrip", [chem, dictionary, out_dir]) => {
            let (species, reactions) =
                load_chemkin_file(chem, Some(dictionary.as_path()), &options, &mut diag)?;
            std::fs::create_dir_all(out_dir)?;
            let writer = WriterOptions {
                verbose: !args.quiet,
                ..WriterOptions::default()
            };
            save_chemkin_file(
                &out_dir.join("chem.inp"),
                &species,
                &reactions,
                &writer,
                &mut diag,
            )?;
            save_species_dictionary(
                &out_dir.join("species_dictionary.txt"),
                &species,
                args.old_style,
                &mut diag,
            )?;
            if species.iter().any(|s| s.transport.is_some()) {
                save_transport_file(&out_dir.join("tran.dat"), &species)?;
            }
            info!("mechanism written to '{}'", out_dir.display());
        }
        _ => {
            eprintln!("{}", USAGE);
            return Ok(());
        }
    }
    let warnings = diag.messages(Level::Warning).len();
    if warnings > 0 {
        info!("{} warnings", warnings);
    }
    Ok(())
}

pub fn main() -> ExitCode {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&raw) else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
