use anyhow::{anyhow, Result};
use bflim_swizzle_cli::{default_output, describe, extract, inject, read_bflim};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::error;

fn required_path<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    matches
        .value_of(name)
        .map(Path::new)
        .ok_or_else(|| anyhow!("Missing argument {}", name))
}

fn main() -> Result<()> {
    let input_arg = Arg::with_name("input")
        .help("The input .bflim files")
        .required(true)
        .multiple(true)
        .takes_value(true);

    let matches = App::new("bflim_swizzle")
        .version("0.1")
        .author("SMG")
        .about("Convert Wii U FLIM textures to and from PNG images.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Increase the logging verbosity"),
        )
        .subcommand(
            SubCommand::with_name("info")
                .about("Print the footer and surface layout")
                .arg(&input_arg),
        )
        .subcommand(
            SubCommand::with_name("extract")
                .about("Untile and decode each input to a PNG next to the input file")
                .arg(&input_arg),
        )
        .subcommand(
            SubCommand::with_name("inject")
                .about("Replace the image data of a FLIM with an image")
                .arg(
                    Arg::with_name("image")
                        .help("The input image")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("bflim")
                        .help("The .bflim file with the format and tile mode to use")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .help("The output .bflim. Defaults to the image path with a .bflim extension")
                        .takes_value(true),
                ),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    match matches.subcommand() {
        ("info", Some(sub_m)) => {
            for input in sub_m.values_of("input").into_iter().flatten() {
                let bflim = read_bflim(input)?;
                println!("{}", input);
                println!("{}", describe(&bflim));
            }
            Ok(())
        }
        ("extract", Some(sub_m)) => {
            let inputs: Vec<PathBuf> = sub_m
                .values_of("input")
                .into_iter()
                .flatten()
                .map(PathBuf::from)
                .collect();

            // Each file is independent, so convert them in parallel.
            let failed = inputs
                .par_iter()
                .filter(|input| {
                    let output = default_output(input, "png");
                    match extract(input.as_path(), output.as_path()) {
                        Ok(()) => false,
                        Err(e) => {
                            error!("{:?}", e);
                            true
                        }
                    }
                })
                .count();

            if failed > 0 {
                Err(anyhow!("Failed to extract {} of {} files", failed, inputs.len()))
            } else {
                Ok(())
            }
        }
        ("inject", Some(sub_m)) => {
            let image = required_path(sub_m, "image")?;
            let bflim = required_path(sub_m, "bflim")?;
            let output = sub_m
                .value_of("output")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_output(image, "bflim"));

            inject(image, bflim, output.as_path())
        }
        _ => Ok(()),
    }
}
