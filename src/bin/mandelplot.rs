// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate mandelplot;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use log::{error, info, LevelFilter};
use mandelplot::{PlaneTransform, PnmSink, RenderConfig, Renderer};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const THREADS: &str = "threads";
const SEGMENTS: &str = "segments";
const ITERATIONS: &str = "iterations";
const SCALE: &str = "scale";
const SHIFT: &str = "shift";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = std::cmp::max(16, num_cpus::get() * 4);

    App::new("mandelplot")
        .version("0.1.0")
        .about("Histogram-coloured Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (binary PPM)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1200x900")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("16")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of worker threads"),
        )
        .arg(
            Arg::with_name(SEGMENTS)
                .required(false)
                .long(SEGMENTS)
                .short("g")
                .takes_value(true)
                .default_value("90")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_536,
                        "Could not parse segment count",
                        "Segment count must be between 1 and 65536",
                    )
                })
                .help("Number of row segments the image is split into"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("5000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iterations before a point is considered inside the set"),
        )
        .arg(
            Arg::with_name(SCALE)
                .required(false)
                .long(SCALE)
                .short("c")
                .takes_value(true)
                .default_value("2.0")
                .validator(|s| {
                    validate_range(
                        &s,
                        1e-12,
                        1e6,
                        "Could not parse scale",
                        "Scale must be a positive number",
                    )
                })
                .help("Complex-plane units spanned by the image height"),
        )
        .arg(
            Arg::with_name(SHIFT)
                .required(false)
                .long(SHIFT)
                .short("x")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("200,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse shift"))
                .help("Pixel offset of the plane origin from the image centre"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .short("v")
                .multiple(true)
                .help("Log more; repeat for debug output"),
        )
        .get_matches()
}

fn config_from(matches: &ArgMatches) -> Option<RenderConfig> {
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE)?, 'x')?;
    let shift = parse_pair::<f64>(matches.value_of(SHIFT)?, ',')?;
    Some(RenderConfig {
        width,
        height,
        worker_count: usize::from_str(matches.value_of(THREADS)?).ok()?,
        segment_count: usize::from_str(matches.value_of(SEGMENTS)?).ok()?,
        max_iterations: usize::from_str(matches.value_of(ITERATIONS)?).ok()?,
        transform: PlaneTransform {
            units_per_height: f64::from_str(matches.value_of(SCALE)?).ok()?,
            shift,
        },
    })
}

fn main() {
    let matches = args();

    let level = match matches.occurrences_of(VERBOSE) {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Could not start logging: {}", e);
    }

    let config = match config_from(&matches) {
        Some(config) => config,
        None => {
            eprintln!("Could not parse the render options");
            std::process::exit(1);
        }
    };
    info!("host has {} cpus", num_cpus::get());

    let output = matches.value_of(OUTPUT).expect("output is a required argument");
    let mut sink = PnmSink::new(output);
    let result = Renderer::new(config).and_then(|renderer| renderer.render_to(&mut sink));
    match result {
        Err(e) => {
            error!("Render failure: {}", e);
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(rendered) => {
            println!(
                "Calculations took {:.3} seconds ({} escaped, {} inside).",
                rendered.elapsed.as_secs_f64(),
                rendered.escaped,
                rendered.inside
            );
        }
    }
}
