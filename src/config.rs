//! Command-line configuration.

use std::ffi::OsString;
use std::str::FromStr;
use std::time::Duration;

use clap::{App, Arg, ArgMatches};

use crate::complex::Complex;
use crate::error::{Error, Result};
use crate::screen;
use crate::view::ViewParameters;

const SIZE: &str = "size";
const ZOOM: &str = "zoom";
const CENTER: &str = "center";
const ITERATIONS: &str = "iterations";
const FRAME_BUDGET: &str = "frame-budget";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Requested window size; the canvas follows the actual window.
    pub size: screen::Size,
    pub view: ViewParameters,
    /// Time per frame spent on render ticks.
    pub frame_budget: Duration,
}

/// Given a string and a separator, returns the two values separated by it.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let index = s.find(separator)?;
    match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
        (Ok(l), Ok(r)) => Some((l, r)),
        _ => None,
    }
}

fn parse_complex(s: &str) -> Option<Complex> {
    parse_pair(s, ',').map(|(re, im)| Complex::new(re, im))
}

fn validate_pair<T: FromStr>(
    s: &str,
    separator: char,
    err: &str,
) -> std::result::Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> std::result::Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Progressive Mandelbrot set viewer")
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u32>(&s, 'x', "Could not parse window size"))
                .help("Initial window size in pixels, WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("0")
                .validator(|s| validate_number::<u32>(&s, "Could not parse zoom level"))
                .help("Zoom level; each level halves the visible width"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.5,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the view on the complex plane, RE,IM"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .validator(|s| validate_number::<u32>(&s, "Could not parse iteration count"))
                .help("Maximum iterations per point"),
        )
        .arg(
            Arg::with_name(FRAME_BUDGET)
                .long(FRAME_BUDGET)
                .short("b")
                .takes_value(true)
                .default_value("8")
                .validator(|s| validate_number::<u64>(&s, "Could not parse frame budget"))
                .help("Milliseconds per frame spent rendering"),
        )
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    // Every option has a default value.
    matches.value_of(name).unwrap_or_default()
}

fn invalid(name: &str, value: &str) -> Error {
    Error::InvalidParameters(format!("could not parse --{} {:?}", name, value))
}

impl Config {
    /// Parses command-line arguments, the first of which is the program name.
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app().get_matches_from_safe(args)?;

        let size = value(&matches, SIZE);
        let (width, height) = parse_pair(size, 'x').ok_or_else(|| invalid(SIZE, size))?;

        let zoom = value(&matches, ZOOM);
        let zoom_level = zoom.parse().map_err(|_| invalid(ZOOM, zoom))?;

        let center = value(&matches, CENTER);
        let center = parse_complex(center).ok_or_else(|| invalid(CENTER, center))?;

        let iterations = value(&matches, ITERATIONS);
        let max_iterations = iterations
            .parse()
            .map_err(|_| invalid(ITERATIONS, iterations))?;

        let budget = value(&matches, FRAME_BUDGET);
        let frame_budget = budget
            .parse()
            .map(Duration::from_millis)
            .map_err(|_| invalid(FRAME_BUDGET, budget))?;

        let view = ViewParameters {
            zoom_level,
            center,
            max_iterations,
        };
        view.validate()?;

        Ok(Config {
            size: screen::Size::new(width, height),
            view,
            frame_budget,
        })
    }
}
