//! Poster Layout CLI
//!
//! Usage:
//!   poster-layout [OPTIONS] <COMMAND>
//!
//! Commands:
//!   layout    Resolve a template and print every node's bounds as JSON
//!   scale     Rescale a template to a new canvas width
//!   gradient  Normalize a CSS gradient string
//!   render    Render an SVG preview of a template
//!
//! Options:
//!   -c, --config <FILE>  Layout configuration file (TOML format)
//!   -v, --verbose        Increase log verbosity (repeatable)
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use poster_layout::{
    parse_gradient_strict, render_svg, resolve_template, serialize_gradient, LayoutConfig,
    SvgConfig, Template,
};

#[derive(Parser)]
#[command(name = "poster-layout")]
#[command(about = "Layout engine for poster and long-article templates")]
struct Cli {
    /// Layout configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a template and print every node's bounds as JSON
    Layout {
        /// Template JSON file ("-" for stdin)
        input: PathBuf,

        /// Override the canvas width
        #[arg(long)]
        width: Option<f64>,

        /// Override the canvas height
        #[arg(long)]
        height: Option<f64>,
    },

    /// Rescale a template to a new canvas width and print it
    Scale {
        /// Template JSON file ("-" for stdin)
        input: PathBuf,

        /// New canvas width in pixels
        #[arg(long)]
        width: f64,
    },

    /// Normalize a CSS gradient string
    Gradient {
        /// The gradient, e.g. "linear-gradient(to right, red, blue)"
        css: String,
    },

    /// Render an SVG preview of a template
    Render {
        /// Template JSON file ("-" for stdin)
        input: PathBuf,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Padding around the canvas
        #[arg(long, default_value_t = 0.0)]
        padding: f64,

        /// Leave out the canvas and content frame fills
        #[arg(long)]
        no_background: bool,

        /// Paint invisible nodes at this opacity instead of skipping them
        #[arg(long, value_name = "OPACITY")]
        show_hidden: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => fail(&format!("Error loading config '{}': {}", path.display(), e)),
        },
        None => LayoutConfig::default(),
    };

    match cli.command {
        Command::Layout {
            input,
            width,
            height,
        } => {
            let mut template = load_template(&input);
            if let Some(width) = width {
                template.canvas.width = width;
            }
            if let Some(height) = height {
                template.canvas.height = height;
            }
            let layout = resolve_template(&template, &config);
            match serde_json::to_string_pretty(&layout) {
                Ok(json) => println!("{}", json),
                Err(e) => fail(&format!("Error: {}", e)),
            }
        }
        Command::Scale { input, width } => {
            let mut template = load_template(&input);
            let factor = template.rescale_to_width(width);
            log::info!("scaled by {}", factor);
            match template.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => fail(&format!("Error: {}", e)),
            }
        }
        Command::Gradient { css } => match parse_gradient_strict(css.trim()) {
            Ok(gradient) => println!("{}", serialize_gradient(&gradient)),
            Err(errors) => {
                for error in &errors {
                    eprint!("{}", error.format(css.trim(), "<gradient>"));
                }
                std::process::exit(1);
            }
        },
        Command::Render {
            input,
            output,
            padding,
            no_background,
            show_hidden,
        } => {
            let template = load_template(&input);
            let layout = resolve_template(&template, &config);
            let mut svg_config = SvgConfig::default()
                .with_padding(padding)
                .with_background(!no_background);
            if let Some(opacity) = show_hidden {
                svg_config = svg_config.with_hidden_opacity(opacity);
            }
            let svg = render_svg(&template, &layout, &svg_config);
            match output {
                Some(path) => {
                    if let Err(e) = fs::write(&path, svg) {
                        fail(&format!("Error writing file '{}': {}", path.display(), e));
                    }
                }
                None => println!("{}", svg),
            }
        }
    }
}

fn load_template(path: &Path) -> Template {
    let source = if path == Path::new("-") {
        let mut buffer = String::new();
        match io::stdin().read_to_string(&mut buffer) {
            Ok(_) => buffer,
            Err(e) => fail(&format!("Error reading from stdin: {}", e)),
        }
    } else {
        match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => fail(&format!("Error reading file '{}': {}", path.display(), e)),
        }
    };

    match Template::from_json(&source) {
        Ok(template) => template,
        Err(e) => fail(&format!("Error: {}", e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
