use crate::config::load_config;
use crate::engine::Engine;
use crate::icons::FlatIconCatalog;
use crate::ir::{AttributeName, Rect, ShapeAttributes};
use crate::shape::{Reconciliation, StyleChange};
use crate::style::StyleMap;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ibmshape", version, about = "Style reconciliation for IBM diagram shapes")]
pub struct Args {
    /// Design-token file (.json or .json5)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Categorized icon table (JSON)
    #[arg(long = "icons", global = true)]
    pub icons: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the paint parameters of a shape
    Params {
        /// Style string or '-' for stdin
        #[arg(short = 's', long = "style")]
        style: String,

        #[arg(short = 'w', long = "width", default_value_t = 48.0)]
        width: f32,

        #[arg(short = 'H', long = "height", default_value_t = 48.0)]
        height: f32,

        /// Cell attribute, e.g. Badge-Text=12
        #[arg(long = "attr", value_parser = parse_attribute)]
        attrs: Vec<(AttributeName, String)>,
    },
    /// Print the corrections for a style change
    Reconcile {
        #[arg(short = 'p', long = "previous")]
        previous: String,

        /// Style string or '-' for stdin
        #[arg(short = 's', long = "current")]
        current: String,

        /// Cell bounds as x,y,w,h
        #[arg(short = 'g', long = "geometry", value_parser = parse_rect)]
        geometry: Option<Rect>,

        /// Child bounds as x,y,w,h (legends)
        #[arg(long = "child", value_parser = parse_rect)]
        children: Vec<Rect>,

        #[arg(long = "attr", value_parser = parse_attribute)]
        attrs: Vec<(AttributeName, String)>,

        /// Leave out entries that match the current style
        #[arg(long = "compact")]
        compact: bool,
    },
    /// Print the smallest legal bounds for a resize
    Rect {
        #[arg(short = 's', long = "style")]
        style: String,

        #[arg(short = 'g', long = "geometry", value_parser = parse_rect)]
        geometry: Rect,

        /// Treat the request as an interactive resize
        #[arg(long = "min-size")]
        min_size: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileOutput {
    #[serde(flatten)]
    reconciliation: Reconciliation,
    patched_style: String,
    missing_attributes: Vec<AttributeName>,
}

pub fn run() -> Result<()> {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let mut engine = Engine::new(config);
    if let Some(path) = args.icons.as_deref() {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading icon table {}", path.display()))?;
        engine = engine.with_icons(FlatIconCatalog::from_json(&json)?);
    }

    let output = match args.command {
        Command::Params {
            style,
            width,
            height,
            attrs,
        } => {
            let style = StyleMap::parse(&read_style(&style)?);
            let params = engine
                .render_params(&style, &attributes(attrs), width, height)
                .ok_or_else(|| anyhow!("style does not name an IBM shape"))?;
            serde_json::to_string_pretty(&params)?
        }
        Command::Reconcile {
            previous,
            current,
            geometry,
            children,
            attrs,
            compact,
        } => {
            if previous == "-" && current == "-" {
                return Err(anyhow!("only one style can be read from stdin"));
            }
            let previous = StyleMap::parse(&read_style(&previous)?);
            let current = StyleMap::parse(&read_style(&current)?);
            let attributes = attributes(attrs);
            let mut change = StyleChange::new(&previous, &current)
                .with_attributes(&attributes)
                .with_children(&children);
            if let Some(geometry) = geometry {
                change = change.with_geometry(geometry);
            }

            let mut reconciliation = engine.reconcile(&change);
            if compact {
                reconciliation = reconciliation.compact(&current);
            }
            let patched = reconciliation.patched_style(&current);
            let output = ReconcileOutput {
                missing_attributes: engine.missing_attributes(&patched, &attributes),
                patched_style: patched.to_style_string(),
                reconciliation,
            };
            serde_json::to_string_pretty(&output)?
        }
        Command::Rect {
            style,
            geometry,
            min_size,
        } => {
            let style = StyleMap::parse(&read_style(&style)?);
            serde_json::to_string_pretty(&engine.minimum_rect(&style, min_size, geometry))?
        }
    };

    println!("{output}");
    Ok(())
}

fn read_style(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf.trim().to_string());
    }
    Ok(arg.to_string())
}

fn attributes(pairs: Vec<(AttributeName, String)>) -> ShapeAttributes {
    let mut attributes = ShapeAttributes::default();
    for (name, value) in pairs {
        attributes.set(name, value);
    }
    attributes
}

fn parse_attribute(arg: &str) -> Result<(AttributeName, String)> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{arg}'"))?;
    let name = AttributeName::from_name(name.trim())
        .ok_or_else(|| anyhow!("unknown attribute '{}'", name.trim()))?;
    Ok((name, value.to_string()))
}

fn parse_rect(arg: &str) -> Result<Rect> {
    let values = arg
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .with_context(|| format!("invalid number '{}' in '{arg}'", part.trim()))
        })
        .collect::<Result<Vec<_>>>()?;
    match values.as_slice() {
        [x, y, width, height] => Ok(Rect::new(*x, *y, *width, *height)),
        _ => Err(anyhow!("expected x,y,w,h, got '{arg}'")),
    }
}
