//! Texture-variant converter: OBJ to textured fixed-point tables.

use std::path::PathBuf;

use anyhow::{Result, bail};
use codegen::Variant;

fn parse_paths() -> Result<(PathBuf, PathBuf)> {
    // Exactly two positional arguments, no flags.
    let mut args = std::env::args_os().skip(1);
    match (args.next(), args.next(), args.next()) {
        (Some(input), Some(output), None) => Ok((input.into(), output.into())),
        _ => bail!("usage: objbake-tex <input.obj> <output.h>"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (input, output) = parse_paths()?;
    log::info!("Converting {} -> {}", input.display(), output.display());
    codegen::pipeline::convert(&input, &output, Variant::Textured)?;
    log::info!("Done.");
    Ok(())
}
