use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args_os().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: nanoc <path.c>");
        return ExitCode::from(3);
    };

    match run(PathBuf::from(input)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: PathBuf) -> Result<()> {
    let source = std::fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;

    log::info!("compiling {}", input.display());
    let asm = nanoc_drv::compile(&source).with_context(|| format!("compiling {}", input.display()))?;

    let output = input.with_extension("s");
    std::fs::write(&output, asm).with_context(|| format!("writing {}", output.display()))?;

    log::info!("wrote {}", output.display());
    Ok(())
}
