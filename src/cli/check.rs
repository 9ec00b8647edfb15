use std::path::Path;
use std::process::Command;

use anyhow::{bail, Result};

use scale_driver::config::DriverConfig;

use super::run::RunArgs;

fn check_tool(name: &str) -> bool {
    if name.contains('/') {
        return Path::new(name).is_file();
    }
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

// EVERYTHING A RUN NEEDS BEFORE THE FIRST LAUNCH. PRINTS ONE LINE PER ITEM.
pub fn preflight(config: &DriverConfig) -> bool {
    let mut ok = true;

    println!("TOOLS:");
    let mut tools = vec![("scale", config.scale_cmd.first()), ("reset", config.reset_cmd.first())];
    if config.image.is_some() {
        tools.push(("swarm", config.swarm_cmd.first()));
    }
    for (role, program) in tools {
        let program = program.map(String::as_str).unwrap_or("");
        if !program.is_empty() && check_tool(program) {
            println!("  {:<8}{:<24}OK", role, program);
        } else {
            println!("  {:<8}{:<24}MISSING", role, program);
            ok = false;
        }
    }
    println!();

    println!("TEMPLATES:");
    for path in config.templates_for(&config.modes()) {
        if path.is_file() {
            println!("  {:<40}OK", path.display());
        } else {
            println!("  {:<40}NOT FOUND", path.display());
            ok = false;
        }
    }
    println!();

    ok
}

pub fn run_check(args: RunArgs) -> Result<()> {
    println!("SCALE DRIVER DEPENDENCY CHECK");
    println!();

    let config = args.into_config()?;
    config.validate()?;

    if preflight(&config) {
        println!("ALL CHECKS PASSED");
        Ok(())
    } else {
        if !check_tool("quilt") {
            println!("  quilt is not on PATH: build it and add $GOPATH/bin to PATH");
        }
        bail!("SOME CHECKS FAILED");
    }
}
