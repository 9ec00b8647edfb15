// TEST ROUND VARIANTS AND THEIR COMMAND LINES
// VARIANTS SHARE ONE OUTPUT/LOG DIRECTORY, SO EACH ONE WRITES TO ITS OWN
// SUFFIXED OUT AND LOG FILES.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::DriverConfig;
use crate::template::materialized_path;

pub const IP_ONLY_FLAG: &str = "-ip-only";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Disconnected,
    FullMesh,
    Swarm,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Self::Disconnected, Self::FullMesh, Self::Swarm];

    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "DISCONNECTED",
            Self::FullMesh => "FULL-MESH",
            Self::Swarm => "SWARM",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Disconnected => ".disconnect",
            Self::FullMesh => ".connected",
            Self::Swarm => ".swarm",
        }
    }
}

pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

fn flag(name: &str, value: impl AsRef<Path>) -> String {
    format!("-{}={}", name, value.as_ref().display())
}

// FULL ARGUMENT VECTOR (PROGRAM FIRST) FOR ONE LAUNCH OF A ROUND
pub fn command_line(config: &DriverConfig, mode: Mode, size: u64, extra: &[&str]) -> Vec<String> {
    let specs = &config.specs;
    let mut argv: Vec<String> = config.command_for(mode).to_vec();

    argv.push(flag("preboot-stitch", materialized_path(&specs.preboot)));
    match mode {
        Mode::Disconnected => {
            argv.push(flag("stitch", materialized_path(&specs.boot)));
            argv.push(flag("postboot-stitch", materialized_path(&specs.postboot)));
        }
        Mode::FullMesh => {
            argv.push(flag("stitch", materialized_path(&specs.full_mesh_boot)));
            argv.push(flag("postboot-stitch", materialized_path(&specs.full_mesh_post)));
        }
        Mode::Swarm => {
            argv.push(format!("-containers={}", size));
            argv.push(format!("-image={}", config.image.as_deref().unwrap_or_default()));
        }
    }
    argv.push(flag("out-file", with_suffix(&config.out_file, mode.suffix())));
    argv.push(flag("log-file", with_suffix(&config.log_file, mode.suffix())));
    argv.push("-append".to_string());
    argv.push("-nostop".to_string());
    argv.extend(extra.iter().map(|s| s.to_string()));
    argv
}
