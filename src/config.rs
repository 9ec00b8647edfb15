// SCALE DRIVER CONFIGURATION
// BUILT ONCE AT STARTUP FROM THE CLI AND PASSED BY REFERENCE TO EVERY
// COMPONENT. NOTHING HERE CHANGES AFTER THE RUN STARTS.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::DriverError;
use crate::growth::{GrowthMode, WorkloadSequence};
use crate::round::Mode;

// RESERVED NAMESPACE FOR SCALE RUNS. DETERMINISTIC SO AN OPERATOR CAN
// `quilt stop` IT BY HAND IF THE DRIVER DIES MID-RUN.
pub const SCALE_NAMESPACE: &str =
    "scale-bd89e4c89f4d384e7afb155a3af99d8a6f4f5a06a9fecf0b6d220eb66e";

pub const DEFAULT_SPEC_DIR: &str = "./plot";
pub const DEFAULT_OUT_FILE: &str = "./tmp/scale-output";
pub const DEFAULT_LOG_FILE: &str = "./tmp/scale-logs";

pub const PREBOOT_SPEC: &str = "preboot-scale.spec";
pub const BOOT_SPEC: &str = "scale.spec";
pub const FULL_MESH_BOOT_SPEC: &str = "scale-full-mesh.spec";
pub const POSTBOOT_SPEC: &str = "postboot-scale.spec";
pub const FULL_MESH_POST_SPEC: &str = "post-scale-full-mesh.spec";

pub const DEFAULT_SETTLE_SECS: u64 = 120;
pub const DEFAULT_GRACE_SECS: u64 = 90;

// WHICH LAUNCHES OF A ROUND CARRY THE EXTRA ARGS (e.g. -ip-only)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExtraArgPolicy {
    FirstLaunch,
    EveryLaunch,
}

impl ExtraArgPolicy {
    pub fn applies(self, launch: u32) -> bool {
        match self {
            Self::FirstLaunch => launch == 1,
            Self::EveryLaunch => true,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstLaunch => "first-launch",
            Self::EveryLaunch => "every-launch",
        }
    }
}

impl FromStr for ExtraArgPolicy {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-launch" | "first" => Ok(Self::FirstLaunch),
            "every-launch" | "every" => Ok(Self::EveryLaunch),
            _ => Err(DriverError::UnknownRetryPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ExtraArgPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug)]
pub struct SpecFiles {
    pub preboot:        PathBuf,
    pub boot:           PathBuf,
    pub full_mesh_boot: PathBuf,
    pub postboot:       PathBuf,
    pub full_mesh_post: PathBuf,
}

impl SpecFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            preboot: dir.join(PREBOOT_SPEC),
            boot: dir.join(BOOT_SPEC),
            full_mesh_boot: dir.join(FULL_MESH_BOOT_SPEC),
            postboot: dir.join(POSTBOOT_SPEC),
            full_mesh_post: dir.join(FULL_MESH_POST_SPEC),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub start:            u64,
    pub factor:           f64,
    pub growth:           GrowthMode,
    pub full_mesh:        bool,
    pub image:            Option<String>,
    pub specs:            SpecFiles,
    pub out_file:         PathBuf,
    pub log_file:         PathBuf,
    pub scale_cmd:        Vec<String>,
    pub swarm_cmd:        Vec<String>,
    pub reset_cmd:        Vec<String>,
    pub settle:           Duration,
    pub grace:            Duration,
    pub extra_arg_policy: ExtraArgPolicy,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            start: 100,
            factor: 1.5,
            growth: GrowthMode::Exponential,
            full_mesh: false,
            image: None,
            specs: SpecFiles::in_dir(Path::new(DEFAULT_SPEC_DIR)),
            out_file: PathBuf::from(DEFAULT_OUT_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            scale_cmd: vec!["scale".to_string()],
            swarm_cmd: vec!["swarm".to_string()],
            reset_cmd: vec![
                "quilt".to_string(),
                "stop".to_string(),
                SCALE_NAMESPACE.to_string(),
            ],
            settle: Duration::from_secs(DEFAULT_SETTLE_SECS),
            grace: Duration::from_secs(DEFAULT_GRACE_SECS),
            extra_arg_policy: ExtraArgPolicy::FirstLaunch,
        }
    }
}

impl DriverConfig {
    // FAIL FAST ON ANYTHING THAT WOULD ONLY SURFACE MID-RUN
    pub fn validate(&self) -> Result<(), DriverError> {
        self.sequence()?;
        if self.scale_cmd.is_empty() {
            return Err(DriverError::EmptyCommand("scale"));
        }
        if self.reset_cmd.is_empty() {
            return Err(DriverError::EmptyCommand("reset"));
        }
        if self.image.is_some() && self.swarm_cmd.is_empty() {
            return Err(DriverError::EmptyCommand("swarm"));
        }
        Ok(())
    }

    pub fn sequence(&self) -> Result<WorkloadSequence, DriverError> {
        self.growth.sequence(self.start, self.factor)
    }

    // ROUND VARIANTS RUN PER WORKLOAD SIZE, IN ORDER
    pub fn modes(&self) -> Vec<Mode> {
        let mut modes = vec![Mode::Disconnected];
        if self.full_mesh {
            modes.push(Mode::FullMesh);
        }
        if self.image.is_some() {
            modes.push(Mode::Swarm);
        }
        modes
    }

    // TEMPLATES THE GIVEN MODES READ
    pub fn templates_for(&self, modes: &[Mode]) -> Vec<&Path> {
        let mut paths: Vec<&Path> = vec![self.specs.preboot.as_path()];
        for mode in modes {
            let needed = match mode {
                Mode::Disconnected => vec![&self.specs.boot, &self.specs.postboot],
                Mode::FullMesh => vec![&self.specs.full_mesh_boot, &self.specs.full_mesh_post],
                Mode::Swarm => Vec::new(),
            };
            for p in needed {
                if !paths.contains(&p.as_path()) {
                    paths.push(p.as_path());
                }
            }
        }
        paths
    }

    pub fn command_for(&self, mode: Mode) -> &[String] {
        match mode {
            Mode::Swarm => &self.swarm_cmd,
            Mode::Disconnected | Mode::FullMesh => &self.scale_cmd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = DriverConfig::default();
        config.validate().unwrap();
        assert_eq!(config.modes(), vec![Mode::Disconnected]);
        assert_eq!(config.settle, Duration::from_secs(120));
        assert_eq!(config.grace, Duration::from_secs(90));
    }

    #[test]
    fn modes_follow_flags() {
        let config = DriverConfig {
            full_mesh: true,
            image: Some("nginx".to_string()),
            ..DriverConfig::default()
        };
        assert_eq!(config.modes(), vec![Mode::Disconnected, Mode::FullMesh, Mode::Swarm]);
    }

    #[test]
    fn templates_deduplicated_per_mode() {
        let config = DriverConfig {
            specs: SpecFiles::in_dir(Path::new("specs")),
            ..DriverConfig::default()
        };
        let primary = config.templates_for(&[Mode::Disconnected]);
        assert_eq!(primary.len(), 3);
        assert_eq!(primary[0], Path::new("specs/preboot-scale.spec"));

        let all = config.templates_for(&[Mode::Disconnected, Mode::FullMesh, Mode::Swarm]);
        assert_eq!(all.len(), 5);

        let swarm_only = config.templates_for(&[Mode::Swarm]);
        assert_eq!(swarm_only, vec![Path::new("specs/preboot-scale.spec")]);
    }

    #[test]
    fn empty_reset_rejected() {
        let config = DriverConfig {
            reset_cmd: Vec::new(),
            ..DriverConfig::default()
        };
        assert!(matches!(config.validate(), Err(DriverError::EmptyCommand("reset"))));
    }

    #[test]
    fn bad_growth_parameters_rejected() {
        let config = DriverConfig {
            growth: GrowthMode::Linear,
            factor: 1.5,
            ..DriverConfig::default()
        };
        assert!(matches!(config.validate(), Err(DriverError::InvalidFactor { .. })));
    }

    #[test]
    fn extra_arg_policy() {
        assert!(ExtraArgPolicy::FirstLaunch.applies(1));
        assert!(!ExtraArgPolicy::FirstLaunch.applies(2));
        assert!(ExtraArgPolicy::EveryLaunch.applies(5));
        assert_eq!("every".parse::<ExtraArgPolicy>().unwrap(), ExtraArgPolicy::EveryLaunch);
        assert!("sometimes".parse::<ExtraArgPolicy>().is_err());
    }
}
