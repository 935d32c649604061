//! Fake WebHare installation for tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::{LogMode, ServerConfig, DEFAULT_BASE_PORT};
use crate::dispatcher::Dispatcher;
use crate::invoker::CliInvoker;

/// Stand-in for `bin/wh`, keyed on the subcommand.
///
/// `isrunning` succeeds unless a `stopped` marker exists in the installation root.
const FAKE_WH: &str = r#"#!/bin/bash
case "$1" in
  getmodulelist) printf 'modA  modB   modC\n' ;;
  isrunning) [ ! -e stopped ] || exit 1 ;;
  env) echo "$WEBHARE_DIR|$WEBHARE_DATAROOT|$WEBHARE_BASEPORT|$WH_FUNCTIONS" ;;
  echo-args) shift; printf '%s\n' "$@" ;;
  fail-with-output) echo "partial result"; exit 3 ;;
  fail-silent) echo "boom" >&2; exit 4 ;;
  quiet) ;;
  slow) sleep 0.2; echo "slow $2" ;;
  *) echo "unknown command $1" >&2; exit 2 ;;
esac
"#;

const FAKE_FUNCTIONS: &str = "export WH_FUNCTIONS=loaded\n";

pub struct FakeInstall {
    dir: TempDir,
    pub config: ServerConfig,
}

impl FakeInstall {
    /// A complete installation: `bin/wh`, `lib/wh-functions.sh` and a data root.
    pub fn new() -> Self {
        let install = Self::empty();
        let whtree = &install.config.webhare_dir;
        fs::create_dir_all(whtree.join("bin")).unwrap();
        fs::create_dir_all(whtree.join("lib")).unwrap();
        fs::create_dir_all(&install.config.data_root).unwrap();
        fs::write(install.config.functions_path(), FAKE_FUNCTIONS).unwrap();

        let cli = install.config.cli_path();
        fs::write(&cli, FAKE_WH).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&cli, fs::Permissions::from_mode(0o755)).unwrap();
        }
        install
    }

    /// Nothing on disk except the script directory.
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let scripts = dir.path().join("scripts");
        fs::create_dir_all(&scripts).unwrap();
        let config = Self::config_for(&dir.path().join("whtree"), &scripts);
        Self { dir, config }
    }

    pub fn config_for(webhare_dir: &Path, script_dir: &Path) -> ServerConfig {
        let home = webhare_dir.parent().unwrap_or(webhare_dir).to_path_buf();
        ServerConfig {
            data_root: home.join("whdata"),
            home,
            webhare_dir: webhare_dir.to_path_buf(),
            base_port: DEFAULT_BASE_PORT,
            script_dir: script_dir.to_path_buf(),
            log: LogMode::Stderr,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Make `wh isrunning` fail from now on.
    pub fn stop(&self) {
        fs::write(self.config.webhare_dir.join("stopped"), "").unwrap();
    }

    pub fn invoker(&self) -> CliInvoker {
        CliInvoker::new(Arc::new(self.config.clone()))
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(Arc::new(self.config.clone()))
    }

    /// Transient scripts still present in the script directory
    pub fn scripts_left(&self) -> Vec<PathBuf> {
        fs::read_dir(&self.config.script_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }
}
