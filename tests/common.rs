use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Unreachable endpoint so tests never hit GitHub by accident.
pub const OFFLINE_URL: &str = "http://127.0.0.1:9";

/// Stand-in for the upstream installer: parses `-b DIR [VERSION]` and writes
/// a stub golangci-lint that reports the version and echoes its arguments.
#[allow(dead_code)]
pub const FAKE_INSTALLER: &str = r#"#!/bin/sh
set -e
while getopts "b:" opt; do
  case "$opt" in
    b) BINDIR="$OPTARG" ;;
    *) exit 2 ;;
  esac
done
shift $((OPTIND - 1))
VERSION="${1:-latest}"
mkdir -p "$BINDIR"
printf '#!/bin/sh\necho "golangci-lint has version %s"\necho "args: $*"\n' "$VERSION" > "$BINDIR/golangci-lint"
chmod 755 "$BINDIR/golangci-lint"
"#;

#[allow(dead_code)]
pub struct TestContext {
    pub _temp_dir: TempDir,
    pub config_path: PathBuf,
    pub bin_dir: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config").join("config.json");
        let bin_dir = temp_dir.path().join("gopath").join("bin");

        let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_golang-ci"));

        Self {
            _temp_dir: temp_dir,
            config_path,
            bin_dir,
            bin_path,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.env("GOLANG_CI_CONFIG", &self.config_path);
        cmd.env("GOLANG_CI_BIN_DIR", &self.bin_dir);
        cmd.env("GOLANG_CI_RELEASES_URL", format!("{}/releases", OFFLINE_URL));
        cmd.env("GOLANG_CI_INSTALLER_URL", format!("{}/install.sh", OFFLINE_URL));
        cmd.env("HOME", self._temp_dir.path());
        cmd.env_remove("GOPATH");
        cmd.env_remove("GOLANG_CI_PAGE_SIZE");
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("GITHUB_TOKEN");
        cmd
    }

    /// Writes an executable shell script into the cache directory.
    #[cfg(unix)]
    pub fn write_stub_linter(&self, file_name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(&self.bin_dir).expect("Failed to create bin dir");
        let path = self.bin_dir.join(file_name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write stub");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod stub");
        path
    }
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.status.success(),
            "Command unexpectedly succeeded\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
