use std::io;
use std::process::{Command as StdCommand, Stdio};
use std::thread;

use thiserror::Error;

use crate::publish::ArtifactLocation;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to launch viewer `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Opens the artifact once in an external viewer. `program` overrides the
/// platform's default opener. The viewer is detached; only the launch is
/// checked.
pub fn open_artifact(
    location: &ArtifactLocation,
    program: Option<&str>,
) -> Result<(), DisplayError> {
    let url = location.url();
    let mut command = match program {
        Some(program) => {
            let mut command = StdCommand::new(program);
            command.arg(&url);
            command
        }
        None => platform_opener(&url),
    };
    let program_name = command.get_program().to_string_lossy().to_string();

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| DisplayError::Launch {
            program: program_name.clone(),
            source,
        })?;

    log::info!("Opened {} with {} (PID: {})", url, program_name, child.id());

    // Reap the viewer launcher so it does not linger as a zombie.
    thread::spawn(move || {
        if let Err(e) = child.wait() {
            log::warn!("Viewer wait error: {}", e);
        }
    });

    Ok(())
}

#[cfg(target_os = "macos")]
fn platform_opener(url: &str) -> StdCommand {
    let mut command = StdCommand::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn platform_opener(url: &str) -> StdCommand {
    let mut command = StdCommand::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_opener(url: &str) -> StdCommand {
    let mut command = StdCommand::new("xdg-open");
    command.arg(url);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn launches_configured_program() {
        let location = ArtifactLocation::new("/tmp/tracker.html");
        open_artifact(&location, Some("true")).unwrap();
    }

    #[test]
    fn missing_program_is_reported() {
        let location = ArtifactLocation::new("/tmp/tracker.html");
        let err = open_artifact(&location, Some("definitely-not-a-viewer-binary")).unwrap_err();
        assert!(matches!(
            err,
            DisplayError::Launch { ref program, .. } if program == "definitely-not-a-viewer-binary"
        ));
    }
}
