// src/system/executor.rs

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
}

/// Turns command-line words into program and arguments.
///
/// A single word is read as a whole command line and split with shell quoting
/// rules, so `"sleep 0.1"` and `sleep 0.1` run the same thing. Several words are
/// taken as already split.
pub fn resolve_command(words: &[String]) -> Result<Vec<String>, ExecutionError> {
    let parts = match words {
        [command_line] => shlex::split(command_line.trim())
            .ok_or_else(|| ExecutionError::CommandParse(command_line.clone()))?,
        _ => words.to_vec(),
    };
    if parts.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    Ok(parts)
}

/// Runs `parts[0]` with the remaining parts as arguments and waits for it.
///
/// With `quiet`, the command's stdout and stderr are discarded; otherwise they
/// are passed through to the terminal. Stdin is never connected, so a command
/// cannot stall a benchmark waiting for input.
pub fn execute(parts: &[String], cwd: &Path, quiet: bool) -> Result<(), ExecutionError> {
    let (program, args) = parts.split_first().ok_or(ExecutionError::EmptyCommand)?;
    let display = shlex::try_join(parts.iter().map(String::as_str))
        .unwrap_or_else(|_| parts.join(" "));
    let clean_cwd = dunce::simplified(cwd);

    let output_mode = || if quiet { Stdio::null() } else { Stdio::inherit() };

    let status = match StdCommand::new(program)
        .args(args)
        .current_dir(clean_cwd)
        .stdin(Stdio::null())
        .stdout(output_mode())
        .stderr(output_mode())
        .status()
    {
        Ok(status) => status,
        // Windows built-ins such as `echo` only exist inside cmd.exe.
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(&display)
                .current_dir(clean_cwd)
                .stdin(Stdio::null())
                .stdout(output_mode())
                .stderr(output_mode())
                .status()
                .map_err(|e| ExecutionError::CommandFailed(display.clone(), e))?
        }
        Err(e) => return Err(ExecutionError::CommandFailed(display, e)),
    };

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus(display));
    }
    Ok(())
}
