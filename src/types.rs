use std::str::FromStr;

use serde::Deserialize;

/// How the compiler hands back its result.
///
/// - `Argument`: the command is called as `<command> <input> <output>` and
///   writes the output file itself.
/// - `Stdout`: the command is called as `<command> <input>` and prints the
///   compiled result; the captured stdout is written to the output file.
/// - `Auto`: `Stdout` for `plessc`-style commands, `Argument` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Auto,
    Argument,
    Stdout,
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Auto
    }
}

impl OutputMode {
    /// Whether the compiler output must be taken from stdout for `command`.
    pub fn captures_stdout(self, command: &str) -> bool {
        match self {
            OutputMode::Argument => false,
            OutputMode::Stdout => true,
            OutputMode::Auto => command.contains("plessc"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(OutputMode::Auto),
            "argument" | "arg" => Ok(OutputMode::Argument),
            "stdout" => Ok(OutputMode::Stdout),
            other => Err(format!(
                "invalid output_mode: {other} (expected \"auto\", \"argument\" or \"stdout\")"
            )),
        }
    }
}
