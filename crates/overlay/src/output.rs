//! Output formatting shared by the commands.

use owo_colors::OwoColorize;
use serde::Serialize;

/// How a command reports its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }

    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error the way every command does in human mode.
pub fn print_error(message: impl std::fmt::Display) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// Report a failed command in the requested format.
pub fn report_failure(format: OutputFormat, message: impl std::fmt::Display) {
    if format.is_json() {
        if let Err(e) = print_json(&CommandResult::<()>::failed(&message)) {
            print_error(e);
        }
    } else {
        print_error(message);
    }
}

/// JSON envelope for commands that can fail.
#[derive(Debug, Serialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_omits_data() {
        let result: CommandResult<String> = CommandResult::failed("boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "boom" }));
    }

    #[test]
    fn test_format_from_flag() {
        assert!(OutputFormat::from_flag(true).is_json());
        assert_eq!(OutputFormat::from_flag(false), OutputFormat::Human);
    }
}
