//! Stop-command clip names: `"<keyword><TrackName>"`.
//!
//! A pattern slot whose name starts with the stop keyword is never looked up
//! in the device mapping. Instead, when it plays, the device track with the
//! trimmed remainder as its exact name is stopped.

use crate::StopCommandError;

/// Returns true if `name` starts with `keyword`.
///
/// An empty keyword disables stop commands entirely.
#[inline]
pub fn is_stop_command(name: &str, keyword: &str) -> bool {
    !keyword.is_empty() && name.starts_with(keyword)
}

/// Extracts the target track name from a stop-command clip name.
///
/// Returns `None` if `name` is not a stop command, and an error if the
/// trimmed target is empty.
///
/// # Example
///
/// ```rust
/// use pattern_tracker_core::parse_stop_command;
///
/// assert_eq!(parse_stop_command("[stop] Drums ", "[stop]"), Some(Ok("Drums")));
/// assert_eq!(parse_stop_command("bassline", "[stop]"), None);
/// assert!(matches!(parse_stop_command("[stop]   ", "[stop]"), Some(Err(_))));
/// ```
pub fn parse_stop_command<'a>(
    name: &'a str,
    keyword: &str,
) -> Option<Result<&'a str, StopCommandError>> {
    if !is_stop_command(name, keyword) {
        return None;
    }
    let target = name[keyword.len()..].trim();
    if target.is_empty() {
        Some(Err(StopCommandError::EmptyTarget {
            keyword: keyword.to_string(),
        }))
    } else {
        Some(Ok(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_must_be_a_prefix() {
        assert!(is_stop_command("[stop]Drums", "[stop]"));
        assert!(!is_stop_command("Drums[stop]", "[stop]"));
        assert!(!is_stop_command("[STOP]Drums", "[stop]"));
    }

    #[test]
    fn empty_keyword_disables_stop_commands() {
        assert!(!is_stop_command("anything", ""));
        assert_eq!(parse_stop_command("anything", ""), None);
    }

    #[test]
    fn target_is_trimmed() {
        assert_eq!(
            parse_stop_command("[stop]  Lead Synth\t", "[stop]"),
            Some(Ok("Lead Synth"))
        );
    }

    #[test]
    fn bare_keyword_is_invalid() {
        assert_eq!(
            parse_stop_command("[stop]", "[stop]"),
            Some(Err(StopCommandError::EmptyTarget {
                keyword: "[stop]".to_string()
            }))
        );
    }

    #[test]
    fn custom_keyword() {
        assert_eq!(parse_stop_command("off:Bass", "off:"), Some(Ok("Bass")));
    }
}
