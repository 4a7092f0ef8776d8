/// One line typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DriverCommand {
    /// Follow a link, internal (`/contacts`) or external (`https://...`).
    Open(String),
    Back,
    Logout,
    Quit,
    Help,
}

pub(crate) const HELP: &str = "commands: <path or url> | back | logout | help | quit";

pub(crate) fn parse_command(line: &str) -> Option<DriverCommand> {
    let line = line.trim();
    let command = match line {
        "" => return None,
        "back" => DriverCommand::Back,
        "logout" => DriverCommand::Logout,
        "quit" | "exit" => DriverCommand::Quit,
        "help" | "?" => DriverCommand::Help,
        other => {
            let target = other.strip_prefix("open ").unwrap_or(other).trim();
            if target.is_empty() {
                return None;
            }
            DriverCommand::Open(target.to_string())
        }
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keywords_and_links() {
        assert_eq!(parse_command("  back "), Some(DriverCommand::Back));
        assert_eq!(parse_command("logout"), Some(DriverCommand::Logout));
        assert_eq!(parse_command("exit"), Some(DriverCommand::Quit));
        assert_eq!(
            parse_command("/quote?id=abc"),
            Some(DriverCommand::Open("/quote?id=abc".into()))
        );
        assert_eq!(
            parse_command("open https://medicare.gov"),
            Some(DriverCommand::Open("https://medicare.gov".into()))
        );
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("open "), None);
    }
}
