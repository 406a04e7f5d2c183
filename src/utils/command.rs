/// Check if a command exists in PATH, or is an executable path
pub fn command_exists(command: &str) -> bool {
    which::which(command).is_ok()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn finds_shell_by_name_and_path() {
        assert!(command_exists("sh"));
        assert!(command_exists("/bin/sh"));
    }

    #[test]
    fn missing_command_is_not_found() {
        assert!(!command_exists("definitely-not-a-real-program-5f1c"));
    }
}
