//! Platform-specific ping command construction
//!
//! The system ping binary takes different flags on every platform. This
//! module knows which flags to pass, so the runner can stay
//! platform-agnostic. Output parsing lives in the parent module and
//! recognizes every summary format, since the text depends on the
//! installed ping variant rather than the platform alone.

use std::time::Duration;

/// Platform-specific ping invocation settings
#[derive(Debug, Clone)]
pub struct PlatformPingCommand {
    /// Name of the ping executable
    pub binary: &'static str,
    /// Flag that sets the echo request count
    pub count_flag: &'static str,
    /// Whether a per-reply wait flag is supported
    pub supports_reply_timeout: bool,
}

impl Default for PlatformPingCommand {
    fn default() -> Self {
        Self::for_current_platform()
    }
}

impl PlatformPingCommand {
    /// Create ping command settings for the current platform
    pub fn for_current_platform() -> Self {
        #[cfg(target_os = "windows")]
        {
            Self::windows_command()
        }
        #[cfg(target_os = "macos")]
        {
            Self::macos_command()
        }
        #[cfg(target_os = "linux")]
        {
            Self::linux_command()
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            Self::generic_command()
        }
    }

    /// Windows ping.exe settings
    #[cfg(target_os = "windows")]
    pub fn windows_command() -> Self {
        Self {
            binary: "ping",
            count_flag: "-n",
            supports_reply_timeout: true, // -w takes milliseconds
        }
    }

    /// macOS ping settings
    #[cfg(target_os = "macos")]
    pub fn macos_command() -> Self {
        Self {
            binary: "ping",
            count_flag: "-c",
            supports_reply_timeout: false, // -W exists but takes milliseconds and varies by version
        }
    }

    /// Linux iputils ping settings
    #[cfg(target_os = "linux")]
    pub fn linux_command() -> Self {
        Self {
            binary: "ping",
            count_flag: "-c",
            supports_reply_timeout: true, // -W takes seconds
        }
    }

    /// Conservative settings for other platforms
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    pub fn generic_command() -> Self {
        Self {
            binary: "ping",
            count_flag: "-c",
            supports_reply_timeout: false,
        }
    }

    /// Build the argument list for one ping run
    pub fn build_args(&self, host: &str, count: u32, reply_timeout: Duration) -> Vec<String> {
        let mut args = vec![self.count_flag.to_string(), count.to_string()];

        if self.supports_reply_timeout {
            #[cfg(target_os = "windows")]
            {
                args.push("-w".to_string());
                args.push(reply_timeout.as_millis().to_string());
            }
            #[cfg(not(target_os = "windows"))]
            {
                args.push("-W".to_string());
                args.push(reply_timeout.as_secs().max(1).to_string());
            }
        }

        args.push(host.to_string());
        args
    }
}

/// Get the current platform name
pub fn get_platform_name() -> String {
    #[cfg(target_os = "windows")]
    {
        "Windows".to_string()
    }
    #[cfg(target_os = "macos")]
    {
        "macOS".to_string()
    }
    #[cfg(target_os = "linux")]
    {
        "Linux".to_string()
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        "Unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_command_creation() {
        let cmd = PlatformPingCommand::for_current_platform();
        assert_eq!(cmd.binary, "ping");
        assert!(cmd.count_flag == "-c" || cmd.count_flag == "-n");
    }

    #[test]
    fn test_build_args_contains_count_and_host() {
        let cmd = PlatformPingCommand::for_current_platform();
        let args = cmd.build_args("8.8.8.8", 10, Duration::from_secs(2));

        assert_eq!(args[0], cmd.count_flag);
        assert_eq!(args[1], "10");
        assert_eq!(args.last().unwrap(), "8.8.8.8");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_args() {
        let cmd = PlatformPingCommand::linux_command();
        let args = cmd.build_args("1.1.1.1", 4, Duration::from_secs(2));

        assert_eq!(args, vec!["-c", "4", "-W", "2", "1.1.1.1"]);
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_macos_args() {
        let cmd = PlatformPingCommand::macos_command();
        let args = cmd.build_args("1.1.1.1", 4, Duration::from_secs(2));

        assert_eq!(args, vec!["-c", "4", "1.1.1.1"]);
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_windows_args() {
        let cmd = PlatformPingCommand::windows_command();
        let args = cmd.build_args("1.1.1.1", 4, Duration::from_secs(2));

        assert_eq!(args, vec!["-n", "4", "-w", "2000", "1.1.1.1"]);
    }

    #[test]
    fn test_reply_timeout_floor() {
        let cmd = PlatformPingCommand::for_current_platform();
        // Sub-second timeouts must not produce a zero wait value
        let args = cmd.build_args("8.8.8.8", 1, Duration::from_millis(300));
        assert!(!args.contains(&"0".to_string()));
    }

    #[test]
    fn test_platform_name() {
        let platform = get_platform_name();
        assert!(!platform.is_empty());
        assert!(
            platform == "Windows"
                || platform == "macOS"
                || platform == "Linux"
                || platform == "Unknown"
        );
    }
}
