use clap::Parser;

/// Mute the microphone from a global hotkey.
#[derive(Debug, Clone, Parser)]
#[command(name = "silence", version, about)]
pub struct Cli {
    /// Start quietly in the tray without the startup notification.
    #[arg(long)]
    pub minimized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimized_flag() {
        assert!(!Cli::parse_from(["silence"]).minimized);
        assert!(Cli::parse_from(["silence", "--minimized"]).minimized);
        assert!(Cli::try_parse_from(["silence", "--bogus"]).is_err());
    }
}
