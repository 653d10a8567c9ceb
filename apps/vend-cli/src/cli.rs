//! Command line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::config::VendConfig;
use crate::render::DisplayStyle;

/// Interactive vending machine terminal.
#[derive(Debug, Parser)]
#[command(name = "vend", version, about)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Channel listing style, overrides the configuration
    #[arg(long, value_enum)]
    pub style: Option<DisplayStyle>,

    /// Do not print input prompts
    #[arg(long)]
    pub quiet_prompts: bool,
}

impl Cli {
    /// Applies flag overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut VendConfig) {
        if let Some(style) = self.style {
            config.style = style;
        }
        if self.quiet_prompts {
            config.prompts = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "vend",
            "--config",
            "vend.toml",
            "-v",
            "--style",
            "compact",
            "--quiet-prompts",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("vend.toml")));
        assert!(cli.verbose);
        assert_eq!(cli.style, Some(DisplayStyle::Compact));
        assert!(cli.quiet_prompts);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from(["vend", "--style", "compact", "--quiet-prompts"]).unwrap();
        let mut config = VendConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.style, DisplayStyle::Compact);
        assert!(!config.prompts);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["vend"]).unwrap();
        let mut config = VendConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, VendConfig::default());
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(Cli::try_parse_from(["vend", "--style", "fancy"]).is_err());
    }
}
