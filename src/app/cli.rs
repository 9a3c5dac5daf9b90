use clap::Parser;

/// Read data from your Easee EV installation.
#[derive(Debug, Parser)]
#[command(name = "easee", version, about, long_about = None)]
pub struct Cli {
    /// Print the listing data of every charger
    #[arg(short, long)]
    pub chargers: bool,

    /// Print the decoded state of every charger
    #[arg(long)]
    pub state: bool,

    /// Print site information
    #[arg(short, long)]
    pub sites: bool,

    /// Print the site, circuit and charger tree of the account
    #[arg(short, long)]
    pub all: bool,

    /// Print the countries Easee is active in
    #[arg(long)]
    pub countries: bool,

    /// Be verbose
    #[arg(short, long)]
    pub verbose: bool,

    /// Print debugging statements
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    pub fn needs_sites(&self) -> bool {
        self.chargers || self.state || self.sites || self.all
    }

    pub fn has_action(&self) -> bool {
        self.needs_sites() || self.countries
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from(["easee", "-c", "-a", "-v"]).expect("flags should parse");

        assert!(cli.chargers);
        assert!(cli.all);
        assert!(!cli.sites);
        assert_eq!(cli.log_directive(), "info");
        assert!(cli.needs_sites());
    }

    #[test]
    fn debug_wins_over_verbose() {
        let cli = Cli::try_parse_from(["easee", "--countries", "-v", "-d"]).expect("flags");

        assert_eq!(cli.log_directive(), "debug");
        assert!(!cli.needs_sites());
        assert!(cli.has_action());
    }

    #[test]
    fn defaults_to_warn_without_actions() {
        let cli = Cli::try_parse_from(["easee"]).expect("no flags");

        assert_eq!(cli.log_directive(), "warn");
        assert!(!cli.has_action());
    }
}
