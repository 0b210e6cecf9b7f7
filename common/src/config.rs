/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Disables the startup banner.
    pub no_banner: bool,
    /// `1` hides headers and trees, `2` keeps only the final status lines.
    pub quiet: u8,
    /// Lets external tools write to the terminal and logs every lookup.
    pub debug: bool,
}
