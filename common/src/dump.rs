//! Sources of raw diagnostic text.

/// Produces the raw text of a diagnostic dump, either by running a tool or by
/// reading a previously captured file.
pub trait DumpSource {
    /// Short name of the origin (file stem or CA/interface name).
    ///
    /// Used in log lines and in generated file names.
    fn label(&self) -> String;

    /// Blocks until the whole dump is available.
    fn read(&self) -> anyhow::Result<String>;
}
