/// CLI arguments.
#[derive(clap::Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mulberry", version, about = "Windowed viewer for large text files")]
pub struct Args {
    /// File to view.
    pub file: std::path::PathBuf,
    /// Configuration file path (overrides discovery of `mulberry.toml`).
    #[arg(long = "config", short = 'c')]
    pub config: Option<std::path::PathBuf>,
}
