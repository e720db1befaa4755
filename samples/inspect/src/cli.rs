use std::path::PathBuf;

use clap::ValueHint;
use weld::Dedup;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum DedupArg {
    Hashed,
    Linear,
}

impl std::fmt::Display for DedupArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DedupArg::Hashed => f.write_str("hashed"),
            DedupArg::Linear => f.write_str("linear"),
        }
    }
}

impl From<DedupArg> for Dedup {
    fn from(value: DedupArg) -> Self {
        match value {
            DedupArg::Hashed => Dedup::Hashed,
            DedupArg::Linear => Dedup::Linear,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,weld=info,weld_inspect=info",
        env = "WELD_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
    /// Name of the mesh to inspect; the first mesh of each file if absent
    #[arg(short, long)]
    pub mesh: Option<String>,
    /// How duplicate vertex attributes are found
    #[arg(short, long, default_value_t = DedupArg::Hashed)]
    pub dedup: DedupArg,
    /// Weld each channel on its own thread
    #[arg(short, long)]
    pub parallel: bool,
    /// Files to inspect (.obj, .gltf, .glb)
    #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["weld-inspect", "a.obj"]).unwrap();
        assert_eq!(cli.mesh, None);
        assert_eq!(Dedup::from(cli.dedup), Dedup::Hashed);
        assert!(!cli.parallel);
        assert_eq!(cli.files, [PathBuf::from("a.obj")]);
    }

    #[test]
    fn requires_files() {
        assert!(Cli::try_parse_from(["weld-inspect"]).is_err());
    }

    #[test]
    fn options() {
        let cli = Cli::try_parse_from([
            "weld-inspect",
            "--mesh",
            "Head",
            "--dedup",
            "linear",
            "--parallel",
            "a.gltf",
            "b.glb",
        ])
        .unwrap();
        assert_eq!(cli.mesh.as_deref(), Some("Head"));
        assert_eq!(cli.dedup, DedupArg::Linear);
        assert!(cli.parallel);
        assert_eq!(cli.files.len(), 2);
    }
}
