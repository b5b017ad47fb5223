mod assets;
mod config;
mod global;
mod misc;
mod release_info;
mod release_notes;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use simple_log::LogConfigBuilder;

use crate::global::*;
use crate::release_info::SplitSummary;

/// Prepares a release info JSON file for the update checker: converts the
/// markdown body to HTML and moves new-architecture assets to `assetsNew`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Release info JSON file, rewritten in place
    path: PathBuf,

    /// Print the result instead of overwriting the file
    #[arg(long)]
    dry_run: bool,

    /// JSON file overriding the asset split rule
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a diagnostic log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Level for the diagnostic log
    #[arg(long, default_value = LOG_LEVEL)]
    log_level: String,
}

fn setup_logging(log_file: &Path, level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let log_file_str = log_file
        .to_str()
        .ok_or_else(|| format!("Log file path {} is not valid UTF-8", log_file.display()))?;

    let logger_config = LogConfigBuilder::builder()
        .path(log_file_str)
        .time_format(LOG_TIME_FORMAT)
        .level(level)
        .map_err(|e| format!("Failed to configure logger: {}", e))?
        .output_file()
        .build();

    simple_log::new(logger_config)?;
    log::info!("Logging initialized, log file: {}", log_file.display());
    Ok(())
}

/// Runs the whole transform. In dry-run mode the JSON goes to `out` and status
/// lines go to stderr.
fn run(args: &Args, out: &mut impl Write) -> Result<SplitSummary, Box<dyn std::error::Error>> {
    log::info!("release-info-fixup v{} starting up", env!("CARGO_PKG_VERSION"));
    log::info!("Command line arguments: {:?}", args);

    let status = |tag: &str, message: &str| misc::print_status(tag, message, args.dry_run);

    let cfg = config::load(args.config.as_deref())?;
    let rule = cfg.asset_rule();

    status("info", BANNER_LOAD);
    let mut info = release_info::load(&args.path)?;

    status("info", BANNER_HTML);
    info.convert_body()?;

    status("info", BANNER_SPLIT);
    let summary = info.split_assets(&rule)?;
    status(
        "moved",
        &format!(
            "{} of {} assets to {}",
            summary.moved, summary.total, FIELD_ASSETS_NEW
        ),
    );

    if args.dry_run {
        log::info!("Dry run, not writing {}", args.path.display());
        writeln!(out, "{}", info.to_json()?)?;
        return Ok(summary);
    }

    status("info", BANNER_WRITE);
    release_info::save(&args.path, &info)?;

    Ok(summary)
}

fn main() {
    let args = Args::parse();

    if let Some(log_file) = &args.log_file {
        if let Err(e) = setup_logging(log_file, &args.log_level) {
            println_error!("{}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = run(&args, &mut io::stdout().lock()) {
        println_error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;

    const RELEASE: &str = r#"{"tag_name":"v4.2.0","body":"- a\n- b","assets":[{"name":"app-x86_64.AppImage"},{"name":"app-aarch64.AppImage"},{"name":"app-armv7l.AppImage"},{"name":"app.zip"}]}"#;

    fn args(path: &Path, extra: &[&str]) -> Args {
        let mut argv = vec![
            OsString::from("release-info-fixup"),
            path.as_os_str().to_owned(),
        ];
        argv.extend(extra.iter().map(OsString::from));
        Args::parse_from(argv)
    }

    fn asset_names(value: &serde_json::Value, key: &str) -> Vec<String> {
        value[key]
            .as_array()
            .unwrap()
            .iter()
            .map(|asset| asset["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_run_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release_info.json");
        fs::write(&path, RELEASE).unwrap();

        let mut out = Vec::new();
        let summary = run(&args(&path, &[]), &mut out).unwrap();

        assert_eq!(summary, SplitSummary { moved: 2, total: 4 });
        assert!(out.is_empty());

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["body"], "'<ul><li>a</li>\n<li>b</li></ul>'");
        assert_eq!(value["bodyMarkdown"], "- a\n- b");
        assert_eq!(
            asset_names(&value, "assets"),
            vec!["app-x86_64.AppImage", "app.zip"]
        );
        assert_eq!(
            asset_names(&value, "assetsNew"),
            vec!["app-aarch64.AppImage", "app-armv7l.AppImage"]
        );
    }

    #[test]
    fn test_dry_run_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release_info.json");
        fs::write(&path, RELEASE).unwrap();

        let mut out = Vec::new();
        let summary = run(&args(&path, &["--dry-run"]), &mut out).unwrap();

        assert_eq!(summary, SplitSummary { moved: 2, total: 4 });
        assert_eq!(fs::read_to_string(&path).unwrap(), RELEASE);

        // nothing but the JSON document
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            asset_names(&value, "assetsNew"),
            vec!["app-aarch64.AppImage", "app-armv7l.AppImage"]
        );
    }

    #[test]
    fn test_config_changes_split() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release_info.json");
        let config_path = dir.path().join("config.json");
        fs::write(&path, RELEASE).unwrap();
        fs::write(&config_path, r#"{"legacy_architectures": ["x86_64"]}"#).unwrap();

        let config_arg = config_path.to_str().unwrap();
        let mut out = Vec::new();
        let summary = run(&args(&path, &["--config", config_arg]), &mut out).unwrap();

        assert_eq!(summary, SplitSummary { moved: 1, total: 4 });
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            asset_names(&value, "assetsNew"),
            vec!["app-x86_64.AppImage"]
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let mut out = Vec::new();
        assert!(run(&args(&path, &[]), &mut out).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_bad_config_is_error_and_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release_info.json");
        let config_path = dir.path().join("config.json");
        fs::write(&path, RELEASE).unwrap();
        fs::write(&config_path, "not json").unwrap();

        let config_arg = config_path.to_str().unwrap();
        let mut out = Vec::new();
        assert!(run(&args(&path, &["--config", config_arg]), &mut out).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), RELEASE);
    }

    #[test]
    fn test_invalid_asset_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release_info.json");
        let broken = r#"{"body":"x","assets":[{"size":1}]}"#;
        fs::write(&path, broken).unwrap();

        let mut out = Vec::new();
        assert!(run(&args(&path, &[]), &mut out).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
    }
}
