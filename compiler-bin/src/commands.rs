use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use instrumenting::RewriteOptions;
use smol_str::SmolStr;
use tags::LoopSite;
use watchdog::{WatchdogConfig, WatchdogOverrides};

use crate::cli::{Command, Config};

pub fn run(config: &Config) -> anyhow::Result<()> {
    match &config.command {
        Command::Rewrite { file, prefix, helper, output } => {
            let options = rewrite_options(file, prefix.as_deref(), helper)?;
            let source = read(file)?;
            let rewritten = instrumenting::rewrite(&source, &options);
            if !rewritten.modified {
                tracing::warn!(file = %file.display(), "No loops were guarded");
            }
            emit(output.as_deref(), &rewritten.code)
        }
        Command::Strip { file, helper, output } => {
            anyhow::ensure!(instrumenting::is_valid_helper(helper), "Invalid helper name: {helper}");
            let options = RewriteOptions { helper_name: SmolStr::new(helper), tag_prefix: None };
            let source = read(file)?;
            let stripped = instrumenting::strip(&source, &options);
            if !stripped.modified {
                tracing::warn!(file = %file.display(), "No guards were removed");
            }
            emit(output.as_deref(), &stripped.code)
        }
        Command::Sites { file, prefix } => {
            let options = rewrite_options(file, prefix.as_deref(), instrumenting::DEFAULT_HELPER)?;
            let source = read(file)?;
            let sites = instrumenting::loop_sites(&source, &options);
            emit(None, &format_sites(&sites))
        }
        Command::Config { json } => {
            let resolved = WatchdogConfig::from_json(json).context("Malformed configuration")?;
            emit(None, &format_config(resolved)?)
        }
    }
}

/// Tags are prefixed with the file name unless a prefix is given.
pub fn rewrite_options(
    file: &Path,
    prefix: Option<&str>,
    helper: &str,
) -> anyhow::Result<RewriteOptions> {
    anyhow::ensure!(instrumenting::is_valid_helper(helper), "Invalid helper name: {helper}");

    let tag_prefix = match prefix {
        Some(prefix) => Some(SmolStr::new(prefix)),
        None => file.file_name().map(|name| SmolStr::new(name.to_string_lossy())),
    };

    Ok(RewriteOptions { helper_name: SmolStr::new(helper), tag_prefix })
}

pub fn format_sites(sites: &[LoopSite]) -> String {
    let mut buffer = String::new();
    for site in sites {
        let LoopSite { kind, line, column, .. } = site;
        let tag = site.tag();
        buffer.push_str(&format!("{line}:{column}\t{}\t{tag}\n", kind.label()));
    }
    buffer
}

pub fn format_config(config: WatchdogConfig) -> anyhow::Result<String> {
    let overrides = WatchdogOverrides::from(config);
    let mut text = serde_json::to_string_pretty(&overrides)?;
    text.push('\n');
    Ok(text)
}

fn read(file: &Path) -> anyhow::Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn emit(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(output) => fs::write(output, text)
            .with_context(|| format!("Failed to write {}", output.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
