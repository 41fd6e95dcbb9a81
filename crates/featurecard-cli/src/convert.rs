use anyhow::{Context, Result};
use clap::Args;
use featurecard_config::AppConfig;
use featurecard_core::{convert_all, normalize_region, ConversionReport, ConvertOptions};
use featurecard_phone::Libphonenumber;
use featurecard_vcf::{parse_contacts, serialize_contacts, Dialect};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::invalid_input;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Region used for numbers written without a country code
    #[arg(
        long = "country-code",
        short = 'c',
        visible_alias = "default-region",
        value_name = "REGION"
    )]
    pub country_code: Option<String>,
    /// Name suffix for contacts with a mobile number
    #[arg(long = "suffix-mobile", short = 'm', value_name = "SUFFIX")]
    pub suffix_mobile: Option<String>,
    /// Name suffix for contacts with a landline number
    #[arg(long = "suffix-fixed-line", short = 'f', value_name = "SUFFIX")]
    pub suffix_fixed_line: Option<String>,
    /// Name suffix for contacts with a universal access number
    #[arg(long = "suffix-uan", short = 'u', value_name = "SUFFIX")]
    pub suffix_uan: Option<String>,
    /// Leave out data vCard 2.1 cannot carry instead of failing
    #[arg(long)]
    pub drop_unsupported: bool,
    /// vCard file to convert
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    pub input: Option<PathBuf>,
    /// File to write [default: backup.dat]
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporting {
    Progress,
    Quiet,
    Json,
}

struct Progress {
    enabled: bool,
}

impl Progress {
    fn say(&self, message: impl std::fmt::Display) {
        if self.enabled {
            println!("{message}");
        }
    }
}

pub fn convert(args: ConvertArgs, config_path: Option<PathBuf>, reporting: Reporting) -> Result<()> {
    let config = featurecard_config::load(config_path)?;
    let options = resolve_options(&args, &config)?;
    let phones = Libphonenumber;
    phones.check_region(&options.region)?;
    debug!(region = %options.region, "conversion options resolved");

    let input = args
        .input
        .clone()
        .ok_or_else(|| invalid_input("no input file given"))?;
    if !input.is_file() {
        return Err(invalid_input(format!(
            "input file doesn't exist: {}",
            input.display()
        )));
    }
    let output = args.output.clone().unwrap_or(config.output.clone());
    let dialect = if args.drop_unsupported || config.drop_unsupported {
        Dialect::dropping_unsupported()
    } else {
        Dialect::strict()
    };

    let progress = Progress {
        enabled: reporting == Reporting::Progress,
    };
    progress.say(format_args!(
        "Convert file '{}' to '{}'",
        input.display(),
        output.display()
    ));

    progress.say(format_args!("Read from '{}'", input.display()));
    let data =
        fs::read(&input).with_context(|| format!("failed to read {}", input.display()))?;
    let parsed = parse_contacts(&data)?;
    for warning in &parsed.warnings {
        warn!(file = %input.display(), "{warning}");
    }
    progress.say(format_args!(
        "Number of contacts read: {}",
        parsed.contacts.len()
    ));

    let conversion = convert_all(&parsed.contacts, &options, &phones, |converted| {
        progress.say(format_args!("Processing: '{}'", converted.name));
        if converted.was_split() {
            progress.say(format_args!(
                "Multiple telephone numbers detected for '{}': Split contact to {} items",
                converted.name,
                converted.records.len()
            ));
        }
        for issue in &converted.issues {
            warn!(contact = %issue.contact, phone = %issue.phone, "{}", issue.problem);
        }
    });

    progress.say(format_args!("Write to '{}'", output.display()));
    progress.say(format_args!(
        "Number of contacts to write: {}",
        conversion.records.len()
    ));
    let rendered = serialize_contacts(&conversion.records, &dialect)?;
    for item in &rendered.dropped {
        warn!("{item}");
    }
    write_output(&output, &rendered.data)?;

    let report = ConversionReport {
        input: input.display().to_string(),
        output: output.display().to_string(),
        read: conversion.read,
        written: conversion.records.len(),
        split: conversion.split,
        issues: conversion.issues,
        dropped: rendered.dropped,
        parse_warnings: parsed.warnings,
    };
    if reporting == Reporting::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn resolve_options(args: &ConvertArgs, config: &AppConfig) -> Result<ConvertOptions> {
    let mut options = config.options.clone();
    if let Some(region) = args.country_code.as_deref() {
        options.region = normalize_region(region)
            .map_err(|err| invalid_input(format!("--country-code: {err}")))?;
    }
    if let Some(suffix) = &args.suffix_mobile {
        options.suffixes.mobile = suffix.clone();
    }
    if let Some(suffix) = &args.suffix_fixed_line {
        options.suffixes.fixed_line = suffix.clone();
    }
    if let Some(suffix) = &args.suffix_uan {
        options.suffixes.uan = suffix.clone();
    }
    Ok(options)
}

fn write_output(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{resolve_options, ConvertArgs};
    use featurecard_config::AppConfig;

    fn args() -> ConvertArgs {
        ConvertArgs {
            country_code: None,
            suffix_mobile: None,
            suffix_fixed_line: None,
            suffix_uan: None,
            drop_unsupported: false,
            input: None,
            output: None,
        }
    }

    #[test]
    fn flags_override_config_values() {
        let mut args = args();
        args.country_code = Some("de".to_string());
        args.suffix_mobile = Some("(Mobile)".to_string());
        let options = resolve_options(&args, &AppConfig::default()).expect("options");
        assert_eq!(options.region, "DE");
        assert_eq!(options.suffixes.mobile, "(Mobile)");
        assert_eq!(options.suffixes.fixed_line, "(Home)");
        assert_eq!(options.suffixes.uan, "(Work)");
    }

    #[test]
    fn empty_suffix_flag_clears_the_default() {
        let mut args = args();
        args.suffix_fixed_line = Some(String::new());
        let options = resolve_options(&args, &AppConfig::default()).expect("options");
        assert_eq!(options.suffixes.fixed_line, "");
    }

    #[test]
    fn malformed_region_is_rejected() {
        let mut args = args();
        args.country_code = Some("Austria".to_string());
        assert!(resolve_options(&args, &AppConfig::default()).is_err());
    }
}
