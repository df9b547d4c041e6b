use clap::Parser;
use crossterm::style::Stylize;
use iambic_core::{preprocess, Config, ConfigError, IambicValidator, ValidationResult};
use iambic_core::core::phonetics::render_pattern;
use std::io::{self, stdin, stdout, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Checks lines of verse for iambic pentameter.
///
/// Reads TEXT, or stdin one line at a time when TEXT is absent.
#[derive(Parser)]
#[command(name = "iambic", version)]
struct Args {
    /// JSON config file; environment variables and flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pronunciation dictionary in CMU format [env: IAMBIC_DICTIONARY]
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Compiled dictionary snapshot to read or refresh [env: IAMBIC_CACHE]
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Maximum search nodes per line [env: IAMBIC_SEARCH_BUDGET]
    #[arg(long)]
    search_budget: Option<usize>,

    /// Print one JSON result per line
    #[arg(long)]
    json: bool,

    /// Show the pronunciations considered for every word
    #[arg(long)]
    explain: bool,

    /// Treat the whole input as one stanza and report a single verdict
    #[arg(long)]
    stanza: bool,

    /// Text to check instead of stdin
    text: Option<String>,
}

impl Args {
    fn config(&self) -> Result<Config, ConfigError> {
        let base = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        let mut config = base.with_env();
        if let Some(path) = &self.dictionary {
            config = config.with_dictionary_path(path.clone());
        }
        if let Some(path) = &self.cache {
            config = config.with_cache_path(path.clone());
        }
        if let Some(budget) = self.search_budget {
            config = config.with_search_budget(budget);
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "could not read configuration");
            return ExitCode::from(2);
        }
    };

    let validator = match IambicValidator::from_config(&config) {
        Ok(validator) => validator,
        Err(e) => {
            tracing::error!(error = %e, "could not load pronunciation dictionary");
            return ExitCode::from(2);
        }
    };

    match run(&args, &validator) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, "i/o failure");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args, validator: &IambicValidator) -> io::Result<bool> {
    let mut out = stdout().lock();

    if args.stanza {
        let text = match &args.text {
            Some(text) => text.clone(),
            None => {
                let mut buf = String::new();
                stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        return report_stanza(args, validator, &text, &mut out);
    }

    let mut all_ok = true;
    match &args.text {
        Some(text) => {
            for line in text.lines() {
                all_ok &= report_line(args, validator, line, &mut out)?;
            }
        }
        None => {
            for line in stdin().lock().lines() {
                all_ok &= report_line(args, validator, &line?, &mut out)?;
            }
        }
    }
    Ok(all_ok)
}

fn report_stanza(args: &Args, validator: &IambicValidator, text: &str, out: &mut impl Write) -> io::Result<bool> {
    let results = validator.validate_lines(text);
    let ok = results.iter().all(|r| r.ok);

    if args.json {
        let json = serde_json::json!({ "ok": ok, "lines": results });
        writeln!(out, "{}", json)?;
    } else {
        // `validate_lines` yields one result per trimmed line, in order.
        for (line, result) in text.trim().lines().zip(&results) {
            print_result(line, result, out)?;
            if args.explain {
                explain(validator, line, out)?;
            }
        }
        let verdict = if ok { "stanza scans".green() } else { "stanza does not scan".red() };
        writeln!(out, "{}", verdict.bold())?;
    }
    Ok(ok)
}

fn report_line(args: &Args, validator: &IambicValidator, line: &str, out: &mut impl Write) -> io::Result<bool> {
    let result = validator.validate_line(line);

    if args.json {
        let json = serde_json::to_string(&result).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writeln!(out, "{}", json)?;
    } else {
        print_result(line, &result, out)?;
    }
    if args.explain {
        explain(validator, line, out)?;
    }
    Ok(result.ok)
}

fn print_result(line: &str, result: &ValidationResult, out: &mut impl Write) -> io::Result<()> {
    if result.ok {
        return writeln!(out, "{} {}", "PASS".green(), line.trim());
    }

    writeln!(out, "{} {}", "FAIL".red(), line.trim())?;
    let words = preprocess(line);
    match words.get(result.at) {
        Some(word) => writeln!(out, "     {} (word {}: {})", result.reason, result.at + 1, word),
        None => writeln!(out, "     {} (end of line)", result.reason),
    }
}

fn explain(validator: &IambicValidator, line: &str, out: &mut impl Write) -> io::Result<()> {
    let dictionary = validator.dictionary();
    for word in preprocess(line) {
        let Some(variants) = dictionary.get(&word) else {
            writeln!(out, "     {:<16} {}", word, "unknown".dark_grey())?;
            continue;
        };
        let merged = dictionary.merged_pattern(&word).unwrap_or_default();
        writeln!(out, "     {:<16} merged {}", word, render_pattern(&merged))?;
        for variant in variants {
            writeln!(
                out,
                "       {:<6} {}",
                render_pattern(variant.accent_pattern()),
                variant.phonemes().join(" ")
            )?;
        }
    }
    Ok(())
}
