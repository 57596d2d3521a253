use clap::{Arg, ArgAction, Command};
use formstamp::config::{self, LayoutSource};
use formstamp::template::{self, TemplateSource};
use formstamp::{render, validation, FormKind, LogDiagnostics, RenderOptions};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug)]
enum AppError {
    FileReadError(std::io::Error),
    RecordError(String),
    FillError(String),
    PathError(String),
}

/// Verbosity level for output
#[derive(Debug, Clone, Copy, PartialEq)]
enum Verbosity {
    Quiet,   // No output except errors
    Normal,  // Standard output
    Verbose, // Detailed output
}

fn get_form_kind(matches: &clap::ArgMatches) -> Result<FormKind, AppError> {
    let name = matches
        .get_one::<String>("form")
        .map(|s| s.as_str())
        .unwrap_or("leave");
    FormKind::parse(name)
        .ok_or_else(|| AppError::RecordError(format!("unknown form '{}'", name)))
}

fn get_record(matches: &clap::ArgMatches) -> Result<Value, AppError> {
    let text = if let Some(file_path) = matches.get_one::<String>("record") {
        fs::read_to_string(file_path).map_err(AppError::FileReadError)?
    } else if let Some(json) = matches.get_one::<String>("json") {
        json.to_string()
    } else {
        return Err(AppError::RecordError("No record provided".to_string()));
    };
    serde_json::from_str(&text).map_err(|e| AppError::RecordError(format!("invalid JSON: {}", e)))
}

/// Template candidates in the order they were given: files first, then URLs.
fn get_template_sources(matches: &clap::ArgMatches) -> Vec<TemplateSource> {
    #[cfg_attr(not(feature = "fetch"), allow(unused_mut))]
    let mut sources: Vec<TemplateSource> = matches
        .get_many::<String>("template")
        .map(|values| values.map(|p| TemplateSource::File(PathBuf::from(p))).collect())
        .unwrap_or_default();

    #[cfg(feature = "fetch")]
    if let Some(urls) = matches.get_many::<String>("template-url") {
        sources.extend(urls.map(|u| TemplateSource::Url(u.to_string())));
    }

    sources
}

/// Get the layout source based on CLI arguments or default behavior.
///
/// Priority order:
/// 1. If `--layout` is explicitly provided, use that file
/// 2. If `formstamprc.toml` exists in the current directory or the user config directory, use it
/// 3. Otherwise use the built-in layout
fn get_layout_source(matches: &clap::ArgMatches) -> LayoutSource<'static> {
    if let Some(layout_file) = matches.get_one::<String>("layout") {
        return LayoutSource::File(Box::leak(layout_file.to_string().into_boxed_str()));
    }

    if let Some(found) = config::find_layout_file() {
        debug!("using layout overrides from {}", found.display());
        return LayoutSource::File(Box::leak(
            found.to_string_lossy().into_owned().into_boxed_str(),
        ));
    }

    LayoutSource::Default
}

fn get_output_path(matches: &clap::ArgMatches, kind: FormKind) -> Result<PathBuf, AppError> {
    let current_dir = std::env::current_dir().map_err(|e| AppError::PathError(e.to_string()))?;

    Ok(matches
        .get_one::<String>("output")
        .map(|p| current_dir.join(p))
        .unwrap_or_else(|| current_dir.join(format!("{}-form.pdf", kind))))
}

fn get_render_options(matches: &clap::ArgMatches) -> RenderOptions {
    let is_yearly = matches.get_flag("yearly");
    let generation_date = matches
        .get_one::<String>("generation-date")
        .map(|s| s.to_string())
        .or_else(|| {
            is_yearly.then(|| chrono::Local::now().format("%Y-%m-%d").to_string())
        });

    RenderOptions {
        is_yearly,
        generation_date,
        admin_username: matches
            .get_one::<String>("admin")
            .map(|s| s.to_string())
            .unwrap_or_default(),
        include_footer: matches.get_flag("include-footer"),
    }
}

fn load_template(matches: &clap::ArgMatches) -> Result<Vec<u8>, AppError> {
    template::load_first_available(&get_template_sources(matches))
        .map_err(|e| AppError::FillError(e.to_string()))
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(AppError::PathError(format!(
                "output directory {} does not exist",
                parent.display()
            )));
        }
    }
    fs::write(path, bytes)
        .map_err(|e| AppError::PathError(format!("cannot write {}: {}", path.display(), e)))
}

fn report_saved(verbosity: Verbosity, path: &Path) {
    if verbosity == Verbosity::Quiet {
        return;
    }
    println!("✅ Successfully saved PDF to {}", path.display());

    if verbosity == Verbosity::Verbose {
        if let Ok(metadata) = fs::metadata(path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.2} MB", size_kb / 1024.0);
            }
        }
    }
}

fn run(matches: clap::ArgMatches) -> Result<(), AppError> {
    let verbosity = if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let kind = get_form_kind(&matches)?;
    let layout = config::load_layout_from_source(kind, get_layout_source(&matches))
        .map_err(|e| AppError::FillError(e.to_string()))?;
    let output_path = get_output_path(&matches, kind)?;

    if matches.get_flag("calibrate") {
        let template = load_template(&matches)?;
        let sheet = render::calibration_sheet(&template, &layout)
            .map_err(|e| AppError::FillError(e.to_string()))?;
        write_output(&output_path, &sheet)?;
        report_saved(verbosity, &output_path);
        return Ok(());
    }

    let record = get_record(&matches)?;
    let warnings = validation::validate_record(kind, &record, &layout)
        .map_err(|e| AppError::RecordError(e.to_string()))?;

    if matches.get_flag("dry-run") {
        if verbosity == Verbosity::Quiet {
            return if warnings.is_empty() {
                Ok(())
            } else {
                Err(AppError::RecordError(format!(
                    "{} validation warnings",
                    warnings.len()
                )))
            };
        }
        for warning in &warnings {
            warn!("{}", warning);
        }
        println!("✓ Dry-run validation complete. No PDF generated.");
        if warnings.is_empty() {
            println!("✓ No issues detected. Run without --dry-run to fill the form.");
        } else {
            for warning in &warnings {
                println!("  • {}", warning);
            }
            println!(
                "⚠️  {} warning(s) found. Review above and run without --dry-run to fill the form anyway.",
                warnings.len()
            );
        }
        return Ok(());
    }

    if verbosity == Verbosity::Verbose {
        if warnings.is_empty() {
            info!("✓ Pre-flight validation passed");
        } else {
            info!("🔍 Pre-flight validation:");
        }
    }
    if verbosity != Verbosity::Quiet {
        for warning in &warnings {
            warn!("{}", warning);
        }
    }

    let template = load_template(&matches)?;
    let options = get_render_options(&matches);
    if verbosity == Verbosity::Verbose {
        info!("📄 Filling {} form...", kind);
    }
    let bytes = formstamp::fill_with_layout(
        kind,
        &template,
        &record,
        &options,
        &layout,
        &LogDiagnostics,
    )
    .map_err(|e| AppError::FillError(e.to_string()))?;

    write_output(&output_path, &bytes)?;
    report_saved(verbosity, &output_path);
    Ok(())
}

fn build_cli() -> Command {
    let cmd = Command::new("formstamp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fill the station's leave and clearance PDF forms from JSON records")
        .after_help(
            "EXAMPLES:\n  \
            formstamp --form leave -t leave_form.pdf -r request.json -o leave.pdf\n  \
            formstamp --form clearance -t clearance.pdf --json '{\"lastName\":\"CRUZ\"}'\n  \
            formstamp --form leave -r request.json --dry-run --verbose\n  \
            formstamp --form clearance -t clearance.pdf --calibrate -o check.pdf\n",
        )
        .arg(
            Arg::new("form")
                .short('f')
                .long("form")
                .value_name("FORM")
                .value_parser(["leave", "clearance"])
                .default_value("leave")
                .help("Which form to fill"),
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("PDF_PATH")
                .help("Blank template PDF (can be specified multiple times, tried in order)")
                .action(ArgAction::Append),
        );

    #[cfg(feature = "fetch")]
    let cmd = cmd.arg(
        Arg::new("template-url")
            .long("template-url")
            .value_name("URL")
            .help("URL to fetch the template from, tried after --template (requires 'fetch' feature)")
            .action(ArgAction::Append),
    );

    cmd.arg(
        Arg::new("record")
            .short('r')
            .long("record")
            .value_name("JSON_FILE")
            .help("Path to the record as a JSON file")
            .conflicts_with("json"),
    )
    .arg(
        Arg::new("json")
            .short('j')
            .long("json")
            .value_name("JSON_STRING")
            .help("Record as a JSON string")
            .conflicts_with("record"),
    )
    .arg(
        Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_PATH")
            .help("Path to the output PDF file (defaults to ./<form>-form.pdf)"),
    )
    .arg(
        Arg::new("layout")
            .short('l')
            .long("layout")
            .value_name("LAYOUT_FILE")
            .help("Layout overrides (TOML format). Auto-detects formstamprc.toml if not specified"),
    )
    .arg(
        Arg::new("yearly")
            .long("yearly")
            .help("Yearly generation: the generation date becomes the filing date")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("generation-date")
            .long("generation-date")
            .value_name("DATE")
            .help("Generation date (ISO-8601); defaults to today with --yearly"),
    )
    .arg(
        Arg::new("admin")
            .long("admin")
            .value_name("USERNAME")
            .help("Administrator generating the form"),
    )
    .arg(
        Arg::new("include-footer")
            .long("include-footer")
            .help("Stamp a 'Generated by' footer (needs --admin)")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Show detailed output including validation results and file size")
            .action(ArgAction::SetTrue)
            .conflicts_with("quiet"),
    )
    .arg(
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .help("Suppress all output except errors")
            .action(ArgAction::SetTrue)
            .conflicts_with("verbose"),
    )
    .arg(
        Arg::new("dry-run")
            .long("dry-run")
            .help("Validate the record without filling the form")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("get-default-layout")
            .long("get-default-layout")
            .help("Print the built-in layout of the selected form to stdout and exit")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("calibrate")
            .long("calibrate")
            .help("Stamp the name of every layout point onto the template instead of a record")
            .action(ArgAction::SetTrue),
    )
}


fn main() {
    // Initialize logger with environment variable control (RUST_LOG)
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    let mut cmd = build_cli();
    let matches = cmd.clone().get_matches();

    // Print the built-in layout and exit if requested
    if matches.get_flag("get-default-layout") {
        match get_form_kind(&matches) {
            Ok(kind) => {
                println!("{}", config::default_layout_toml(kind));
                process::exit(0);
            }
            Err(AppError::RecordError(e)) => {
                error!("[X] {}", e);
                process::exit(1);
            }
            Err(_) => process::exit(1),
        }
    }

    let has_record = matches.contains_id("record") || matches.contains_id("json");
    if !has_record && !matches.get_flag("calibrate") {
        let _ = cmd.print_help();
        println!();
        process::exit(1);
    }

    if let Err(e) = run(matches) {
        match e {
            AppError::FileReadError(e) => error!("[X] Error reading file: {}", e),
            AppError::RecordError(e) => error!("[X] Record error: {}", e),
            AppError::FillError(e) => error!("[X] Fill error: {}", e),
            AppError::PathError(e) => error!("[X] Path error: {}", e),
        }
        process::exit(1);
    }
}
