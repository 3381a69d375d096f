//! rasterfx CLI - apply one filter to an image.

use anyhow::{bail, Context, Result};
use log::debug;
use rasterfx::prelude::*;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    let outcome = match args[1].as_str() {
        "list" => {
            list_filters();
            Ok(())
        }
        "info" => match args.get(2) {
            Some(id) => filter_info(id),
            None => Err(anyhow::anyhow!("please specify a filter ID")),
        },
        "process" => {
            if args.len() < 4 {
                eprintln!("Error: Please specify input and output paths");
                print_usage(&args[0]);
                return;
            }
            process_image(&args[2..])
        }
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
            return;
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        if let Some(fix) = suggested_fix(&e) {
            eprintln!("Hint: {}", fix);
        }
        std::process::exit(1);
    }
}

/// The fix suggested by the first [`FilterError`] in the error chain.
fn suggested_fix(error: &anyhow::Error) -> Option<String> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<FilterError>())
        .and_then(|e| e.suggested_fix())
}

fn print_usage(program: &str) {
    println!("rasterfx v{}", rasterfx::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                          List all available filters");
    println!("  info <filter>                 Show detailed info about a filter");
    println!("  process <in> <out> [options]  Process an image");
    println!("  help                          Show this help message");
    println!();
    println!("Process options:");
    println!("  --filter <id>        Filter to apply (see 'list')");
    println!("  --set <key>=<value>  Filter parameter, e.g. --set sigma=1.5");
    println!("  --config <file>      Read the filter from a JSON job file");
    println!("  --parallel           Compute columns on all cores");
    println!();
    println!("Output format follows the extension: {}", SUPPORTED_EXTENSIONS.join(", "));
}

fn list_filters() {
    let registry = FilterRegistry::with_builtins();
    let grouped = registry.grouped_by_category();

    println!("Available filters ({} total):", registry.len());
    println!();

    for (category, filters) in grouped {
        println!("  {}", category.display_name());
        for metadata in filters {
            println!("      {:<14} {}", metadata.id, metadata.description);
        }
        println!();
    }
}

fn filter_info(filter_id: &str) -> Result<()> {
    let registry = FilterRegistry::with_builtins();
    let metadata = registry
        .get_metadata(filter_id)
        .with_context(|| format!("filter not found: {} (use 'list' to see available filters)", filter_id))?;

    println!("Filter: {}", metadata.name);
    println!("ID: {}", metadata.id);
    println!("Category: {}", metadata.category.display_name());
    println!("Deterministic: {}", if metadata.deterministic { "yes" } else { "no" });
    println!();
    println!("Description:");
    println!("  {}", metadata.description);
    Ok(())
}

/// Parsed `process` options.
struct ProcessArgs {
    filter: Option<String>,
    params: Map<String, Value>,
    config: Option<String>,
    parallel: bool,
}

fn parse_process_args(args: &[String]) -> Result<ProcessArgs> {
    let mut parsed = ProcessArgs {
        filter: None,
        params: Map::new(),
        config: None,
        parallel: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--filter" if i + 1 < args.len() => {
                parsed.filter = Some(args[i + 1].clone());
                i += 2;
            }
            "--set" if i + 1 < args.len() => {
                let (key, value) = parse_param(&args[i + 1])?;
                parsed.params.insert(key, value);
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                parsed.config = Some(args[i + 1].clone());
                i += 2;
            }
            "--parallel" => {
                parsed.parallel = true;
                i += 1;
            }
            other => bail!("unknown option: {}", other),
        }
    }

    Ok(parsed)
}

/// `key=value`, where the value is read as JSON when possible and as a string otherwise.
fn parse_param(arg: &str) -> Result<(String, Value)> {
    let (key, raw) = arg
        .split_once('=')
        .with_context(|| format!("expected key=value, got '{}'", arg))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn resolve_filter(args: &ProcessArgs) -> Result<(Box<dyn Filter>, ScanOptions)> {
    let mut scan = ScanOptions::default();

    let filter = match (&args.config, &args.filter) {
        (Some(path), _) => {
            let job = JobConfig::from_json_file(path)
                .with_context(|| format!("failed to read config {}", path))?;
            scan = job.scan;
            job.filter.build()?
        }
        (None, Some(id)) if args.params.is_empty() => FilterRegistry::with_builtins().create(id)?,
        (None, Some(id)) => {
            let mut object = args.params.clone();
            object.insert("filter".to_string(), Value::String(id.clone()));
            let config: FilterConfig = serde_json::from_value(Value::Object(object))
                .with_context(|| format!("invalid parameters for '{}'", id))?;
            config.build()?
        }
        (None, None) => bail!("either --filter or --config is required"),
    };

    if args.parallel {
        scan = scan.with_parallel(true);
    }
    Ok((filter, scan))
}

fn output_extension(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .with_context(|| format!("output path {} has no extension", path.display()))?;
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        bail!("unsupported output format '{}'", ext);
    }
    Ok(ext)
}

fn process_image(args: &[String]) -> Result<()> {
    let input_path = Path::new(&args[0]);
    let output_path = Path::new(&args[1]);
    let options = parse_process_args(&args[2..])?;
    output_extension(output_path)?;

    let (filter, scan) = resolve_filter(&options)?;
    let metadata = filter.metadata();
    debug!("resolved filter {:?} with {:?}", metadata.id, scan);

    let source = image::open(input_path)
        .with_context(|| format!("failed to open {}", input_path.display()))?
        .to_rgb8();

    println!(
        "Applying {} to {} ({}x{})",
        metadata.name,
        input_path.display(),
        source.width(),
        source.height()
    );

    let tracker = ProgressTracker::new().with_callback(Box::new(|update| match update {
        ProgressUpdate::Progress { percent } if percent % 10 == 0 => {
            print!("\r   {:>3}%", percent);
            let _ = std::io::stdout().flush();
        }
        ProgressUpdate::Completed { elapsed_ms } => {
            println!("\r   100% ({}ms)", elapsed_ms);
        }
        _ => {}
    }));

    let result = filter
        .process_image_with(&source, &tracker, &scan)
        .with_context(|| format!("{} failed", metadata.id))?;

    result
        .save(output_path)
        .with_context(|| format!("failed to save {}", output_path.display()))?;
    println!("Image saved to: {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_param_values() {
        assert_eq!(parse_param("sigma=1.5").unwrap(), ("sigma".to_string(), Value::from(1.5)));
        assert_eq!(
            parse_param("phase=column").unwrap(),
            ("phase".to_string(), Value::String("column".to_string()))
        );
        assert!(parse_param("sigma").is_err());
    }

    #[test]
    fn test_resolve_registry_filter() {
        let parsed = parse_process_args(&args(&["--filter", "wave_columns"])).unwrap();
        let (filter, scan) = resolve_filter(&parsed).unwrap();
        assert_eq!(filter.metadata().id, "wave_columns");
        assert!(!scan.parallel);
    }

    #[test]
    fn test_resolve_filter_with_params() {
        let parsed = parse_process_args(&args(&[
            "--filter",
            "gaussian_blur",
            "--set",
            "sigma=1.5",
            "--parallel",
        ]))
        .unwrap();
        let (filter, scan) = resolve_filter(&parsed).unwrap();
        assert_eq!(filter.metadata().id, "gaussian_blur");
        assert!(scan.parallel);

        let parsed =
            parse_process_args(&args(&["--filter", "gaussian_blur", "--set", "sigma=0"])).unwrap();
        assert!(resolve_filter(&parsed).is_err());
    }

    #[test]
    fn test_suggested_fix_found_through_context() {
        let parsed = parse_process_args(&args(&["--filter", "emboss"])).unwrap();
        let err = resolve_filter(&parsed)
            .map(|_| ())
            .context("resolving filter")
            .unwrap_err();
        assert_eq!(suggested_fix(&err).unwrap(), "Use 'list' to see available filters");

        assert!(suggested_fix(&anyhow::anyhow!("plain failure")).is_none());
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(parse_process_args(&args(&["--blur", "2"])).is_err());
    }

    #[test]
    fn test_output_extension() {
        assert_eq!(output_extension(Path::new("out.PNG")).unwrap(), "png");
        assert!(output_extension(Path::new("out.tiff")).is_err());
        assert!(output_extension(Path::new("out")).is_err());
    }

    #[test]
    fn test_process_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.bmp");
        Image::from_pixel(4, 3, image::Rgb([10, 20, 30])).save(&input).unwrap();

        process_image(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--filter",
            "invert",
        ]))
        .unwrap();

        let result = image::open(&output).unwrap().to_rgb8();
        assert_eq!(result.dimensions(), (4, 3));
        assert_eq!(*result.get_pixel(0, 0), image::Rgb([245, 235, 225]));
    }

    #[test]
    fn test_process_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        let config = dir.path().join("job.json");
        Image::from_pixel(3, 3, image::Rgb([100, 100, 100])).save(&input).unwrap();
        std::fs::write(&config, r#"{ "filter": "brightness", "factor": -40 }"#).unwrap();

        process_image(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]))
        .unwrap();

        let result = image::open(&output).unwrap().to_rgb8();
        assert!(result.pixels().all(|p| *p == image::Rgb([60, 60, 60])));
    }
}
