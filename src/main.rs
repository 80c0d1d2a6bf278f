use anyhow::{Context, Result};
use clap::Parser;
use php_class_finder::cli::{Cli, Commands, FindArgs, OutputFormat, StrategyKind};
use php_class_finder::config::resolve_scan_options;
use php_class_finder::logging::init_logging;
use php_class_finder::scan::ScanOptions;
use php_class_finder::strategy::{ClassmapLoadingStrategy, LoadingStrategy, Psr4LoadingStrategy};
use php_class_finder::structure::parse_source;
use php_class_finder::{DescriptorCollection, Finder};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let options = resolve_scan_options(&cli);

    match cli.command.clone() {
        Commands::Find(args) => {
            let finder = build_finder(&args, &options);
            let result = find_classes(&finder, &args.directory);
            write_find_output(&result, args.format, args.output.as_deref())?;
        }
        Commands::Inspect { file } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read source file: {}", file.display()))?;
            let unit = parse_source(&source)
                .with_context(|| format!("Failed to parse PHP source: {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&unit)?);
        }
    }

    Ok(())
}

fn build_strategies(args: &FindArgs, options: &ScanOptions) -> Vec<Arc<dyn LoadingStrategy>> {
    let kinds = if args.strategy.is_empty() {
        vec![StrategyKind::Psr4]
    } else {
        args.strategy.clone()
    };

    kinds
        .into_iter()
        .map(|kind| -> Arc<dyn LoadingStrategy> {
            match kind {
                StrategyKind::Psr4 => {
                    let strategy = args.search_root.iter().fold(
                        Psr4LoadingStrategy::new(options.clone()),
                        |s, root| s.with_search_root(root),
                    );
                    Arc::new(strategy)
                }
                StrategyKind::Classmap => {
                    let strategy = args.search_root.iter().fold(
                        ClassmapLoadingStrategy::new(options.clone()),
                        |s, root| s.with_search_root(root),
                    );
                    Arc::new(strategy)
                }
            }
        })
        .collect()
}

fn build_finder(args: &FindArgs, options: &ScanOptions) -> Finder {
    let mut finder = Finder::with_strategies(build_strategies(args, options));

    if let Some(namespace) = &args.namespace {
        finder = finder.namespace(namespace.as_str());
    }
    if let Some(class) = &args.class {
        finder = finder.class(class.as_str());
    }
    if let Some(parent) = &args.extends {
        finder = finder.extends(parent.as_str());
    }
    for name in &args.implements {
        finder = finder.implements(name.as_str());
    }
    for name in &args.uses {
        finder = finder.uses(name.as_str());
    }
    for name in &args.has_constant {
        finder = finder.has_constant(name.as_str());
    }
    for name in &args.has_property {
        finder = finder.has_property(name.as_str());
    }
    for name in &args.has_method {
        finder = finder.has_method(name.as_str());
    }

    finder
}

#[derive(Debug, Serialize)]
struct FindResult {
    directory: String,
    matched: usize,
    duration_ms: u64,
    classes: DescriptorCollection,
}

fn find_classes(finder: &Finder, directory: &Path) -> FindResult {
    let start = Instant::now();
    let classes = finder.in_dir(directory);

    FindResult {
        directory: directory.to_string_lossy().to_string(),
        matched: classes.len(),
        duration_ms: start.elapsed().as_millis() as u64,
        classes,
    }
}

fn write_find_output(result: &FindResult, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("directory: {}\n", result.directory));
            out.push_str(&format!("matched: {}\n", result.matched));
            out.push_str(&format!("duration_ms: {}\n", result.duration_ms));
            for class in &result.classes {
                out.push_str(&format!(
                    "- {} ({})\n",
                    class.name(),
                    class.source_file().display()
                ));
                if let Some(parent) = class.parent_name() {
                    out.push_str(&format!("    extends: {parent}\n"));
                }
                if !class.interface_names().is_empty() {
                    let names: Vec<_> = class.interface_names().iter().map(String::as_str).collect();
                    out.push_str(&format!("    implements: {}\n", names.join(", ")));
                }
                if !class.trait_names().is_empty() {
                    let names: Vec<_> = class.trait_names().iter().map(String::as_str).collect();
                    out.push_str(&format!("    uses: {}\n", names.join(", ")));
                }
            }
            out
        }
        OutputFormat::Names => {
            let mut out = String::new();
            for name in result.classes.names() {
                out.push_str(name);
                out.push('\n');
            }
            out
        }
    };

    if let Some(path) = output {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write output: {}", path.display()))?;
    } else {
        print!("{content}");
        if !content.is_empty() && !content.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
