use php_class_finder::strategy::ClassmapLoadingStrategy;
use php_class_finder::{Finder, Psr4LoadingStrategy};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "php_class_finder_it_{}_{}_{}",
        std::process::id(),
        nanos,
        name
    ))
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Seven loadable classes plus an interface, a trait, a broken file and a
/// non-PHP file.
fn project(name: &str) -> anyhow::Result<PathBuf> {
    let base = temp_dir(name);
    let files = [
        (
            "Contracts/Handler.php",
            r#"<?php
namespace App\Contracts;

interface Handler
{
    public function handle(): void;
}
"#,
        ),
        (
            "Concerns/Loggable.php",
            r#"<?php
namespace App\Concerns;

trait Loggable
{
    protected array $log = [];
    public function log(string $line): void {}
}
"#,
        ),
        (
            "Jobs/BaseJob.php",
            r#"<?php
namespace App\Jobs;

use App\Contracts\Handler;

abstract class BaseJob implements Handler
{
    public const QUEUE = 'default';
    protected int $tries = 3;
}
"#,
        ),
        (
            "Jobs/SendMail.php",
            r#"<?php
namespace App\Jobs;

use App\Concerns\Loggable;

final class SendMail extends BaseJob
{
    use Loggable;

    public function handle(): void {}
}
"#,
        ),
        (
            "Jobs/Prune.php",
            r#"<?php
namespace App\Jobs;

class Prune extends BaseJob
{
    public function handle(): void {}
}
"#,
        ),
        (
            "Http/Kernel.php",
            r#"<?php
namespace App\Http;

class Kernel
{
    protected $middleware = [];
}
"#,
        ),
        ("Foo.php", "<?php\n\nclass Foo {}\n"),
        (
            "Lib/FooBar.php",
            "<?php\nnamespace X\\Y;\n\nclass FooBar {}\n",
        ),
        ("Lib/Y/Foo.php", "<?php\nnamespace X\\Y;\n\nclass Foo {}\n"),
        (
            "Broken/Broken.php",
            "<?php\nnamespace App\\Broken;\n\nclass Broken extends {\n",
        ),
        ("notes.txt", "namespace Nope; class Nope {}"),
    ];
    for (path, content) in files {
        write_file(&base.join(path), content)?;
    }
    Ok(base)
}

fn sorted_names(finder: &Finder, dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = finder
        .in_dir(dir)
        .names()
        .into_iter()
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

#[test]
fn unconstrained_search_returns_every_loadable_class() -> anyhow::Result<()> {
    let dir = project("all")?;
    assert_eq!(
        sorted_names(&Finder::new(), &dir),
        vec![
            "App\\Http\\Kernel",
            "App\\Jobs\\BaseJob",
            "App\\Jobs\\Prune",
            "App\\Jobs\\SendMail",
            "Foo",
            "X\\Y\\Foo",
            "X\\Y\\FooBar",
        ]
    );
    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn namespace_match_is_exact() -> anyhow::Result<()> {
    let dir = project("namespace")?;
    let finder = Finder::new();

    assert_eq!(
        sorted_names(&finder.namespace("App\\Jobs"), &dir),
        vec!["App\\Jobs\\BaseJob", "App\\Jobs\\Prune", "App\\Jobs\\SendMail"]
    );
    assert!(finder.namespace("App").in_dir(&dir).is_empty());
    assert!(finder.namespace("app\\jobs").in_dir(&dir).is_empty());
    assert_eq!(sorted_names(&finder.namespace(""), &dir), vec!["Foo"]);

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn class_matches_short_or_qualified_name() -> anyhow::Result<()> {
    let dir = project("class")?;
    let finder = Finder::new();

    assert_eq!(
        sorted_names(&finder.class("Foo"), &dir),
        vec!["Foo", "X\\Y\\Foo"]
    );
    assert_eq!(
        sorted_names(&finder.class("X\\Y\\Foo"), &dir),
        vec!["X\\Y\\Foo"]
    );

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn combined_criteria_are_anded() -> anyhow::Result<()> {
    let dir = project("combined")?;
    let finder = Finder::new();

    assert_eq!(
        sorted_names(&finder.implements("App\\Contracts\\Handler"), &dir),
        vec!["App\\Jobs\\BaseJob", "App\\Jobs\\Prune", "App\\Jobs\\SendMail"]
    );
    assert_eq!(
        sorted_names(
            &finder
                .implements("App\\Contracts\\Handler")
                .uses("App\\Concerns\\Loggable")
                .has_method("handle"),
            &dir
        ),
        vec!["App\\Jobs\\SendMail"]
    );

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn extends_matches_immediate_parent_only() -> anyhow::Result<()> {
    let dir = project("extends")?;
    let finder = Finder::new();

    assert_eq!(
        sorted_names(&finder.extends("App\\Jobs\\BaseJob"), &dir),
        vec!["App\\Jobs\\Prune", "App\\Jobs\\SendMail"]
    );
    assert!(finder.extends("Handler").in_dir(&dir).is_empty());

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn member_checks_include_inherited_members() -> anyhow::Result<()> {
    let dir = project("members")?;
    let finder = Finder::new();

    assert_eq!(
        sorted_names(&finder.has_constant("QUEUE").has_property("tries"), &dir),
        vec!["App\\Jobs\\BaseJob", "App\\Jobs\\Prune", "App\\Jobs\\SendMail"]
    );
    assert_eq!(
        sorted_names(&finder.has_property("log").has_method("log"), &dir),
        vec!["App\\Jobs\\SendMail"]
    );
    assert_eq!(
        sorted_names(&finder.has_property("middleware"), &dir),
        vec!["App\\Http\\Kernel"]
    );

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn builder_has_value_semantics() -> anyhow::Result<()> {
    let dir = project("value")?;
    let f0 = Finder::new();
    let f1 = f0.namespace("App\\Http");

    assert_eq!(sorted_names(&f1, &dir), vec!["App\\Http\\Kernel"]);
    assert_eq!(f0.in_dir(&dir).len(), 7);

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn rejecting_filter_empties_any_search() -> anyhow::Result<()> {
    let dir = project("reject")?;
    let found = Finder::new()
        .namespace("App\\Jobs")
        .filter(|_| false)
        .in_dir(&dir);
    assert!(found.is_empty());

    let finals = Finder::new().filter(|d| d.is_final()).in_dir(&dir);
    assert_eq!(finals.names(), vec!["App\\Jobs\\SendMail"]);

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn unloadable_files_are_skipped_silently() -> anyhow::Result<()> {
    let dir = project("skipped")?;
    let found = Finder::new().in_dir(&dir);
    assert!(
        found
            .iter()
            .all(|d| !d.name().contains("Broken") && d.short_name() != "Handler")
    );
    assert!(Finder::new().in_dir(dir.join("does-not-exist")).is_empty());

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn duplicate_strategies_duplicate_results() -> anyhow::Result<()> {
    let dir = temp_dir("duplicate");
    write_file(
        &dir.join("Single.php"),
        "<?php\nnamespace One;\n\nclass Single {}\n",
    )?;

    let mut finder = Finder::new();
    finder.register_loading_strategy(Psr4LoadingStrategy::default());
    let found = finder.in_dir(&dir);
    assert_eq!(found.names(), vec!["One\\Single", "One\\Single"]);

    std::fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn classmap_strategy_finds_classes_psr4_misses() -> anyhow::Result<()> {
    let dir = temp_dir("classmap");
    write_file(
        &dir.join("functions.php"),
        "<?php\nnamespace Util;\n\nclass Clock {}\nclass Timer extends Clock {}\n",
    )?;

    assert!(Finder::new().in_dir(&dir).is_empty());

    let mut finder = Finder::new();
    finder.register_loading_strategy(ClassmapLoadingStrategy::default());
    let found = finder.extends("Util\\Clock").in_dir(&dir);
    assert_eq!(found.names(), vec!["Util\\Timer"]);
    assert_eq!(found[0].source_file(), dir.join("functions.php"));

    std::fs::remove_dir_all(dir)?;
    Ok(())
}
