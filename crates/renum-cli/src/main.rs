use clap::{Parser, Subcommand};
use renum_core::{EnumFactory, EnumType, FactoryConfig, Key, Manifest, Namespace};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "renum.json";

/// renum - rich enumerated types declared from manifests
#[derive(Parser, Debug)]
#[command(name = "renum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to a renum.json or YAML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Write a default renum.json to the current directory
    #[arg(long)]
    init: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every type and value declared by a manifest
    Inspect {
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
    },
    /// Resolve a key against one type and print the canonical value name
    Lookup {
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Type name, without the namespace path
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Integer index, value name or snake_case name
        #[arg(value_name = "KEY", allow_hyphen_values = true)]
        key: String,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; set RUST_LOG=debug for detailed logs
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.init {
        init_config()?;
        return Ok(());
    }

    let Some(command) = cli.command else {
        eprintln!("Error: No command specified. Use --help for usage information.");
        std::process::exit(1);
    };

    let config = load_config(cli.config.as_deref())?;
    let factory = EnumFactory::new(config);

    match command {
        Command::Inspect { manifest } => {
            let namespace = build_namespace(&factory, &manifest)?;
            print!("{}", render_namespace(&namespace));
        }
        Command::Lookup {
            manifest,
            type_name,
            key,
        } => {
            let namespace = build_namespace(&factory, &manifest)?;
            let enum_type = namespace.get(&type_name).ok_or_else(|| {
                anyhow::anyhow!(
                    "No enum named '{}' in {}",
                    type_name,
                    manifest.display()
                )
            })?;

            match lookup(enum_type, &key)? {
                Some(found) => println!("{}", found),
                None => {
                    eprintln!("No value of {} matches '{}'", enum_type, key);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn init_config() -> anyhow::Result<()> {
    let path = Path::new(DEFAULT_CONFIG);
    if path.exists() {
        anyhow::bail!("{} already exists", DEFAULT_CONFIG);
    }
    FactoryConfig::init_file(path)?;
    println!("Created {}", DEFAULT_CONFIG);
    Ok(())
}

/// Explicit `--config`, else `renum.json` in the working directory, else defaults
fn load_config(explicit: Option<&Path>) -> anyhow::Result<FactoryConfig> {
    if let Some(path) = explicit {
        return FactoryConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config file: {}", e));
    }

    let default_path = Path::new(DEFAULT_CONFIG);
    if default_path.exists() {
        debug!("Using {}", DEFAULT_CONFIG);
        FactoryConfig::from_file(default_path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", DEFAULT_CONFIG, e))
    } else {
        Ok(FactoryConfig::default())
    }
}

fn build_namespace(factory: &EnumFactory, path: &Path) -> anyhow::Result<Namespace> {
    let manifest = Manifest::from_file(path)?;
    let namespace = manifest.build(factory)?;
    info!(
        manifest = %path.display(),
        types = namespace.len(),
        warnings = factory.warning_count(),
        "Loaded manifest"
    );
    Ok(namespace)
}

/// Integers index by position; anything else goes through name lookup
fn lookup(enum_type: &EnumType, key: &str) -> anyhow::Result<Option<String>> {
    let key = match key.parse::<i64>() {
        Ok(index) => Key::Index(index),
        Err(_) => Key::Name(key),
    };
    Ok(enum_type.get(key)?.map(|member| member.to_string()))
}

fn render_namespace(namespace: &Namespace) -> String {
    namespace.iter().map(render_type).collect::<Vec<_>>().join("\n")
}

fn render_type(enum_type: &EnumType) -> String {
    let mut out = format!("{} ({} values)\n", enum_type, enum_type.len());

    if !enum_type.fields().is_empty() {
        let fields: Vec<_> = enum_type.fields().names().collect();
        out.push_str(&format!("  fields: {}\n", fields.join(", ")));
    }

    for value in enum_type.values() {
        out.push_str(&format!("  {}: {}", value.index(), value.name()));
        let fields: Vec<_> = value
            .fields()
            .map(|(name, field)| format!("{}={}", name, field))
            .collect();
        if !fields.is_empty() {
            out.push_str(&format!(" ({})", fields.join(", ")));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use renum_core::{CollectingDiagnosticHandler, Declaration, FieldDef, ValueDecl};
    use std::sync::Arc;

    fn factory() -> EnumFactory {
        EnumFactory::with_dependencies(
            FactoryConfig::default(),
            Arc::new(CollectingDiagnosticHandler::new()),
        )
    }

    #[test]
    fn test_render_plain_type() {
        let mut ns = Namespace::root();
        let status = factory()
            .create(
                &mut ns,
                "Status",
                Declaration::names(["NOT_STARTED", "IN_PROGRESS", "COMPLETE"]),
            )
            .unwrap();

        insta::assert_snapshot!(render_type(&status), @r"
        Status (3 values)
          0: NOT_STARTED
          1: IN_PROGRESS
          2: COMPLETE
        ");
    }

    #[test]
    fn test_render_fields() {
        let mut ns = Namespace::new("Shop").unwrap();
        let size = factory()
            .create(
                &mut ns,
                "Size",
                Declaration::body(|b| {
                    b.field(FieldDef::new("description").with_default("NO DESCRIPTION GIVEN"))?;
                    b.field("order")?;
                    b.value(ValueDecl::new("Small").arg("Really really tiny").arg(1))?;
                    b.value("Unknown")?;
                    Ok(())
                }),
            )
            .unwrap();

        insta::assert_snapshot!(render_type(&size), @r#"
        Shop::Size (2 values)
          fields: description, order
          0: Small (description="Really really tiny", order=1)
          1: Unknown (description="NO DESCRIPTION GIVEN", order=nil)
        "#);
    }

    #[test]
    fn test_lookup_keys() {
        let mut ns = Namespace::root();
        let fuzzy = factory()
            .create(&mut ns, "Fuzzy", Declaration::names(["FooBar", "BarFoo"]))
            .unwrap();

        assert_eq!(lookup(&fuzzy, "1").unwrap().as_deref(), Some("Fuzzy::BarFoo"));
        assert_eq!(lookup(&fuzzy, "foo_bar").unwrap().as_deref(), Some("Fuzzy::FooBar"));
        assert_eq!(lookup(&fuzzy, "Missing").unwrap(), None);
        assert!(lookup(&fuzzy, "-1").is_err());
    }

    #[test]
    fn test_cli_parses_lookup() {
        let cli = Cli::try_parse_from(["renum", "lookup", "enums.yaml", "Size", "small"]).unwrap();
        match cli.command {
            Some(Command::Lookup { type_name, key, .. }) => {
                assert_eq!(type_name, "Size");
                assert_eq!(key, "small");
            }
            other => panic!("expected lookup, got {:?}", other),
        }
    }
}
