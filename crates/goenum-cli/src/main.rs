use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use goenum_core::error::GenerateError;
use goenum_core::{EnumConfig, Features, GeneratedFile};

#[derive(Parser)]
#[command(
    name = "goenum",
    about = "Generate string conversions for Go enums",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: Option<EnumArgs>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the values and representations that would be generated
    Inspect {
        #[command(flatten)]
        args: EnumArgs,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Invocation parameters. `go generate` provides the file, line and package
/// through the environment.
#[derive(Args, Clone)]
struct EnumArgs {
    /// Name of the enum type
    #[arg(short = 't', long = "type")]
    type_name: String,

    /// Go source file containing the declaration
    #[arg(long, env = "GOFILE")]
    file: PathBuf,

    /// Line of the `//go:generate` directive
    #[arg(long, env = "GOLINE")]
    line: usize,

    /// Package name written into the generated file
    #[arg(long = "package", env = "GOPACKAGE")]
    package_name: String,

    /// Comma-separated representations, replacing derived ones by position
    #[arg(long, value_delimiter = ',')]
    values: Option<Vec<String>>,

    /// Also generate MarshalText and UnmarshalText
    #[arg(long)]
    text: bool,

    /// Also generate database/sql Scan and Value
    #[arg(long)]
    sql: bool,
}

impl From<EnumArgs> for EnumConfig {
    fn from(args: EnumArgs) -> Self {
        Self {
            type_name: args.type_name,
            file: args.file,
            directive_line: args.line,
            package_name: args.package_name,
            values: args.values,
            features: Features {
                text: args.text,
                sql: args.sql,
            },
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match (cli.command, cli.generate) {
        (Some(Commands::Inspect { args, format }), _) => cmd_inspect(args.into(), format),

        (Some(Commands::Completions { shell }), _) => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "goenum", &mut std::io::stdout());
            Ok(())
        }

        (None, Some(args)) => cmd_generate(args.into()),

        (None, None) => {
            <Cli as clap::CommandFactory>::command().print_help()?;
            anyhow::bail!("missing parameters: --type, --file, --line and --package are required");
        }
    }
}

fn cmd_generate(config: EnumConfig) -> Result<()> {
    match goenum_core::generate(&config) {
        Ok(file) => {
            eprintln!(
                "goenum: {} values of {} -> {}",
                file.values.len(),
                config.type_name,
                file.path.display()
            );
            Ok(())
        }
        // Nothing sensible can follow a failed write; stop right here.
        Err(err @ GenerateError::Write { .. }) => {
            log::error!("{err}");
            eprintln!("goenum: {err}");
            std::process::exit(2);
        }
        Err(err) => Err(err).with_context(|| format!("goenum --type {}", config.type_name)),
    }
}

fn cmd_inspect(config: EnumConfig, format: InspectFormat) -> Result<()> {
    let file = goenum_core::plan(&config)
        .with_context(|| format!("goenum inspect --type {}", config.type_name))?;

    let summary = build_inspect_summary(&config, &file);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(config: &EnumConfig, file: &GeneratedFile) -> serde_json::Value {
    serde_json::json!({
        "type": config.type_name,
        "package": config.package_name,
        "source": config.file.display().to_string(),
        "line": config.target_line(),
        "template": file.template.template_name(),
        "output": file.path.display().to_string(),
        "values": file.values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "goenum",
            "--type",
            "Color",
            "--file",
            "color.go",
            "--line",
            "4",
            "--package",
            "paint",
            "--values",
            "r,g,b",
            "--text",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        let config: EnumConfig = cli.generate.unwrap().into();
        assert_eq!(config.type_name, "Color");
        assert_eq!(config.file, PathBuf::from("color.go"));
        assert_eq!(config.target_line(), 5);
        assert_eq!(config.package_name, "paint");
        assert_eq!(
            config.values,
            Some(vec!["r".to_string(), "g".to_string(), "b".to_string()])
        );
        assert!(config.features.text);
        assert!(!config.features.sql);
    }

    #[test]
    fn test_parse_inspect() {
        let cli = Cli::try_parse_from([
            "goenum", "inspect", "-t", "Color", "--file", "color.go", "--line", "4", "--package",
            "paint", "--sql", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Inspect { args, format }) => {
                assert!(args.sql);
                assert!(matches!(format, InspectFormat::Json));
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn test_rejects_non_numeric_line() {
        let result = Cli::try_parse_from([
            "goenum", "-t", "Color", "--file", "color.go", "--line", "four", "--package", "paint",
        ]);
        assert!(result.is_err());
    }
}
