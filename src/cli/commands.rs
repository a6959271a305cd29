//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, info, instrument};

use crate::application::services::TreeRequest;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat, TreeArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{
    config_template, expand_path, global_config_path, local_config_path, Settings,
};
use crate::domain::{Delimiter, Direction, DotStyle, TreeRender};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

/// Execute the parsed command line.
pub fn execute(cli: Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;

    match cli.command {
        Some(Commands::Tree(args)) => {
            let container = create_container(&project_dir)?;
            cmd_tree(&container, &args)
        }
        Some(Commands::Config { command }) => cmd_config(&project_dir, &command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "gvtree", &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) => Ok(expand_path(dir)),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("resolve current directory", e))),
    }
}

fn create_container(project_dir: &Path) -> CliResult<ServiceContainer> {
    let settings = Settings::load(Some(project_dir))?;
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

/// Merge command-line flags over the loaded settings.
pub fn build_request(settings: &Settings, args: &TreeArgs) -> CliResult<TreeRequest> {
    let direction: Direction = match &args.direction {
        Some(d) => d.parse().map_err(ApplicationError::from)?,
        None => settings.direction,
    };
    let delimiter = Delimiter::from_name(args.delimiter.as_deref().unwrap_or(&settings.delimiter));

    Ok(TreeRequest {
        path: expand_path(&args.file),
        delimiter,
        root: args.root.clone(),
        cutoff: args.cutoff.unwrap_or(settings.cutoff),
        layer_max: args.layers.unwrap_or(settings.layer_max),
        direction,
    })
}

fn build_style(settings: &Settings, args: &TreeArgs) -> DotStyle {
    DotStyle {
        layer_space: args.layer_space.unwrap_or(settings.render.layer_space),
        edge_color: args
            .edge_color
            .clone()
            .unwrap_or_else(|| settings.render.edge_color.clone()),
    }
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, args: &TreeArgs) -> CliResult<()> {
    let settings = &container.settings;
    let request = build_request(settings, args)?;
    let style = build_style(settings, args);
    let service = &container.tree_service;

    let tree = service.get_tree(&request)?;
    info!(
        "tree rooted at {}: {} node(s), {} edge(s), depth {}",
        tree.root_id(),
        tree.len(),
        tree.edge_count(),
        tree.depth()
    );

    let rendered = match args.format {
        OutputFormat::Tree => format!("{}", tree.to_tree_string()),
        OutputFormat::Edges => tree.to_edge_list(request.delimiter.as_output()),
        OutputFormat::Dot => tree.to_dot(&style),
    };

    match &args.output {
        Some(path) => {
            let path = settings.resolve_output(path);
            service.write_output(&path, &rendered)?;
            output::action("Wrote", &path.display());
        }
        None => output::info(&rendered),
    }

    if let Some(image) = &args.image {
        let image = settings.resolve_output(image);
        service.render_image(&tree, &style, &image)?;
        output::action("Rendered", &image.display());
    }

    Ok(())
}

fn cmd_config(project_dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence)");
            match global_config_path() {
                Some(path) => output::detail(&describe_path("global", &path)),
                None => output::detail(&"global: <no config directory>"),
            }
            output::detail(&describe_path("local", &local_config_path(project_dir)));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(project_dir)
            };
            let fs = RealFileSystem;
            if fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create directory for {}", path.display()), e))?;
            fs.write(&path, &config_template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
            Ok(())
        }
    }
}

fn describe_path(label: &str, path: &Path) -> String {
    let state = if path.exists() { "exists" } else { "missing" };
    format!("{label}: {} ({state})", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse_tree_args(argv: &[&str]) -> TreeArgs {
        match Cli::parse_from(argv).command {
            Some(Commands::Tree(args)) => args,
            other => panic!("expected tree command, got {other:?}"),
        }
    }

    #[test]
    fn test_build_request_prefers_flags_over_settings() {
        let args = parse_tree_args(&[
            "gvtree", "tree", "edges.txt", "--root", "A", "--cutoff", "-1.5", "--layers", "7",
            "--direction", "down", "--delimiter", "comma",
        ]);
        let request = build_request(&Settings::default(), &args).unwrap();
        assert_eq!(request.root, "A");
        assert_eq!(request.cutoff, -1.5);
        assert_eq!(request.layer_max, 7);
        assert_eq!(request.direction, Direction::Down);
        assert_eq!(request.delimiter, Delimiter::Token(",".into()));
    }

    #[test]
    fn test_build_request_falls_back_to_settings() {
        let args = parse_tree_args(&["gvtree", "tree", "edges.txt", "-r", "A"]);
        let settings = Settings {
            cutoff: 4.0,
            direction: Direction::Down,
            ..Default::default()
        };
        let request = build_request(&settings, &args).unwrap();
        assert_eq!(request.cutoff, 4.0);
        assert_eq!(request.layer_max, 3);
        assert_eq!(request.direction, Direction::Down);
        assert_eq!(request.delimiter, Delimiter::Whitespace);
    }

    #[test]
    fn test_build_request_rejects_unknown_direction() {
        let args = parse_tree_args(&["gvtree", "tree", "edges.txt", "-r", "A", "-d", "left"]);
        let err = build_request(&Settings::default(), &args).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }
}
