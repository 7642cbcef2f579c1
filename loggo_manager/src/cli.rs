//! Host command tree
//!
//! Native commands are defined here. Plugin commands come from the plugins
//! found on disk, each paired with its descriptor from the registry the
//! tree is built with.

use crate::error::StartupError;
use crate::plugins::{CommandDescriptor, CommandRegistry, FlagPolicy, PluginFile, RegisteredPlugin};
use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;

pub const BIN_NAME: &str = "loggo";

const ABOUT: &str = "Stream json logs as rich TUI";
const LONG_ABOUT: &str = "l'oGGo provides a rich Terminal User Interface for streaming json based
logs and a toolset to assist you tailoring the display format.";

const PLUGIN_ARGS: &str = "args";

/// What the parsed command line asks the host to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Forward to a plugin
    Plugin { name: String, args: Vec<OsString> },
    /// List discovered plugins
    ListPlugins,
    /// Print a completion script
    Completion(Shell),
}

#[derive(Debug, Clone)]
pub struct HostCommandTree {
    plugins: Vec<RegisteredPlugin>,
}

impl HostCommandTree {
    /// Attach one entry per discovered plugin.
    ///
    /// Fails on the first plugin `registry` has no descriptor for.
    pub fn new(registry: &CommandRegistry, discovered: Vec<PluginFile>) -> Result<Self, StartupError> {
        Ok(Self {
            plugins: registry.resolve(discovered)?,
        })
    }

    pub fn plugins(&self) -> &[RegisteredPlugin] {
        &self.plugins
    }

    pub fn find(&self, name: &str) -> Option<&RegisteredPlugin> {
        self.plugins.iter().find(|p| p.descriptor.name == name)
    }

    /// The full clap tree: native commands plus one entry per plugin
    pub fn command(&self) -> Command {
        let mut root = Command::new(BIN_NAME)
            .about(ABOUT)
            .long_about(LONG_ABOUT)
            .version(env!("CARGO_PKG_VERSION"))
            .arg_required_else_help(true)
            .subcommand(
                Command::new("plugins").about("List the plugin commands installed next to loggo"),
            )
            .subcommand(
                Command::new("completion")
                    .about("Generate shell completion scripts")
                    .hide(true)
                    .arg(
                        Arg::new("shell")
                            .help("Shell to generate completions for")
                            .required(true)
                            .value_parser(value_parser!(Shell)),
                    ),
            );

        for plugin in &self.plugins {
            root = root.subcommand(plugin_command(&plugin.descriptor));
        }
        root
    }

    /// Parse a full command line, program name included.
    ///
    /// Passthrough plugins bypass clap entirely, so every token after the
    /// plugin name (`--`, `--help` and `--version` included) reaches it.
    pub fn parse_from<I, T>(&self, argv: I) -> Result<Invocation, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        if let Some(invocation) = self.passthrough(&argv) {
            return Ok(invocation);
        }

        let matches = self.command().try_get_matches_from(argv)?;
        self.route(&matches)
    }

    pub fn route(&self, matches: &ArgMatches) -> Result<Invocation, clap::Error> {
        match matches.subcommand() {
            Some(("plugins", _)) => Ok(Invocation::ListPlugins),
            Some(("completion", sub)) => sub
                .get_one::<Shell>("shell")
                .copied()
                .map(Invocation::Completion)
                .ok_or_else(|| {
                    self.command()
                        .error(ErrorKind::MissingRequiredArgument, "a shell is required")
                }),
            Some((name, sub)) if self.find(name).is_some() => Ok(Invocation::Plugin {
                name: name.to_string(),
                args: sub
                    .get_many::<OsString>(PLUGIN_ARGS)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
            }),
            _ => Err(self
                .command()
                .error(ErrorKind::MissingSubcommand, "a subcommand is required")),
        }
    }

    fn passthrough(&self, argv: &[OsString]) -> Option<Invocation> {
        let name = argv.get(1)?.to_str()?;
        let plugin = self.find(name)?;
        if plugin.descriptor.flag_policy != FlagPolicy::Passthrough {
            return None;
        }

        Some(Invocation::Plugin {
            name: name.to_string(),
            args: argv[2..].to_vec(),
        })
    }
}

fn plugin_command(descriptor: &CommandDescriptor) -> Command {
    let args = Arg::new(PLUGIN_ARGS)
        .value_name("ARGS")
        .num_args(0..)
        .action(ArgAction::Append)
        .value_parser(value_parser!(OsString));

    let command = Command::new(descriptor.name)
        .about(descriptor.about)
        .long_about(descriptor.long_about);

    match descriptor.flag_policy {
        FlagPolicy::Passthrough => command
            .disable_help_flag(true)
            .disable_version_flag(true)
            .arg(args.trailing_var_arg(true).allow_hyphen_values(true)),
        FlagPolicy::HostParses => command.arg(args.help("Arguments handed to the plugin")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::CMD_GCP_STREAM;
    use std::path::PathBuf;

    fn discovered(name: &str) -> PluginFile {
        PluginFile {
            dir: PathBuf::from("/opt/loggo"),
            file_name: format!("loggo-{}", name),
            name: name.to_string(),
        }
    }

    fn descriptor(name: &'static str, flag_policy: FlagPolicy) -> CommandDescriptor {
        CommandDescriptor {
            name,
            about: "test plugin",
            long_about: "test plugin",
            flag_policy,
        }
    }

    fn tree() -> HostCommandTree {
        let registry = CommandRegistry::new([
            descriptor(CMD_GCP_STREAM, FlagPolicy::Passthrough),
            descriptor("tail", FlagPolicy::HostParses),
            descriptor("grep", FlagPolicy::Passthrough),
        ])
        .unwrap();
        HostCommandTree::new(&registry, vec![discovered(CMD_GCP_STREAM), discovered("tail")]).unwrap()
    }

    fn plugin(name: &str, args: &[&str]) -> Invocation {
        Invocation::Plugin {
            name: name.to_string(),
            args: args.iter().map(OsString::from).collect(),
        }
    }

    #[test]
    fn test_command_tree_is_valid() {
        tree().command().debug_assert();
        HostCommandTree::new(&CommandRegistry::builtin(), Vec::new())
            .unwrap()
            .command()
            .debug_assert();
    }

    #[test]
    fn test_one_entry_per_plugin() {
        let command = tree().command();
        let names: Vec<_> = command.get_subcommands().map(|c| c.get_name()).collect();
        assert_eq!(names, vec!["plugins", "completion", CMD_GCP_STREAM, "tail"]);
    }

    #[test]
    fn test_registered_but_absent_plugin_has_no_entry() {
        let tree = tree();
        assert!(tree.find("grep").is_none());
        let err = tree.parse_from(["loggo", "grep"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_injected_registry_rejects_unknown_plugin() {
        let err = HostCommandTree::new(&CommandRegistry::builtin(), vec![discovered("tail")])
            .unwrap_err();
        assert!(matches!(err, StartupError::UnregisteredPlugin { ref name } if name == "tail"));
    }

    #[test]
    fn test_passthrough_keeps_flag_like_arguments() {
        let invocation = tree()
            .parse_from(["loggo", "gcp-stream", "--project", "p", "--help", "--", "-v"])
            .unwrap();
        assert_eq!(
            invocation,
            plugin("gcp-stream", &["--project", "p", "--help", "--", "-v"])
        );
    }

    #[test]
    fn test_passthrough_without_arguments() {
        let invocation = tree().parse_from(["loggo", "gcp-stream"]).unwrap();
        assert_eq!(invocation, plugin("gcp-stream", &[]));
    }

    #[test]
    fn test_host_parsed_plugin_collects_positionals() {
        let invocation = tree().parse_from(["loggo", "tail", "a", "b"]).unwrap();
        assert_eq!(invocation, plugin("tail", &["a", "b"]));
    }

    #[test]
    fn test_host_parsed_plugin_rejects_unknown_flags() {
        let err = tree()
            .parse_from(["loggo", "tail", "--follow"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_unknown_command_falls_through_to_usage() {
        let err = tree().parse_from(["loggo", "nope"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_no_command_shows_help() {
        let err = tree().parse_from(["loggo"]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn test_native_commands() {
        assert_eq!(
            tree().parse_from(["loggo", "plugins"]).unwrap(),
            Invocation::ListPlugins
        );
        assert_eq!(
            tree().parse_from(["loggo", "completion", "bash"]).unwrap(),
            Invocation::Completion(Shell::Bash)
        );
    }

    #[test]
    fn test_help_subcommand_describes_plugin() {
        let err = tree()
            .parse_from(["loggo", "help", "gcp-stream"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("test plugin"));
    }
}
