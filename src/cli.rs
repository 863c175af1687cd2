//! Command line interface.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::AsyncRead;

use crate::config::{load_config, ConfigError, StoreBackend, ToolConfig};
use crate::error::ServeResult;
use crate::fsprobe::Filesystem;
use crate::identity::IdentityResolver;
use crate::serve::{HandlerKind, Outcome, ServeService};
use crate::store::ConfigStore;

#[derive(Debug, Parser)]
#[command(name = "serve-config")]
#[command(about = "Manage the local serve configuration", long_about = None)]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Local daemon API base URL (overrides the settings file).
    #[arg(long, global = true)]
    pub local_api: Option<String>,

    /// Store the serve config in this JSON file instead of the daemon.
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// Use this DNS name for the node instead of asking the daemon.
    #[arg(long, global = true)]
    pub dns_name: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve content and local servers
    Serve(ServeArgs),
}

/// `serve <mount-point> {path|proxy|text} <arg>` or `serve <subcommand>`.
///
/// Global flags may follow `serve`, so positionals do not switch subcommands
/// off. An argument that spells a subcommand name goes after `--`.
#[derive(Debug, Args)]
#[command(subcommand_negates_reqs = true, after_help = SERVE_EXAMPLES)]
pub struct ServeArgs {
    #[command(subcommand)]
    pub command: Option<ServeCommand>,

    /// URL path prefix to mount the handler at
    #[arg(required = true)]
    pub mount_point: Option<String>,

    /// Handler type
    #[arg(value_enum, required = true)]
    pub kind: Option<HandlerKind>,

    /// Port, URL, path or text, depending on the handler type
    #[arg(required = true)]
    pub arg: Option<String>,
}

const SERVE_EXAMPLES: &str = "\
EXAMPLES
  - Proxy requests to a local web server on port 3000:
    $ serve-config serve / proxy 3000

  - Serve files (or directories) from a local path:
    $ serve-config serve /some-file path /path/to/some-file

  - Serve static text, mounted at \"/\":
    $ serve-config serve / text \"Hello, world!\"";

#[derive(Debug, Subcommand)]
pub enum ServeCommand {
    /// Show current serve config
    ShowConfig,
    /// Add a TCP port forward
    #[command(after_help = "\
EXAMPLES
  - Proxy TLS encrypted TCP packets to a local TCP server on port 5432:
    $ serve-config serve tcp 5432

  - Proxy raw, TLS-terminated TCP packets to a local TCP server on port 5432:
    $ serve-config serve tcp --terminate-tls 5432")]
    Tcp {
        /// Terminate TLS before forwarding TCP connection
        #[arg(long)]
        terminate_tls: bool,

        /// Local port to forward to
        port: String,
    },
    /// Enable or disable ingress
    Ingress {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Replace the whole serve config with JSON from stdin
    #[command(hide = true)]
    SetRaw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Cli {
    /// Settings file (if any) with command line overrides applied.
    pub fn tool_config(&self) -> Result<ToolConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ToolConfig::default(),
        };
        if let Some(url) = &self.local_api {
            config.local_api.base_url = url.clone();
        }
        if let Some(path) = &self.state_file {
            config.store.backend = StoreBackend::File;
            config.store.path = path.to_string_lossy().into_owned();
        }
        if let Some(name) = &self.dns_name {
            config.identity.dns_name = name.clone();
        }
        Ok(config)
    }
}

/// Run one `serve` invocation against `service`.
///
/// `input` feeds `set-raw`; `out` receives `show-config` output.
pub async fn run_serve<S, I, F, R, W>(
    service: &ServeService<S, I, F>,
    args: &ServeArgs,
    input: R,
    out: &mut W,
) -> ServeResult<Option<Outcome>>
where
    S: ConfigStore,
    I: IdentityResolver,
    F: Filesystem,
    R: AsyncRead + Unpin,
    W: Write,
{
    match &args.command {
        Some(ServeCommand::ShowConfig) => {
            let config = service.show_config().await?;
            let mut json = serde_json::to_string_pretty(&config)?;
            json.push('\n');
            out.write_all(json.as_bytes())?;
            Ok(None)
        }
        Some(ServeCommand::Tcp {
            terminate_tls,
            port,
        }) => Ok(Some(service.serve_tcp(port, *terminate_tls).await?)),
        Some(ServeCommand::Ingress { state }) => {
            Ok(Some(service.set_ingress(*state == Toggle::On).await?))
        }
        Some(ServeCommand::SetRaw) => {
            service.set_raw(input).await?;
            Ok(Some(Outcome::Written))
        }
        None => match (&args.mount_point, args.kind, &args.arg) {
            (Some(mount), Some(kind), Some(arg)) => {
                Ok(Some(service.serve_web(mount, kind, arg).await?))
            }
            // clap enforces all three when no subcommand is given
            _ => Ok(None),
        },
    }
}
