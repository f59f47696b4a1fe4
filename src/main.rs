// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command line tool to list images and flavors and to create or delete
//! virtual machines.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{debug, LevelFilter};

use openstack_vm::compute::{self, ServerRequest};
use openstack_vm::{
    catalog, config, CatalogEntry, Credentials, Session, SystemClock, TransportConfig,
};

#[derive(Parser)]
#[command(name = "openstack-vm")]
#[command(about = "Create and delete virtual machines on OpenStack", long_about = None)]
struct Cli {
    #[command(flatten)]
    auth: AuthArgs,

    /// Validate TLS certificates of the cloud
    #[arg(long, global = true)]
    verify_certs: bool,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AuthArgs {
    /// OpenStack Keystone URL
    #[arg(short = 'u', long, env = "OS_AUTH_URL", global = true)]
    keystone_url: Option<String>,

    /// OpenStack username
    #[arg(short = 'n', long, env = "OS_USERNAME", global = true)]
    keystone_username: Option<String>,

    /// OpenStack password
    #[arg(
        short = 'w',
        long,
        env = "OS_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    keystone_password: Option<String>,

    /// OpenStack project name
    #[arg(short, long, env = "OS_PROJECT_NAME", global = true)]
    project: Option<String>,

    /// Cloud from clouds.yaml to take credentials from
    #[arg(long, env = "OS_CLOUD", global = true)]
    os_cloud: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all images
    ListImages,
    /// List all flavors
    ListFlavors {
        /// Fail unless a flavor with this name exists
        #[arg(short = 'f', long)]
        flavor_name: Option<String>,
    },
    /// Create a server and wait for it to become active
    CreateVm(CreateArgs),
    /// Delete a server
    DeleteVm {
        /// Server ID
        #[arg(short = 's', long)]
        server_id: String,
    },
}

#[derive(Args)]
struct CreateArgs {
    /// Image name
    #[arg(short = 'i', long)]
    image_name: String,

    /// Flavor name
    #[arg(short = 'f', long)]
    flavor_name: String,

    /// Server name
    #[arg(short = 'm', long)]
    server_name: String,

    /// Metadata item in KEY=VALUE format (can be repeated)
    #[arg(long = "meta", value_parser = parse_key_val)]
    metadata: Vec<(String, String)>,

    /// Key pair to inject
    #[arg(long, default_value = compute::DEFAULT_KEY_NAME)]
    key_name: String,

    /// Security group (can be repeated)
    #[arg(long = "security-group")]
    security_groups: Vec<String>,

    /// Give up waiting after this many seconds (0 waits forever)
    #[arg(long)]
    timeout: Option<u64>,
}

fn parse_key_val(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.is_empty() => Ok((key.to_string(), val.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{}`", value)),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();
}

fn credentials(cli: &Cli) -> Result<(Credentials, TransportConfig)> {
    if let Some(ref cloud) = cli.auth.os_cloud {
        debug!("Using cloud {} from clouds.yaml", cloud);
        let cfg = config::from_config(cloud)
            .with_context(|| format!("Cannot load configuration of cloud {}", cloud))?;
        let transport = if cli.verify_certs {
            cfg.transport.with_certificate_verification(true)
        } else {
            cfg.transport
        };
        return Ok((cfg.credentials, transport));
    }

    let auth = &cli.auth;
    let url = auth
        .keystone_url
        .clone()
        .ok_or_else(|| anyhow!("OpenStack Keystone URL not given."))?;
    let username = auth
        .keystone_username
        .clone()
        .ok_or_else(|| anyhow!("OpenStack username not given."))?;
    let password = auth
        .keystone_password
        .clone()
        .ok_or_else(|| anyhow!("OpenStack password not given."))?;
    let project = auth
        .project
        .clone()
        .ok_or_else(|| anyhow!("OpenStack project not given."))?;
    Ok((
        Credentials::new(url, username, password, project),
        TransportConfig::default().with_certificate_verification(cli.verify_certs),
    ))
}

fn print_entries<W: Write>(out: &mut W, title: &str, entries: &[CatalogEntry]) -> io::Result<()> {
    writeln!(out, "\n{}:", title)?;
    for entry in entries {
        let updated_at = entry
            .updated_at
            .map(|value| value.to_rfc3339())
            .unwrap_or_default();
        writeln!(out, "- {}\t{}\t{}", entry.id, updated_at, entry.name)?;
    }
    Ok(())
}

fn find<'e>(entries: &'e [CatalogEntry], what: &str, name: &str) -> Result<&'e CatalogEntry> {
    catalog::resolve_by_name(entries, name).ok_or_else(|| anyhow!("{} \"{}\" not found.", what, name))
}

async fn create_vm(session: &Session, args: CreateArgs) -> Result<String> {
    let images = catalog::list_images(session).await?;
    let image = find(&images, "Image", &args.image_name)?;
    let flavors = catalog::list_flavors(session).await?;
    let flavor = find(&flavors, "Flavor", &args.flavor_name)?;

    let mut request = ServerRequest::new(args.server_name, image.id.clone(), flavor.id.clone())
        .with_key_name(Some(args.key_name));
    if !args.security_groups.is_empty() {
        request = request.with_security_groups(args.security_groups);
    }
    for (key, value) in args.metadata {
        request = request.with_metadata(key, value);
    }

    let timeout = args.timeout.map(Duration::from_secs);
    let server = compute::create_server(session, &SystemClock, request, timeout).await?;
    Ok(server.id)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (creds, transport) = credentials(&cli)?;
    let session = Session::establish(&creds, transport).await?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::ListImages => {
            let images = catalog::list_images(&session).await?;
            print_entries(&mut out, "Images", &images)?;
        }
        Commands::ListFlavors { flavor_name } => {
            let flavors = catalog::list_flavors(&session).await?;
            print_entries(&mut out, "Flavors", &flavors)?;
            if let Some(name) = flavor_name {
                let _ = find(&flavors, "Flavor", &name)?;
            }
        }
        Commands::CreateVm(args) => {
            let id = create_vm(&session, args).await?;
            writeln!(out, "Created server {}", id)?;
        }
        Commands::DeleteVm { server_id } => {
            compute::delete_server(&session, &server_id).await?;
            writeln!(out, "Deleted server {}", server_id)?;
        }
    }

    Ok(())
}
