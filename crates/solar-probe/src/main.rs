use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solar_config::ConfigLoader;
use solar_protocol::Setting;
use solar_provider::{PluginMetadata, PluginRegistry, Provider, ProviderData};
use solar_types::Variables;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod report;

use report::Description;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config directory (global.toml, providers/<plugin>.toml)
    #[arg(short, long, default_value = "config")]
    config_dir: PathBuf,

    /// Plugin name, case-insensitive
    #[arg(short, long, default_value = "Sdm630")]
    plugin: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print metadata, default setting, default activity and dialog
    Describe,
    /// Open and close one connection with the configured setting
    Test,
    /// Run first run plus one activity cycle and print the variables
    Poll,
    /// List registered plugins
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loader = ConfigLoader::new(&args.config_dir);
    loader.validate()?;
    let global = loader.load_global()?;

    init_tracing(&global.system.log_level, args.json_logs);
    tracing::info!(
        system = %global.system.name,
        config_dir = %args.config_dir.display(),
        "Starting solar probe"
    );

    let registry = PluginRegistry::new();
    sdm630::register(&registry)?;

    if let Command::List = args.command {
        let list: Vec<&PluginMetadata> = registry.list();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let mut provider = registry
        .create(&args.plugin)
        .with_context(|| format!("Failed to create plugin {}", args.plugin))?;
    provider.set_locale(&global.system.locale)?;

    let setting = loader.load_provider_setting(
        provider.metadata().name,
        &provider.default_provider_setting(),
    )?;

    match args.command {
        Command::Describe => {
            let description = Description::of(provider.as_ref(), &setting);
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
        Command::Test => {
            provider.test_provider_connection(&setting).await?;
            println!("Connection OK");
        }
        Command::Poll => {
            let variables = poll(provider.as_mut(), &setting).await?;
            println!("{}", serde_json::to_string_pretty(&variables)?);
        }
        Command::List => {}
    }

    Ok(())
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// 首次运行 + 一次采集
async fn poll(provider: &mut dyn Provider, setting: &Setting) -> Result<Variables> {
    let metadata = provider.metadata();
    provider.set_provider_data(ProviderData::new(
        format!("{} probe", metadata.name),
        metadata.name,
        setting.clone(),
    ));
    provider.do_on_first_run().await?;

    let mut variables = Variables::new();
    provider.do_activity_work(&mut variables).await?;
    tracing::info!(fields = variables.len(), "Poll completed");
    Ok(variables)
}
