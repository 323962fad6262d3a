use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use chromeprov::config;
use chromeprov::host::env::HostEnvironment;
use chromeprov::host::runner::SystemRunner;
use chromeprov::provision::{ProvisionError, ProvisionOptions, Provisioner};
use chromeprov::version::detect::detect_browser_version;
use chromeprov::version::index::ReleaseIndex;
use chromeprov::version::indexes::{ChromeForTestingIndex, LegacyDriverIndex};
use chromeprov::version::types::BrowserVersion;

#[derive(Parser)]
#[command(name = "chromeprov")]
#[command(version, about = "Provision Google Chrome and a matching ChromeDriver")]
struct Cli {
    /// Emit results as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Install the browser, resolve a compatible driver, and install it
    Install {
        /// Resolution policy for the driver lookup
        #[arg(long, value_enum, default_value = "full")]
        policy: Policy,
        /// Destination directory for the driver binary
        #[arg(long, default_value = config::DEFAULT_INSTALL_DIR)]
        dest: PathBuf,
        /// Skip browser installation and use the browser already present
        #[arg(long)]
        skip_browser: bool,
    },
    /// Resolve the compatible driver version for a browser version and print it
    Resolve {
        /// Browser version: full major.minor.build.patch, or bare major digits
        version: String,
        #[arg(long, value_enum, default_value = "full")]
        policy: Policy,
    },
    /// Detect and print the installed browser version
    Detect,
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    /// Exact-build lookup against the Chrome for Testing index (Chrome 115+)
    Full,
    /// Major-line lookup against the legacy index (Chrome <= 114)
    Major,
}

impl Policy {
    fn index(self) -> Box<dyn ReleaseIndex> {
        match self {
            Policy::Full => Box::new(ChromeForTestingIndex::default()),
            Policy::Major => Box::new(LegacyDriverIndex::default()),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<ProvisionError>()
                .map(ProvisionError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn try_main(cli: Cli) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli.command, cli.json))?;
    Ok(())
}

async fn run(command: Command, json: bool) -> Result<(), ProvisionError> {
    match command {
        Command::Install {
            policy,
            dest,
            skip_browser,
        } => {
            let mut env = HostEnvironment::detect()?;
            let runner = SystemRunner;
            let index = policy.index();
            let options = ProvisionOptions {
                dest_dir: dest,
                skip_browser,
            };

            let provisioner = Provisioner::new(&runner, index.as_ref(), options);
            let report = provisioner.run(&mut env).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report).expect("report serializes"));
            } else {
                println!(
                    "installed chromedriver {} for Chrome {} at {}",
                    report.driver_version,
                    report.browser_version,
                    report.driver_path.display()
                );
            }
            Ok(())
        }
        Command::Resolve { version, policy } => {
            let installed: BrowserVersion = version.parse()?;
            let index = policy.index();
            let resolved = index.latest_driver_version(&installed).await?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "browser": installed, "driver": resolved })
                );
            } else {
                println!("{resolved}");
            }
            Ok(())
        }
        Command::Detect => {
            let runner = SystemRunner;
            let version = detect_browser_version(&runner).await?;
            if json {
                println!("{}", serde_json::json!({ "browser": version }));
            } else {
                println!("{version}");
            }
            Ok(())
        }
    }
}
