use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};

use week_picker::app::presenter::{self, SelectControl};
use week_picker::app::prober::{self, site_root};
use week_picker::app::widget::{PageState, Settlement, WeekDropdown};
use week_picker::catalog::Catalog;
use week_picker::config::Config;
use week_picker::constants;
use week_picker::infra::environment::HeadlessEnvironment;
use week_picker::infra::http_client::ReqwestHttp;
use week_picker::logging;

#[derive(Parser)]
#[command(name = "week_picker")]
#[command(about = "Probe a site's week pages and show what the week selector would do")]
#[command(version)]
struct Cli {
    /// Config file with [site] settings and an optional [[weeks]] list
    #[arg(long, global = true, default_value = constants::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory URL the week pages live under (overrides config and env)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Where the rolling JSON log is written
    #[arg(long, global = true, default_value = constants::DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured weeks without probing
    Weeks,
    /// Check which week pages exist and print the dropdown
    Probe,
    /// Decide what a visitor at --current would see
    Resolve {
        /// Location path of the page being viewed
        #[arg(long, default_value = "/")]
        current: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Simulate picking a week from the dropdown
    Select {
        /// Identifier of the week picked
        identifier: String,
        /// Location path of the page being viewed
        #[arg(long, default_value = "/")]
        current: String,
    },
}

fn print_control(control: &SelectControl) {
    for (index, option) in control.options.iter().enumerate() {
        let marker = if control.selected_index == Some(index) {
            ">"
        } else if option.disabled {
            "x"
        } else {
            " "
        };
        println!(" {} {:<28} {}", marker, option.value, option.text);
    }
}

struct Session {
    config: Config,
    catalog: Catalog,
}

impl Session {
    fn load(cli: &Cli) -> Result<Self> {
        let mut config = Config::load_or_default(&cli.config)?;
        config.apply_env_overrides(cli.base_url.clone());
        let catalog = config.catalog();
        debug!(weeks = catalog.len(), "Loaded week catalog");
        Ok(Self { config, catalog })
    }

    fn base_url(&self) -> Result<reqwest::Url> {
        let raw = self.config.site.base_url.as_deref().ok_or_else(|| {
            anyhow!(
                "no base URL: pass --base-url, set {}, or add site.base_url to the config",
                constants::BASE_URL_ENV
            )
        })?;
        Ok(site_root(raw)?)
    }

    fn http(&self) -> Result<Arc<ReqwestHttp>> {
        let timeout = self.config.site.timeout_seconds.map(Duration::from_secs);
        Ok(Arc::new(ReqwestHttp::new(timeout)?))
    }

    fn widget(self) -> Result<(WeekDropdown, String)> {
        let base_url = self.base_url()?;
        let http = self.http()?;
        let control_name = self.config.site.control_name.clone();
        let widget = WeekDropdown::new(self.catalog, http, base_url)
            .with_control_name(control_name.clone());
        Ok((widget, control_name))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(&cli.log_dir);

    let session = Session::load(&cli)?;

    match &cli.command {
        Commands::Weeks => {
            for entry in session.catalog.iter() {
                let seeded = if entry.exists { "*" } else { " " };
                println!(" {} {:<28} {}", seeded, entry.identifier, entry.label);
            }
        }
        Commands::Probe => {
            let base_url = session.base_url()?;
            let http = session.http()?;
            let mut catalog = session.catalog;
            let summary = prober::probe_all(&mut catalog, http, &base_url).await;
            println!(
                "{} of {} week pages exist under {}",
                summary.existing, summary.checked, base_url
            );
            print_control(&presenter::render(&catalog, &session.config.site.control_name));
        }
        Commands::Resolve { current, json } => {
            let (mut widget, control_name) = session.widget()?;
            let env = HeadlessEnvironment::new(current.clone(), control_name);
            let state = widget.run(&env).await;
            let redirect = env.last_navigation();

            if *json {
                let selected = widget
                    .control()
                    .and_then(|c| c.selected_value())
                    .map(str::to_string);
                let report = json!({
                    "current": current,
                    "redirecting": state == PageState::Resolved(Settlement::Redirecting),
                    "selected": selected,
                    "redirect_to": redirect,
                    "control": widget.control(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if let Some(url) = redirect {
                println!("{} -> redirect to {}", current, url);
            } else if let Some(control) = widget.control() {
                print_control(control);
            }
        }
        Commands::Select { identifier, current } => {
            let (mut widget, control_name) = session.widget()?;
            let env = HeadlessEnvironment::new(current.clone(), control_name);
            let state = widget.run(&env).await;
            if let Some(url) = env.last_navigation() {
                println!("{} -> redirect to {} before any selection", current, url);
                return Ok(());
            }
            let url = widget
                .handle_change(identifier, &env)
                .with_context(|| format!("no navigation for '{}' (state {:?})", identifier, state))?;
            info!(identifier = %identifier, url = %url, "Selection handled");
            println!("{} -> {}", identifier, url);
        }
    }
    Ok(())
}
