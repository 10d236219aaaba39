//! churnguard-report: headless view-model runner for the ChurnGuard dashboard.
//!
//! Usage:
//!   churnguard-report --data-dir ./data --page dashboard
//!   churnguard-report --data-dir ./data --page customers --search acme --risk high
//!   churnguard-report --data-dir ./data --page customerDetail --customer 42
//!   churnguard-report --data-dir ./data --db snapshot.db --import
//!   churnguard-report --db snapshot.db --ipc-mode
//!
//! Customers, alerts, the optional trend and risk momentum are read from
//! `<data-dir>/customers.json`, `alerts.json`, `trend.json` and
//! `risk_momentum.json`, or from a SQLite snapshot when `--db` is given.
//! `--import` requires `--db`.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use churnguard_core::{
    cache::CustomerCache,
    config::DashboardConfig,
    dashboard::Dashboard,
    filter::{CustomerFilter, RiskFilter},
    session::{Navigator, Page, Session},
    source::{DataSource, JsonDirSource},
    store::SnapshotStore,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Login {
        user_name:  String,
        user_email: String,
        #[serde(default)]
        token:      String,
    },
    Logout,
    Show {
        page: String,
        #[serde(default)]
        search: String,
        #[serde(default)]
        risk: String,
        #[serde(default)]
        customer_id: Option<String>,
    },
    Quit,
}

struct PageRequest<'a> {
    page:        Page,
    filter:      CustomerFilter,
    customer_id: Option<&'a str>,
    today:       NaiveDate,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let import = args.iter().any(|a| a == "--import");
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let db = arg_value(&args, "--db");
    let page: Page = arg_value(&args, "--page").unwrap_or("dashboard").parse()?;
    let search = arg_value(&args, "--search").unwrap_or("");
    let risk: RiskFilter = arg_value(&args, "--risk").unwrap_or("all").parse()?;
    let customer_id = arg_value(&args, "--customer");
    let today = match arg_value(&args, "--today") {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("--today {d}: {e}"))?,
        None => Utc::now().date_naive(),
    };

    check_import_flags(import, db)?;

    let config = DashboardConfig::load_or_default(data_dir)?;

    let request = PageRequest {
        page,
        filter: CustomerFilter::new(search, risk),
        customer_id,
        today,
    };

    match db {
        Some(path) => {
            let store = SnapshotStore::open(path)?;
            store.migrate()?;
            if import {
                import_snapshot(&store, data_dir)?;
                if !ipc_mode {
                    println!("imported {data_dir} into {path}");
                    return Ok(());
                }
            }
            run(Dashboard::new(store, config), ipc_mode, &request)
        }
        None => run(Dashboard::new(JsonDirSource::new(data_dir), config), ipc_mode, &request),
    }
}

fn run<S: DataSource>(dashboard: Dashboard<S>, ipc_mode: bool, request: &PageRequest) -> Result<()> {
    if ipc_mode {
        run_ipc_loop(&dashboard, request.today)
    } else {
        let value = render_page(&dashboard, &mut CustomerCache::new(), request)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    }
}

/// Copy the JSON directory into the snapshot database, replacing
/// whatever was there.
fn import_snapshot(store: &SnapshotStore, data_dir: &str) -> Result<()> {
    let json = JsonDirSource::new(data_dir);
    store.replace_customers(&json.customers()?)?;
    store.replace_alerts(&json.alerts()?)?;
    store.replace_trend(&json.churn_trend()?)?;
    store.replace_momentum(&json.risk_momentum()?)?;
    log::info!(
        "import: {} customers, {} alerts",
        store.row_count("customer_snapshot")?,
        store.row_count("alert_snapshot")?,
    );
    Ok(())
}

fn render_page<S: DataSource>(
    dashboard: &Dashboard<S>,
    cache: &mut CustomerCache,
    request: &PageRequest,
) -> Result<serde_json::Value> {
    let value = match request.page {
        Page::Login => serde_json::json!({ "page": "login" }),
        Page::Dashboard => serde_json::to_value(dashboard.dashboard_view())?,
        Page::Customers => {
            let customers = cache.get_or_load(dashboard.source()).to_vec();
            serde_json::to_value(dashboard.customers_view_from(&customers, &request.filter, request.today))?
        }
        Page::CustomerDetail => {
            let id = request
                .customer_id
                .ok_or_else(|| anyhow::anyhow!("customerDetail needs a customer id"))?;
            serde_json::to_value(dashboard.customer_detail(id, request.today)?)?
        }
        Page::Analytics => serde_json::to_value(dashboard.analytics_view())?,
    };
    Ok(value)
}

fn run_ipc_loop<S: DataSource>(dashboard: &Dashboard<S>, today: NaiveDate) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut navigator = Navigator::new();
    let mut cache = CustomerCache::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Login { user_name, user_email, token } => {
                let page = navigator.login(Session { user_name, user_email, token }, &mut cache);
                let request = PageRequest {
                    page,
                    filter: CustomerFilter::default(),
                    customer_id: None,
                    today,
                };
                render_page(dashboard, &mut cache, &request)
            }
            IpcCommand::Logout => {
                navigator.logout(&mut cache);
                Ok(serde_json::json!({ "page": "login" }))
            }
            IpcCommand::Show { page, search, risk, customer_id } => {
                match page.parse::<Page>().and_then(|p| navigator.navigate(p)) {
                    Ok(page) => {
                        let request = PageRequest {
                            page,
                            filter: CustomerFilter::new(search, risk.parse()?),
                            customer_id: customer_id.as_deref(),
                            today,
                        };
                        render_page(dashboard, &mut cache, &request)
                    }
                    Err(e) => Err(anyhow::Error::from(e)),
                }
            }
        };

        match reply {
            Ok(value) => writeln!(stdout, "{value}")?,
            Err(e) => writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?,
        }
        stdout.flush()?;
    }
    Ok(())
}

/// `--import` writes into a snapshot database, so it is meaningless
/// without one.
fn check_import_flags(import: bool, db: Option<&str>) -> Result<()> {
    if import && db.is_none() {
        anyhow::bail!("--import needs --db <path> to import into");
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
