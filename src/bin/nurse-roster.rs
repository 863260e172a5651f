#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use nurse_roster::{
    client::{HttpScheduleClient, DEFAULT_CLIENT_TIMEOUT},
    config::{ProxyConfig, DEFAULT_BIND},
    export::{
        export_csv, export_image, export_spreadsheet, table_nurse_names, DirectorySink,
        ImageStyle, ScheduleGrid, SpreadsheetExport,
    },
    form::{FormPhase, RosterForm},
    io,
    proxy::{self, AppState},
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::TcpListener;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Générateur de planning infirmier : proxy, saisie d'équipe et exports
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Xlsx,
    Png,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lancer le proxy HTTP (`/api/schedule`, `/api/health-check`)
    Serve {
        /// URL du service de planification externe
        #[arg(long, env = "NURSE_ROSTER_EXTERNAL_URL")]
        external_url: String,
        #[arg(long, env = "NURSE_ROSTER_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,
        #[arg(long, default_value_t = 30)]
        schedule_timeout_secs: u64,
        #[arg(long, default_value_t = 10)]
        health_timeout_secs: u64,
    },

    /// Interroger la sonde de santé du proxy
    Health {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        proxy: String,
    },

    /// Saisir une équipe depuis un CSV, demander le planning et l'exporter
    Generate {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        proxy: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
        /// CSV `name,position[,off]`
        #[arg(long)]
        nurses: PathBuf,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        #[arg(long, default_value_t = DEFAULT_CLIENT_TIMEOUT.as_secs())]
        timeout_secs: u64,
        /// Police TTF/OTF pour les noms dans le PNG
        #[arg(long, env = "NURSE_ROSTER_FONT")]
        font: Option<PathBuf>,
    },

    /// Exporter une réponse du service déjà enregistrée (JSON)
    Export {
        #[arg(long)]
        response: PathBuf,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Noms de secours "nom1,nom2" si le premier jour est vide
        #[arg(long)]
        names: Option<String>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
        #[arg(long, env = "NURSE_ROSTER_FONT")]
        font: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Serve {
            external_url,
            bind,
            schedule_timeout_secs,
            health_timeout_secs,
        } => {
            let config = ProxyConfig::new(&external_url)?
                .with_bind(bind)
                .with_schedule_timeout(Duration::from_secs(schedule_timeout_secs))?
                .with_health_timeout(Duration::from_secs(health_timeout_secs))?;
            let listener = TcpListener::bind(config.bind)
                .await
                .with_context(|| format!("binding {}", config.bind))?;
            println!("nurse-roster proxy listening on {}", listener.local_addr()?);
            let state = AppState::new(config)?;
            proxy::serve(listener, state).await?;
            0
        }
        Commands::Health { proxy } => {
            let client = HttpScheduleClient::new(&proxy, DEFAULT_CLIENT_TIMEOUT)?;
            let report = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.is_reachable() {
                0
            } else {
                2
            }
        }
        Commands::Generate {
            proxy,
            start,
            end,
            nurses,
            out,
            format,
            timeout_secs,
            font,
        } => {
            let mut form = fill_form(start, end, &nurses)?;
            let client = HttpScheduleClient::new(&proxy, Duration::from_secs(timeout_secs))?;
            form.submit(&client).await;
            match form.phase() {
                FormPhase::DisplayingResult(_) => {
                    let grid = ScheduleGrid::from_form(&form).context("no schedule to display")?;
                    write_output(&grid, format, &out, font.as_deref())?;
                    0
                }
                FormPhase::ShowingError(message) => {
                    eprintln!("오류 발생: {message}");
                    // Code 2 = WARNING/INCOMPLETE
                    2
                }
                other => bail!("unexpected form state after submit: {other:?}"),
            }
        }
        Commands::Export {
            response,
            start,
            end,
            names,
            out,
            format,
            font,
        } => {
            if end < start {
                bail!("end date must not be before start date");
            }
            let response = io::load_response_json(response)?;
            let fallback: Vec<String> = names
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            let rows = table_nurse_names(&response, &fallback);
            let grid = ScheduleGrid::new(&response, rows, start, end);
            write_output(&grid, format, &out, font.as_deref())?;
            0
        }
    };

    std::process::exit(code);
}

/// Rejoue la saisie du formulaire à partir du CSV d'équipe.
fn fill_form(start: NaiveDate, end: NaiveDate, nurses: &Path) -> Result<RosterForm> {
    let staff = io::import_nurses_csv(nurses)?;
    let mut form = RosterForm::new();
    if !form.set_range(start, end) {
        bail!("invalid schedule range {start} → {end}");
    }
    for row in staff {
        form.set_name(row.name.as_str());
        form.select_position(row.position);
        for day in &row.off_dates {
            if form.draft().off_dates.contains(day) {
                continue;
            }
            if !form.toggle_off_date(*day) {
                bail!("off day {day} for {} is outside the schedule range", row.name);
            }
        }
        if form.add_nurse().is_none() {
            bail!("could not add nurse {}", row.name);
        }
    }
    Ok(form)
}

fn write_output(
    grid: &ScheduleGrid<'_>,
    format: OutputFormat,
    out: &Path,
    font: Option<&Path>,
) -> Result<()> {
    let mut sink = DirectorySink::open(out)?;
    let filename = match format {
        OutputFormat::Text => {
            print!("{}", grid.render_text());
            return Ok(());
        }
        OutputFormat::Csv => export_csv(grid, &mut sink)?,
        OutputFormat::Png => {
            let style = match font {
                Some(path) => ImageStyle::from_font_file(path)
                    .with_context(|| format!("loading font {}", path.display()))?,
                None => ImageStyle::default(),
            };
            let written = export_image(grid, &style, &mut sink)?;
            if let Some(legend) = written.legend {
                println!("{}", sink.path_for(&legend).display());
            }
            written.filename
        }
        OutputFormat::Xlsx => match export_spreadsheet(grid, &mut sink)? {
            SpreadsheetExport::Written { filename } => filename,
            SpreadsheetExport::CsvFallback { filename, notice } => {
                eprintln!("{notice}");
                filename
            }
        },
    };
    println!("{}", sink.path_for(&filename).display());
    Ok(())
}
