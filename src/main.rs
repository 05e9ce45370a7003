use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use po_grid::config::{default_config_path, load_config, save_config, to_index};
use po_grid::inspect::{
    column_report, dump_rows, header_listing, probe_preamble, render_preamble,
    render_records_json, render_records_text, sheet_summary,
};
use po_grid::{header_candidates, Grid, HeaderLayout, MapperConfig, Record};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "po-grid")]
#[command(about = "Find the header row of a spreadsheet export and map its rows by label", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/po-grid/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SheetArgs {
    /// Spreadsheet file (.xlsx, .xls, .xlsb, .ods)
    file: PathBuf,

    /// Sheet name (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,
}

#[derive(Args)]
struct HeaderArgs {
    /// Header label fragment; repeat to give several
    #[arg(long = "label", value_name = "TEXT")]
    labels: Vec<String>,

    /// Rows searched from the top
    #[arg(long)]
    search_limit: Option<usize>,

    /// Use this 1-based row as the header instead of searching
    #[arg(long)]
    header_row: Option<usize>,

    /// 1-based row used when the search finds nothing
    #[arg(long)]
    fallback_row: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print sheet size, the first rows, and every row that could be the header
    Inspect {
        #[command(flatten)]
        sheet: SheetArgs,
        /// Rows to print
        #[arg(long)]
        rows: Option<usize>,
        /// Columns per row
        #[arg(long)]
        cols: Option<usize>,
        /// Characters kept per value
        #[arg(long)]
        truncate: Option<usize>,
    },

    /// Locate the header row and print its labels
    Header {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        header: HeaderArgs,
    },

    /// Map data rows through the header
    Records {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        header: HeaderArgs,
        /// First 1-based data row (default: below the header)
        #[arg(long)]
        start: Option<usize>,
        /// Last 1-based data row, inclusive (default: last row)
        #[arg(long)]
        end: Option<usize>,
        /// Leave out rows where every field is empty
        #[arg(long)]
        skip_empty: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show header text next to each value of one data row
    Columns {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        header: HeaderArgs,
        /// 1-based data row (default: the row below the header)
        #[arg(long)]
        data_row: Option<usize>,
    },

    /// Read the label/value probes configured for the block above the header
    Preamble {
        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// Print the effective config, optionally saving it
    Config {
        /// Write it to the config path
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref()).context("loading config")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Inspect {
            sheet,
            rows,
            cols,
            truncate,
        } => {
            apply_sheet(&mut config, &sheet);
            config.dump_rows = rows.unwrap_or(config.dump_rows);
            config.dump_cols = cols.unwrap_or(config.dump_cols);
            config.truncate = truncate.unwrap_or(config.truncate);

            let grid = open_grid(&sheet, &config)?;
            sheet_summary(&mut out, &grid)?;
            writeln!(out, "\nFirst {} rows:", config.dump_rows)?;
            dump_rows(
                &mut out,
                &grid,
                config.dump_rows,
                config.dump_cols,
                config.truncate,
            )?;

            writeln!(out, "\nLooking for header row with {:?}...", config.header_labels)?;
            let candidates =
                header_candidates(&grid, &config.header_labels, config.search_limit);
            if candidates.is_empty() {
                writeln!(out, "No header found in the first {} rows", config.search_limit)?;
            }
            for row in candidates {
                let labels: Vec<String> = grid.row(row).filter_map(|c| c.text()).collect();
                writeln!(out, "Found potential header at row {}: {:?}", row + 1, labels)?;
            }
            if let Some(row) = config.header_row {
                writeln!(out, "Configured header row: {}", row)?;
            }
        }

        Commands::Header { sheet, header } => {
            apply_sheet(&mut config, &sheet);
            apply_header(&mut config, &header)?;
            let grid = open_grid(&sheet, &config)?;
            let layout = HeaderLayout::resolve(&grid, &config.header_options())?;
            header_listing(&mut out, &grid, &layout)?;
        }

        Commands::Records {
            sheet,
            header,
            start,
            end,
            skip_empty,
            json,
        } => {
            apply_sheet(&mut config, &sheet);
            apply_header(&mut config, &header)?;
            config.data_start = start.or(config.data_start);
            config.data_end = end.or(config.data_end);
            config.validate()?;

            let grid = open_grid(&sheet, &config)?;
            let layout = HeaderLayout::resolve(&grid, &config.header_options())?;
            let (start, end) = config.data_rows();
            let records: Vec<Record> = layout
                .records(&grid, start, end)
                .filter(|r| !(skip_empty && r.is_empty()))
                .collect();
            info!(count = records.len(), "records projected");

            if json {
                render_records_json(&mut out, &records)?;
            } else {
                render_records_text(&mut out, &records)?;
            }
        }

        Commands::Columns {
            sheet,
            header,
            data_row,
        } => {
            apply_sheet(&mut config, &sheet);
            apply_header(&mut config, &header)?;
            let grid = open_grid(&sheet, &config)?;
            let layout = HeaderLayout::resolve(&grid, &config.header_options())?;
            let data_row = match data_row {
                Some(row) => to_index(row).context("--data-row is 1-based")?,
                None => layout.first_data_row(),
            };
            column_report(&mut out, &grid, layout.row, data_row)?;
        }

        Commands::Preamble { sheet } => {
            apply_sheet(&mut config, &sheet);
            if config.preamble.is_empty() {
                writeln!(out, "No preamble probes configured")?;
                return Ok(());
            }
            let grid = open_grid(&sheet, &config)?;
            let values = probe_preamble(&grid, &config.preamble, config.search_limit);
            render_preamble(&mut out, &values)?;
        }

        Commands::Config { save } => {
            serde_json::to_writer_pretty(&mut out, &config)?;
            writeln!(out)?;
            if save {
                let path = cli.config.unwrap_or_else(default_config_path);
                save_config(&config, &path)?;
                writeln!(out, "Saved to {}", path.display())?;
            }
        }
    }

    Ok(())
}

fn apply_sheet(config: &mut MapperConfig, args: &SheetArgs) {
    if args.sheet.is_some() {
        config.sheet = args.sheet.clone();
    }
}

fn apply_header(config: &mut MapperConfig, args: &HeaderArgs) -> Result<()> {
    if !args.labels.is_empty() {
        config.header_labels = args.labels.clone();
    }
    config.search_limit = args.search_limit.unwrap_or(config.search_limit);
    config.header_row = args.header_row.or(config.header_row);
    config.fallback_header_row = args.fallback_row.or(config.fallback_header_row);
    config.validate()?;
    Ok(())
}

fn open_grid(args: &SheetArgs, config: &MapperConfig) -> Result<Grid> {
    Grid::open(&args.file, config.sheet.as_deref())
        .with_context(|| format!("opening {}", args.file.display()))
}
