mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vartab_core::tsv::{self, MODIFIED_FILENAME, TEMPLATE_FILENAME};
use vartab_core::{Session, SortColumn, ViewOptions, table};

#[derive(Parser)]
#[command(name = "vartab", version, about = "Review and edit ACMG evidence in variant TSV files")]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the variant table with ACMG badges.
    Show {
        /// TSV file to load; the built-in sample when omitted.
        file: Option<PathBuf>,
        /// Keep genes containing this text (case-insensitive).
        #[arg(long)]
        gene: Option<String>,
        /// Sort column: gene, hgvsc, hgvsp, consequence, classification, position.
        #[arg(long)]
        sort: Option<SortColumn>,
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Show every column instead of the summary.
        #[arg(long)]
        full: bool,
    },
    /// Print one variant and all of its evidence criteria.
    Card {
        file: Option<PathBuf>,
        #[arg(long)]
        hgvsc: String,
        /// Print the record as JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// Change one evidence criterion of one variant and export the result.
    #[command(group(
        ArgGroup::new("change")
            .required(true)
            .multiple(true)
            .args(["score", "note", "remove"]),
    ))]
    Edit {
        file: PathBuf,
        #[arg(long)]
        hgvsc: String,
        /// Criterion code, e.g. pm2 or bp6.
        #[arg(long)]
        code: String,
        #[arg(long)]
        score: Option<u8>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long, conflicts_with_all = ["score", "note"])]
        remove: bool,
        #[arg(short, long, default_value = MODIFIED_FILENAME)]
        output: PathBuf,
    },
    /// Write the built-in sample as a starting TSV file.
    Template {
        #[arg(short, long, default_value = TEMPLATE_FILENAME)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("vartab v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Show {
            file,
            gene,
            sort,
            desc,
            full,
        } => cmd_show(
            file.as_deref(),
            &ViewOptions {
                gene,
                sort,
                descending: desc,
            },
            full,
        ),
        Command::Card { file, hgvsc, json } => cmd_card(file.as_deref(), &hgvsc, json),
        Command::Edit {
            file,
            hgvsc,
            code,
            score,
            note,
            remove,
            output,
        } => {
            let edit = EvidenceEdit {
                code,
                score,
                note,
                remove,
            };
            cmd_edit(&file, &hgvsc, edit, &output)
        }
        Command::Template { output } => cmd_template(&output),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── File acquisition / delivery ──

/// Load a session from a TSV file, or the built-in sample when no file is given.
fn load_session(file: Option<&Path>) -> anyhow::Result<Session> {
    let mut session = Session::new();
    if let Some(path) = file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        // Files saved as UTF-8 with BOM.
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        session
            .load(text)
            .with_context(|| format!("parsing {}", path.display()))?;
    }
    Ok(session)
}

fn write_tsv(path: &Path, text: &str, rows: usize) -> anyhow::Result<()> {
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    eprintln!("  Wrote {rows} variant(s) to {}", path.display());
    Ok(())
}

// ── Commands ──

fn cmd_show(file: Option<&Path>, opts: &ViewOptions, full: bool) -> anyhow::Result<()> {
    let session = load_session(file)?;
    let rows = session.view(opts);
    let batch = if full {
        table::to_record_batch(rows.iter().copied())?
    } else {
        table::to_summary_batch(rows.iter().copied())?
    };
    println!("{}", arrow::util::pretty::pretty_format_batches(&[batch])?);
    println!("{} of {} variant(s)", rows.len(), session.variants().len());
    Ok(())
}

fn cmd_card(file: Option<&Path>, hgvsc: &str, json: bool) -> anyhow::Result<()> {
    let session = load_session(file)?;
    let variant = session
        .variants()
        .find(hgvsc)
        .with_context(|| format!("no variant with hgvsc '{hgvsc}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(variant)?);
        return Ok(());
    }

    let batch = table::to_record_batch([variant])?;
    display::print_variant_card(&batch)?;
    display::print_evidence(&variant.rationale);
    Ok(())
}

/// One criterion change requested on the command line.
struct EvidenceEdit {
    code: String,
    score: Option<u8>,
    note: Option<String>,
    remove: bool,
}

fn cmd_edit(file: &Path, hgvsc: &str, edit: EvidenceEdit, output: &Path) -> anyhow::Result<()> {
    let mut session = load_session(Some(file))?;

    let EvidenceEdit {
        code,
        score,
        note,
        remove,
    } = edit;
    let saved = session
        .edit_evidence(hgvsc, |ev| {
            if remove {
                ev.remove(&code)?;
                return Ok(());
            }
            if let Some(score) = score {
                ev.set_score(&code, score)?;
            }
            if let Some(note) = note {
                ev.set_note(&code, note)?;
            }
            Ok(())
        })
        .with_context(|| format!("editing {code} on {hgvsc}"))?;

    if !saved {
        eprintln!("  No variant with hgvsc '{hgvsc}'; exporting unchanged");
    }
    write_tsv(output, &session.export(), session.variants().len())
}

fn cmd_template(output: &Path) -> anyhow::Result<()> {
    let rows = vartab_core::sample_variants().len();
    write_tsv(output, &tsv::encode_template(), rows)
}
