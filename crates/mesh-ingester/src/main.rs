//! mt-ingester: MeSH XML and UMLS RRF ingester.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use mesh_ingester::config::CONFIG_ENV;
use mesh_ingester::ingest::{
    DefinitionIngester, DescriptorIngester, QualifierIngester, SupplementalIngester,
    SynonymIngester,
};
use mesh_ingester::{ingest_file, IngestOptions, IngesterConfig, Pipeline, SqliteStore};
use mesh_loader::{parse_conso_parallel, parse_def_with_map, parse_sat, DefinitionFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MeSH XML dump parser and SQL ingester.
#[derive(Parser, Debug)]
#[command(name = "mt-ingester")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON configuration file
    #[arg(long, env = CONFIG_ENV, global = true)]
    config_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest MeSH XML files of one record family
    Mesh {
        /// Record family held by the files
        #[arg(long, value_enum)]
        mode: Mode,

        /// Resolve links to other records
        #[arg(long, overrides_with = "no_do_ingest_links")]
        do_ingest_links: bool,

        /// Store records without links
        #[arg(long)]
        no_do_ingest_links: bool,

        /// MeSH XML files to ingest (.xml or .xml.gz)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Ingest a whole release in a records pass followed by a links pass
    Pipeline {
        /// Release directory holding qual*, desc* and supp* files
        #[arg(long)]
        release_dir: Option<PathBuf>,

        /// Qualifier files
        #[arg(long)]
        qualifiers: Vec<PathBuf>,

        /// Descriptor files
        #[arg(long)]
        descriptors: Vec<PathBuf>,

        /// Supplemental record files
        #[arg(long)]
        supplementals: Vec<PathBuf>,
    },

    /// Ingest UMLS synonyms from MRCONSO
    UmlsSynonyms {
        /// MRSAT.RRF file mapping CUIs to MeSH UIs
        #[arg(long)]
        mrsat: PathBuf,

        /// MRCONSO.RRF file
        #[arg(long)]
        mrconso: PathBuf,
    },

    /// Ingest UMLS definitions from MRDEF
    UmlsDefinitions {
        /// MRSAT.RRF file mapping CUIs to MeSH UIs
        #[arg(long)]
        mrsat: PathBuf,

        /// MRDEF.RRF file
        #[arg(long)]
        mrdef: PathBuf,

        /// Only keep definitions from this source (repeatable)
        #[arg(long = "include-source")]
        include_sources: Vec<String>,

        /// Drop definitions from this source (repeatable)
        #[arg(long = "exclude-source")]
        exclude_sources: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Descriptors,
    Qualifiers,
    Supplementals,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Configuration errors are fatal before anything is opened
    let config = IngesterConfig::load(cli.config_file.as_deref())?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .init();

    let mut store = SqliteStore::open(&config.database.path)?;

    match cli.command {
        Command::Mesh {
            mode,
            do_ingest_links,
            no_do_ingest_links: _,
            files,
        } => {
            let options = IngestOptions {
                ingest_links: do_ingest_links,
            };
            tracing::info!("Ingesting {:?} with {:?}", mode, options);

            let mut total = 0;
            for path in &files {
                total += ingest_mesh_file(&mut store, mode, options, path)?;
            }
            tracing::info!("Stored {} records from {} files", total, files.len());
        }
        Command::Pipeline {
            release_dir,
            qualifiers,
            descriptors,
            supplementals,
        } => {
            let mut pipeline = match release_dir {
                Some(dir) => Pipeline::discover(dir)?,
                None => Pipeline::new(),
            };
            pipeline = qualifiers.into_iter().fold(pipeline, Pipeline::qualifiers);
            pipeline = descriptors.into_iter().fold(pipeline, Pipeline::descriptors);
            pipeline = supplementals.into_iter().fold(pipeline, Pipeline::supplementals);

            if pipeline.is_empty() {
                tracing::warn!("No MeSH files to ingest");
                return Ok(());
            }

            let stats = pipeline.run(&mut store)?;
            tracing::info!(
                "Stored {} records from {} files; links pass covered {} records",
                stats.records_pass.records,
                stats.records_pass.files,
                stats.links_pass.records
            );
        }
        Command::UmlsSynonyms { mrsat, mrconso } => {
            let cui_ui = parse_sat(&mrsat)?;
            let synonyms = parse_conso_parallel(&mrconso, &cui_ui)?;
            SynonymIngester::new(&mut store).ingest(&synonyms)?;
        }
        Command::UmlsDefinitions {
            mrsat,
            mrdef,
            include_sources,
            exclude_sources,
        } => {
            let filter = DefinitionFilter {
                include: include_sources,
                exclude: exclude_sources,
            };
            let cui_ui = parse_sat(&mrsat)?;
            let definitions = parse_def_with_map(&mrdef, &cui_ui, &filter)?;
            DefinitionIngester::new(&mut store).ingest(&definitions)?;
        }
    }

    Ok(())
}

fn ingest_mesh_file(
    store: &mut SqliteStore,
    mode: Mode,
    options: IngestOptions,
    path: &Path,
) -> mesh_ingester::IngestResult<usize> {
    match mode {
        Mode::Descriptors => ingest_file(&mut DescriptorIngester::new(store, options), path),
        Mode::Qualifiers => ingest_file(&mut QualifierIngester::new(store, options), path),
        Mode::Supplementals => ingest_file(&mut SupplementalIngester::new(store, options), path),
    }
}
