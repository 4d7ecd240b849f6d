//! CLI entrypoint for gnsearch
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use gnsearch_application::{
    AgentProgressNotifier, AnswerQueryUseCase, HybridSearch, LlmGateway, NoAgentProgress,
    Retriever, SchemaTranslator, SearchConfig, SearchUseCase,
};
use gnsearch_domain::SchemaVocabulary;
use gnsearch_infrastructure::{
    Bm25Index, ConfigLoader, CorpusCache, FileConfig, JsonlConversationLogger, NcbiToolProvider,
    OpenAiEmbedder, OpenAiGateway, SparqlToolProvider, ToolRegistry, TtlSchemaSource, VectorIndex,
};
use gnsearch_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let _log_guard = init_logging(&cli);

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .context("Failed to load configuration")?;
    let config = Arc::new(file_config.to_search_config()?);

    colored::control::set_override(file_config.output.use_color(std::io::stdout().is_terminal()));

    let format = file_config.output.resolve_format(cli.output.map(Into::into));

    let Some(command) = cli.command.clone() else {
        bail!("No command given. Try `gnsearch ask \"<question>\"` or `gnsearch --help`.");
    };

    info!("Starting gnsearch");

    let query = match &command {
        Command::Schema => {
            let vocabulary = load_vocabulary(&file_config)?;
            println!("{}", ConsoleFormatter.render_schema(&vocabulary, format));
            return Ok(());
        }
        Command::Ask { query } | Command::Search { query } => query.clone(),
    };

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, cancelling...");
            ctrl_c_token.cancel();
        }
    });

    // === Dependency Injection ===
    let gateway: Arc<dyn LlmGateway> = Arc::new(OpenAiGateway::new(&file_config.llm)?);
    let (lexical, semantic) = build_retrievers(&file_config).await?;

    let progress = progress_notifier(&cli, &file_config);

    if matches!(command, Command::Ask { .. }) {
        let tools = build_tools(&file_config, gateway.clone(), &config, &cancellation).await?;
        let mut use_case =
            AnswerQueryUseCase::new(gateway, lexical, semantic, Arc::new(tools), config)
                .with_cancellation(cancellation);
        if let Some(path) = &cli.conversation_log
            && let Some(logger) = JsonlConversationLogger::try_open(path)
        {
            info!("Conversation log: {}", logger.path().display());
            use_case = use_case.with_conversation_logger(Arc::new(logger));
        }

        let answer = use_case.answer(&query, progress.as_ref()).await?;
        println!("{}", ConsoleFormatter.render_answer(&answer, format));
    } else {
        let search = HybridSearch::new(lexical, semantic, config.clone());
        let use_case = SearchUseCase::new(gateway, search, config).with_cancellation(cancellation);

        let output = use_case.search(&query, progress.as_ref()).await?;
        println!("{}", ConsoleFormatter.render_search(&output, format));
    }

    Ok(())
}

/// Console logging by verbosity, plus daily rolling files with `--log-dir`.
///
/// `RUST_LOG` takes precedence over `-v` when set.
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "gnsearch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .init();
            None
        }
    }
}

fn progress_notifier(cli: &Cli, config: &FileConfig) -> Box<dyn AgentProgressNotifier> {
    if !config.output.wants_progress(cli.quiet) {
        Box::new(NoAgentProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    }
}

fn load_vocabulary(config: &FileConfig) -> Result<SchemaVocabulary> {
    let source = TtlSchemaSource::new(&config.schema.ttl_path);
    SchemaTranslator::extract_schema(&source).context("Failed to read schema files")
}

async fn build_retrievers(
    config: &FileConfig,
) -> Result<(Arc<dyn Retriever>, Arc<dyn Retriever>)> {
    let corpus = CorpusCache::load_or_build(&config.corpus.corpus_path, &config.corpus.pcorpus_path)?;
    info!(documents = corpus.len(), "Corpus loaded");
    let documents = corpus.into_documents();

    let embedder = Arc::new(OpenAiEmbedder::new(config)?);
    let semantic = VectorIndex::build(documents.clone(), embedder).await?;
    let lexical = Bm25Index::new(documents);

    Ok((Arc::new(lexical), Arc::new(semantic)))
}

/// NCBI tools always; SPARQL only when a schema vocabulary is available.
async fn build_tools(
    config: &FileConfig,
    gateway: Arc<dyn LlmGateway>,
    search_config: &Arc<SearchConfig>,
    cancellation: &CancellationToken,
) -> Result<ToolRegistry> {
    let vocabulary = match load_vocabulary(config) {
        Ok(vocabulary) => vocabulary,
        Err(e) => {
            warn!("{:#}; SPARQL tool disabled", e);
            SchemaVocabulary::new()
        }
    };
    let translator = Arc::new(SchemaTranslator::new(
        gateway,
        vocabulary,
        search_config.clone(),
    ));

    let mut registry = ToolRegistry::new()
        .register(NcbiToolProvider::new(&config.tools)?)
        .register(
            SparqlToolProvider::new(&config.tools, translator)?
                .with_cancellation(cancellation.clone()),
        );
    for (alias, canonical) in &config.tools.aliases {
        registry = registry.with_alias(alias, canonical);
    }
    registry.discover().await;

    let stats = registry.stats();
    info!(
        providers = stats.total_providers,
        tools = stats.total_tools,
        "Tool registry ready"
    );
    Ok(registry)
}
