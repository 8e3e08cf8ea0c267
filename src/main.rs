use async_openai::Client as OpenAiClient;
use audiobook_weaver::controllers::{health::HealthState, job::JobController};
use audiobook_weaver::domain::document::{DocumentTextExtractor, SentenceSplitter};
use audiobook_weaver::domain::pipeline::PipelineService;
use audiobook_weaver::domain::synthesis::{ChunkDispatcher, SynthesisWorker};
use audiobook_weaver::infrastructure::config::{Config, LogFormat, TtsEngine};
use audiobook_weaver::infrastructure::http::{create_router, start_http_server};
use audiobook_weaver::infrastructure::repositories::{
    CachedTtsRepository, JobRepository, OpenAiTtsRepository, PollyTtsRepository, TtsRepository,
};
use audiobook_weaver::infrastructure::storage::{AudioStorage, FileAudioAssembler};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Audiobook Weaver on {}:{}",
        config.host,
        config.port
    );

    // TTS provider
    let tts_repo = create_tts_repository(&config).await;
    let tts_repo: Arc<dyn TtsRepository> = if config.tts_cache_enabled {
        tracing::info!("TTS cache enabled");
        Arc::new(CachedTtsRepository::new(tts_repo))
    } else {
        tts_repo
    };

    // Audio output directory
    let storage = Arc::new(AudioStorage::new(
        config.output_dir.clone(),
        config.audio_retention(),
    ));
    storage.ensure_dir().await?;
    tracing::info!(output_dir = %storage.output_dir().display(), "Audio storage ready");

    let max_chars = config.effective_chunk_max_chars();

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    let job_repo = Arc::new(JobRepository::new());

    // 2. Instantiate pipeline stages
    let extractor = Arc::new(DocumentTextExtractor::new());
    let splitter = Arc::new(SentenceSplitter::new(config.chunk_max_sentences, max_chars));
    let worker = SynthesisWorker::new(tts_repo, config.synthesis_timeout());
    let dispatcher = ChunkDispatcher::new(worker, config.synthesis_concurrency);
    let assembler = Arc::new(FileAudioAssembler::new(storage.clone()));

    tracing::info!(
        concurrency = dispatcher.concurrency(),
        timeout_secs = config.synthesis_timeout_secs,
        max_sentences = config.chunk_max_sentences,
        max_chars = max_chars,
        "Synthesis pipeline configured"
    );

    // 3. Instantiate services
    let pipeline_service = Arc::new(PipelineService::new(
        job_repo.clone(),
        extractor,
        splitter,
        dispatcher,
        assembler,
    ));

    // 4. Instantiate controllers
    let health_state = Arc::new(HealthState {
        job_repo,
        pipeline_service: pipeline_service.clone(),
    });
    let job_controller = Arc::new(JobController::new(pipeline_service, storage));

    let app = create_router(health_state, job_controller, config.max_upload_bytes);

    start_http_server(config, app).await?;

    Ok(())
}

async fn create_tts_repository(config: &Config) -> Arc<dyn TtsRepository> {
    match config.tts_engine {
        TtsEngine::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;

            let polly_client = aws_sdk_polly::Client::new(&aws_config);
            tracing::info!("AWS Polly client initialized successfully");

            Arc::new(PollyTtsRepository::new(Arc::new(polly_client)))
        }
        TtsEngine::OpenAi => {
            if std::env::var("OPENAI_API_KEY").is_err() {
                tracing::warn!("OPENAI_API_KEY not set, OpenAI speech requests will fail");
            }

            tracing::info!(model = %config.openai_tts_model, "Initializing OpenAI TTS client");
            Arc::new(OpenAiTtsRepository::new(
                Arc::new(OpenAiClient::new()),
                config.openai_tts_model.clone(),
            ))
        }
    }
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "audiobook_weaver=debug,tower_http=debug"
    } else {
        "audiobook_weaver=info,tower_http=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
