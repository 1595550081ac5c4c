//! `finetune-eval`: cost estimate, upload, fine-tune, deploy and evaluate
//! against an Azure OpenAI resource.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use integrations_azure_finetune::client::{
    AzureOpenAIClient, AzureOpenAIClientBuilder, AzureOpenAIConfig, ManagementClient,
    ManagementConfig, DEFAULT_API_VERSION,
};
use integrations_azure_finetune::cost::{
    CostEstimator, DatasetReport, Encoding, TiktokenCounter, DEFAULT_EPOCHS,
    DEFAULT_PRICE_PER_TOKEN, DEFAULT_TOKEN_LIMIT,
};
use integrations_azure_finetune::evaluation::{
    load_test_records, EvaluationConfig, EvaluationPipeline, EvaluationReport, HttpMetricScorer,
    InferenceConfig, Metric, ModelTarget, DEFAULT_EMBEDDING_MODEL, DEFAULT_JUDGE_MODEL,
    DEFAULT_TEMPERATURE,
};
use integrations_azure_finetune::jsonl::write_jsonl;
use integrations_azure_finetune::services::deployments::{
    DeploymentRequest, DEFAULT_MODEL_VERSION, DEFAULT_SKU_CAPACITY, DEFAULT_SKU_NAME,
};
use integrations_azure_finetune::services::files::FilePurpose;
use integrations_azure_finetune::services::fine_tuning::{
    FineTuningJobRequest, FineTuningJobStatus, Hyperparameters, ListParams, PollConfig,
    PollReport,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

const DEFAULT_BASE_MODEL: &str = "gpt-35-turbo-0613";
const DEFAULT_SEED: u64 = 105;

#[derive(Parser, Debug)]
#[command(
    name = "finetune-eval",
    version,
    about = "Fine-tune a model on Azure OpenAI and compare it against a baseline deployment."
)]
struct Cli {
    /// Emit logs as JSON lines instead of human readable text
    #[arg(long, global = true, env = "FINETUNE_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count tokens in training data and estimate the training cost
    Estimate(EstimateArgs),
    /// Upload JSONL files for fine-tuning
    Upload(UploadArgs),
    /// Upload training and validation files and create a fine-tuning job
    Submit(SubmitArgs),
    /// Poll an existing job until it finishes
    Wait(WaitArgs),
    /// Print the event transcript of a job
    Events(EventsArgs),
    /// Cancel a running job
    Cancel(JobArgs),
    /// Create or update a deployment of a model
    Deploy(DeployArgs),
    /// Compare a baseline and a fine-tuned deployment on a test set
    Evaluate(EvaluateArgs),
    /// Estimate, fine-tune, deploy and evaluate in one go
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct AzureArgs {
    /// Resource endpoint, e.g. https://contoso.openai.azure.com
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    endpoint: Url,

    #[arg(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "AZURE_OPENAI_API_VERSION", default_value = DEFAULT_API_VERSION)]
    api_version: String,
}

impl AzureArgs {
    fn client(&self) -> Result<Arc<dyn AzureOpenAIClient>> {
        let config = AzureOpenAIConfig::new(self.endpoint.clone(), self.api_key.as_str())
            .with_api_version(self.api_version.as_str());
        AzureOpenAIClientBuilder::new()
            .with_config(config)
            .build()
            .context("failed to build Azure OpenAI client")
    }
}

#[derive(Args, Debug)]
struct ManagementArgs {
    #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
    subscription_id: String,

    #[arg(long, env = "AZURE_RESOURCE_GROUP")]
    resource_group: String,

    /// Name of the Azure OpenAI account that hosts the deployment
    #[arg(long, env = "AZURE_OPENAI_ACCOUNT")]
    account: String,

    /// Bearer token for the management API
    #[arg(long, env = "AZURE_MANAGEMENT_TOKEN", hide_env_values = true)]
    management_token: String,

    #[arg(long, env = "AZURE_MANAGEMENT_ENDPOINT")]
    management_endpoint: Option<Url>,
}

impl ManagementArgs {
    fn client(&self) -> Result<ManagementClient> {
        let mut config = ManagementConfig::new(
            self.subscription_id.as_str(),
            self.resource_group.as_str(),
            self.account.as_str(),
            self.management_token.as_str(),
        );
        if let Some(endpoint) = &self.management_endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        ManagementClient::new(&config).context("failed to build management client")
    }
}

#[derive(Args, Debug)]
struct PricingArgs {
    #[arg(long, default_value_t = DEFAULT_PRICE_PER_TOKEN)]
    price_per_token: f64,

    /// Epoch count used for the estimate
    #[arg(long, default_value_t = DEFAULT_EPOCHS)]
    epochs: u32,

    #[arg(long, default_value_t = Encoding::default())]
    encoding: Encoding,

    /// Per-example token limit of the base model
    #[arg(long, default_value_t = DEFAULT_TOKEN_LIMIT)]
    token_limit: usize,
}

impl PricingArgs {
    fn estimator(&self) -> Result<CostEstimator> {
        let counter = TiktokenCounter::new(self.encoding)?;
        Ok(CostEstimator::new(Arc::new(counter))
            .with_price_per_token(self.price_per_token)
            .with_epochs(self.epochs)
            .with_token_limit(self.token_limit))
    }
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// JSONL files of chat conversations
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[command(flatten)]
    pricing: PricingArgs,

    /// Write the dataset reports as JSON
    #[arg(long)]
    json_output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct UploadArgs {
    #[command(flatten)]
    azure: AzureArgs,

    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct JobSpecArgs {
    /// Base model to fine-tune
    #[arg(long, default_value = DEFAULT_BASE_MODEL)]
    model: String,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Training epochs; the service picks when omitted
    #[arg(long)]
    n_epochs: Option<u32>,

    /// Suffix for the fine-tuned model name
    #[arg(long)]
    suffix: Option<String>,
}

impl JobSpecArgs {
    fn request(&self, training_file: &str, validation_file: &str) -> FineTuningJobRequest {
        let mut request = FineTuningJobRequest::new(self.model.as_str(), training_file)
            .with_validation_file(validation_file)
            .with_seed(self.seed);
        if let Some(epochs) = self.n_epochs {
            request = request.with_hyperparameters(Hyperparameters::with_epochs(epochs));
        }
        if let Some(suffix) = &self.suffix {
            request = request.with_suffix(suffix.as_str());
        }
        request
    }
}

#[derive(Args, Debug)]
struct PollArgs {
    /// Seconds between status checks
    #[arg(long, default_value_t = 10)]
    poll_interval: u64,

    /// Growth factor of the poll interval
    #[arg(long, default_value_t = 1.0)]
    poll_multiplier: f64,

    #[arg(long, default_value_t = 300)]
    max_poll_interval: u64,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 24 * 60 * 60)]
    max_wait: u64,

    #[arg(long)]
    poll_jitter: bool,
}

impl PollArgs {
    fn config(&self) -> PollConfig {
        PollConfig::default()
            .with_interval(Duration::from_secs(self.poll_interval))
            .with_multiplier(self.poll_multiplier)
            .with_max_interval(Duration::from_secs(self.max_poll_interval))
            .with_max_wait(Duration::from_secs(self.max_wait))
            .with_jitter(self.poll_jitter)
    }
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[command(flatten)]
    azure: AzureArgs,

    #[arg(long)]
    training_file: PathBuf,

    #[arg(long)]
    validation_file: PathBuf,

    #[command(flatten)]
    job: JobSpecArgs,

    /// Poll the job until it finishes
    #[arg(long)]
    wait: bool,

    #[command(flatten)]
    poll: PollArgs,
}

#[derive(Args, Debug)]
struct WaitArgs {
    #[command(flatten)]
    azure: AzureArgs,

    job_id: String,

    #[command(flatten)]
    poll: PollArgs,
}

#[derive(Args, Debug)]
struct EventsArgs {
    #[command(flatten)]
    azure: AzureArgs,

    job_id: String,

    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Args, Debug)]
struct JobArgs {
    #[command(flatten)]
    azure: AzureArgs,

    job_id: String,
}

#[derive(Args, Debug)]
struct DeploymentArgs {
    /// Model version of the deployed model
    #[arg(long, default_value = DEFAULT_MODEL_VERSION)]
    model_version: String,

    #[arg(long, default_value = DEFAULT_SKU_NAME)]
    sku: String,

    #[arg(long, default_value_t = DEFAULT_SKU_CAPACITY)]
    capacity: u32,
}

impl DeploymentArgs {
    fn request(&self, deployment_name: &str, model: &str) -> DeploymentRequest {
        DeploymentRequest::new(deployment_name, model)
            .with_model_version(self.model_version.as_str())
            .with_sku(self.sku.as_str(), self.capacity)
    }
}

#[derive(Args, Debug)]
struct DeployArgs {
    #[command(flatten)]
    management: ManagementArgs,

    #[arg(long)]
    deployment_name: String,

    /// Model to deploy, usually the fine-tuned model id
    #[arg(long)]
    model: String,

    #[command(flatten)]
    deployment: DeploymentArgs,

    /// Poll the deployment until it finishes provisioning
    #[arg(long)]
    wait: bool,

    #[command(flatten)]
    poll: PollArgs,
}

#[derive(Args, Debug)]
struct ScoringArgs {
    /// Base URL of the evaluation service
    #[arg(long, env = "EVALUATION_SERVICE_URL")]
    evaluation_url: Url,

    #[arg(long, env = "EVALUATION_API_KEY", hide_env_values = true)]
    evaluation_api_key: Option<String>,

    #[arg(long, env = "EVALUATION_JUDGE_MODEL", default_value = DEFAULT_JUDGE_MODEL)]
    judge_model: String,

    #[arg(long, env = "EVALUATION_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    embedding_model: String,

    /// Comma separated metric names; all metrics when omitted
    #[arg(long, env = "EVALUATION_METRICS", value_delimiter = ',')]
    metrics: Vec<Metric>,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    #[arg(long)]
    max_tokens: Option<u32>,
}

impl ScoringArgs {
    fn scorer(&self) -> Result<HttpMetricScorer> {
        let mut config = EvaluationConfig::new(self.evaluation_url.clone())
            .with_judge_model(self.judge_model.as_str())
            .with_embedding_model(self.embedding_model.as_str());
        if !self.metrics.is_empty() {
            config = config.with_metrics(self.metrics.clone());
        }
        if let Some(key) = &self.evaluation_api_key {
            config = config.with_api_key(key.as_str());
        }
        HttpMetricScorer::new(config).context("failed to build evaluation client")
    }

    fn inference(&self) -> InferenceConfig {
        InferenceConfig {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the comparison table as CSV
    #[arg(long)]
    csv_output: Option<PathBuf>,

    /// Write per-row answers and outcomes as JSONL
    #[arg(long)]
    rows_output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    #[command(flatten)]
    azure: AzureArgs,

    /// JSONL test set with instruction, question and cot_answer fields
    #[arg(long)]
    test_file: PathBuf,

    #[arg(long)]
    baseline_deployment: String,

    /// Label of the baseline in the comparison; defaults to the deployment name
    #[arg(long)]
    baseline_label: Option<String>,

    #[arg(long)]
    fine_tuned_deployment: String,

    #[arg(long)]
    fine_tuned_label: Option<String>,

    /// Only evaluate the first N test records
    #[arg(long)]
    limit: Option<usize>,

    #[command(flatten)]
    scoring: ScoringArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    azure: AzureArgs,

    #[command(flatten)]
    management: ManagementArgs,

    #[arg(long)]
    training_file: PathBuf,

    #[arg(long)]
    validation_file: PathBuf,

    #[arg(long)]
    test_file: PathBuf,

    #[arg(long)]
    baseline_deployment: String,

    /// Deployment name for the fine-tuned model
    #[arg(long)]
    deployment_name: String,

    #[arg(long)]
    limit: Option<usize>,

    #[command(flatten)]
    pricing: PricingArgs,

    #[command(flatten)]
    job: JobSpecArgs,

    #[command(flatten)]
    poll: PollArgs,

    #[command(flatten)]
    deployment: DeploymentArgs,

    #[command(flatten)]
    scoring: ScoringArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    match cli.command {
        Command::Estimate(args) => estimate(args),
        Command::Upload(args) => upload(args).await,
        Command::Submit(args) => submit(args).await,
        Command::Wait(args) => wait(args).await,
        Command::Events(args) => events(args).await,
        Command::Cancel(args) => cancel(args).await,
        Command::Deploy(args) => deploy(args).await,
        Command::Evaluate(args) => evaluate(args).await,
        Command::Run(args) => run(args).await,
    }
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("integrations_azure_finetune=info,finetune_eval=info"));
    // stdout carries only results
    log_subscriber(json, filter, std::io::stderr).try_init()?;
    Ok(())
}

fn log_subscriber<W>(json: bool, filter: EnvFilter, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        Box::new(registry.with(fmt::layer().json().with_writer(writer)))
    } else {
        Box::new(registry.with(fmt::layer().with_writer(writer).with_target(false)))
    }
}

fn print_dataset_report(report: &DatasetReport) {
    println!("{}", report.path);
    println!(
        "  examples: {}  tokens/example: min {} max {} mean {:.1} median {:.1}",
        report.stats.examples,
        report.stats.min_tokens,
        report.stats.max_tokens,
        report.stats.mean_tokens,
        report.stats.median_tokens
    );
    if report.stats.over_limit > 0 {
        println!(
            "  {} examples exceed {} tokens",
            report.stats.over_limit, report.stats.token_limit
        );
    }
    for (kind, count) in &report.format.errors {
        println!("  format problem {}: {}", kind, count);
    }
    println!("  estimated cost: {}", report.estimate);
}

fn estimate(args: EstimateArgs) -> Result<()> {
    let estimator = args.pricing.estimator()?;
    let mut reports = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let report = estimator
            .analyze_file(path)
            .with_context(|| format!("failed to analyze {}", path.display()))?;
        print_dataset_report(&report);
        reports.push(report);
    }

    if reports.len() > 1 {
        let total: f64 = reports.iter().map(|report| report.estimate.cost).sum();
        println!("total estimated cost: ${:.2}", total);
    }

    if let Some(path) = &args.json_output {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &reports)?;
    }
    Ok(())
}

async fn upload_file(client: &dyn AzureOpenAIClient, path: &Path) -> Result<String> {
    let file = client
        .files()
        .upload_path(path, FilePurpose::FineTune)
        .await
        .with_context(|| format!("failed to upload {}", path.display()))?;
    println!("{} -> {}", path.display(), file.id);
    Ok(file.id)
}

async fn upload(args: UploadArgs) -> Result<()> {
    let client = args.azure.client()?;
    for path in &args.files {
        upload_file(client.as_ref(), path).await?;
    }
    Ok(())
}

/// Uploads both files and creates the job, returning its id.
async fn submit_job(
    client: &dyn AzureOpenAIClient,
    training_file: &Path,
    validation_file: &Path,
    job: &JobSpecArgs,
) -> Result<String> {
    let training_id = upload_file(client, training_file).await?;
    let validation_id = upload_file(client, validation_file).await?;

    let job = client
        .fine_tuning()
        .create(job.request(&training_id, &validation_id))
        .await
        .context("failed to create fine-tuning job")?;
    println!("job: {} ({})", job.id, job.status);
    Ok(job.id)
}

async fn print_events(client: &dyn AzureOpenAIClient, job_id: &str, limit: Option<u32>) -> Result<()> {
    let params = match limit {
        Some(limit) => ListParams::default().with_limit(limit),
        None => ListParams::default(),
    };
    let events = client.fine_tuning().events(job_id, params).await?;

    // newest first on the wire
    for event in events.data.iter().rev() {
        println!("{} [{}] {}", event.created_at, event.level, event.message);
    }
    Ok(())
}

async fn wait_for_job(
    client: &dyn AzureOpenAIClient,
    job_id: &str,
    poll: &PollArgs,
) -> Result<PollReport> {
    let report = client.job_poller(poll.config())?.wait_for_terminal(job_id).await?;

    println!(
        "job {} {} after {}s ({} status checks)",
        job_id,
        report.status(),
        report.elapsed.as_secs(),
        report.polls
    );
    if let Some(model) = &report.job.fine_tuned_model {
        println!("fine-tuned model: {}", model);
    }
    if let Some(error) = &report.job.error {
        println!(
            "error: {} {}",
            error.code.as_deref().unwrap_or("-"),
            error.message.as_deref().unwrap_or("")
        );
    }
    Ok(report)
}

async fn submit(args: SubmitArgs) -> Result<()> {
    let client = args.azure.client()?;
    let job_id = submit_job(
        client.as_ref(),
        &args.training_file,
        &args.validation_file,
        &args.job,
    )
    .await?;

    if args.wait {
        wait_for_job(client.as_ref(), &job_id, &args.poll).await?;
        print_events(client.as_ref(), &job_id, None).await?;
    }
    Ok(())
}

async fn wait(args: WaitArgs) -> Result<()> {
    let client = args.azure.client()?;
    wait_for_job(client.as_ref(), &args.job_id, &args.poll).await?;
    Ok(())
}

async fn events(args: EventsArgs) -> Result<()> {
    let client = args.azure.client()?;
    print_events(client.as_ref(), &args.job_id, args.limit).await
}

async fn cancel(args: JobArgs) -> Result<()> {
    let client = args.azure.client()?;
    let job = client.fine_tuning().cancel(&args.job_id).await?;
    println!("job {} {}", job.id, job.status);
    Ok(())
}

async fn deploy_model(
    management: &ManagementArgs,
    deployment: &DeploymentArgs,
    deployment_name: &str,
    model: &str,
    wait: Option<&PollArgs>,
) -> Result<()> {
    let management = management.client()?;
    let response = management
        .deployments()
        .create_or_update(deployment.request(deployment_name, model))
        .await?;

    println!("deployment {}: HTTP {}", deployment_name, response.status);
    if let Some(state) = response.provisioning_state() {
        println!("provisioning state: {}", state);
    }
    if !response.is_success() {
        bail!("deployment request rejected: {}", response.body);
    }

    if let Some(poll) = wait {
        management
            .deployment_poller(poll.config())?
            .wait_until_ready(deployment_name)
            .await?;
        println!("deployment {} ready", deployment_name);
    }
    Ok(())
}

async fn deploy(args: DeployArgs) -> Result<()> {
    deploy_model(
        &args.management,
        &args.deployment,
        &args.deployment_name,
        &args.model,
        args.wait.then_some(&args.poll),
    )
    .await
}

async fn run_evaluation(
    client: &dyn AzureOpenAIClient,
    scoring: &ScoringArgs,
    output: &OutputArgs,
    test_file: &Path,
    limit: Option<usize>,
    targets: &[ModelTarget],
) -> Result<EvaluationReport> {
    let mut records = load_test_records(test_file)
        .with_context(|| format!("failed to load {}", test_file.display()))?;
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    info!(records = records.len(), "loaded test set");

    let pipeline = EvaluationPipeline::new(client.chat(), Arc::new(scoring.scorer()?))
        .with_inference_config(scoring.inference());
    let report = pipeline.evaluate_models(targets, &records).await?;

    for evaluation in &report.evaluations {
        let failed = evaluation.failed_rows();
        if failed > 0 {
            println!(
                "{}: {} of {} inference calls failed",
                evaluation.model,
                failed,
                evaluation.outcomes.len()
            );
        }
    }
    println!();
    println!("{}", report.table);
    println!("{}", report.table.render_bar_chart());

    if let Some(path) = &output.csv_output {
        report.table.save_csv(path)?;
        println!("comparison written to {}", path.display());
    }
    if let Some(path) = &output.rows_output {
        write_jsonl(path, &report.evaluations)?;
        println!("evaluation rows written to {}", path.display());
    }
    Ok(report)
}

async fn evaluate(args: EvaluateArgs) -> Result<()> {
    let client = args.azure.client()?;
    let targets = [
        ModelTarget::new(
            args.baseline_label
                .unwrap_or_else(|| args.baseline_deployment.clone()),
            args.baseline_deployment.as_str(),
        ),
        ModelTarget::new(
            args.fine_tuned_label
                .unwrap_or_else(|| args.fine_tuned_deployment.clone()),
            args.fine_tuned_deployment.as_str(),
        ),
    ];

    run_evaluation(
        client.as_ref(),
        &args.scoring,
        &args.output,
        &args.test_file,
        args.limit,
        &targets,
    )
    .await?;
    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    let estimator = args.pricing.estimator()?;
    for path in [&args.training_file, &args.validation_file] {
        print_dataset_report(&estimator.analyze_file(path)?);
    }

    let client = args.azure.client()?;
    let job_id = submit_job(
        client.as_ref(),
        &args.training_file,
        &args.validation_file,
        &args.job,
    )
    .await?;

    let report = wait_for_job(client.as_ref(), &job_id, &args.poll).await?;
    print_events(client.as_ref(), &job_id, None).await?;
    if report.status() != FineTuningJobStatus::Succeeded {
        bail!("fine-tuning job {} ended as {}", job_id, report.status());
    }
    let fine_tuned_model = report
        .job
        .fine_tuned_model
        .context("succeeded job reported no fine-tuned model")?;

    deploy_model(
        &args.management,
        &args.deployment,
        &args.deployment_name,
        &fine_tuned_model,
        Some(&args.poll),
    )
    .await?;

    let targets = [
        ModelTarget::new(args.baseline_deployment.as_str(), args.baseline_deployment.as_str()),
        ModelTarget::new(fine_tuned_model, args.deployment_name.as_str()),
    ];
    run_evaluation(
        client.as_ref(),
        &args.scoring,
        &args.output,
        &args.test_file,
        args.limit,
        &targets,
    )
    .await?;
    Ok(())
}
