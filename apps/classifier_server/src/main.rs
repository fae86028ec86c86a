use clap::Parser;
use classifier_server::{run_server, ServerConfig};
use runner_tract::TractRunner;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Cat vs Dog image classifier")]
struct Args {
    /// Path to the ONNX model file
    #[clap(short, long, default_value = runner_core::DEFAULT_MODEL_PATH)]
    model: String,

    /// Address to bind
    #[clap(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[clap(short, long, default_value_t = 8080)]
    port: u16,

    /// Largest accepted upload, in megabytes
    #[clap(long, default_value_t = 10)]
    max_upload_mb: usize,

    /// Seconds to wait for one inference before giving up
    #[clap(long, default_value_t = 30)]
    inference_timeout_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            model_path: args.model,
            max_upload_bytes: args.max_upload_mb * 1024 * 1024,
            inference_timeout_secs: args.inference_timeout_secs,
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classifier_server=info,classifier=info,runner_tract=info".into()),
        )
        .init();

    let args = Args::parse();
    run_server::<TractRunner>(args.into()).await
}
