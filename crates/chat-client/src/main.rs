use chat_client::api::HttpGenerateApi;
use chat_client::cli::{CliError, CliOptions};
use chat_client::render::MarkdownRenderer;
use chat_client::terminal::TerminalChat;
use shared::config::{ClientConfig, load_env_file};
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let env_file = load_env_file();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "chat_client=warn".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = env_file {
        debug!("loaded environment from {}", path.display());
    }

    let options = match CliOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(CliError::HelpRequested) => {
            print_usage();
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    let generate_url = match options.endpoint {
        Some(endpoint) => endpoint,
        None => match ClientConfig::from_env() {
            Ok(config) => config.generate_url,
            Err(err) => {
                error!("failed to read config: {err}");
                std::process::exit(1);
            }
        },
    };
    debug!(%generate_url, "using generation endpoint");

    let renderer = MarkdownRenderer::new(options.color && console::colors_enabled());
    let mut chat = TerminalChat::new(HttpGenerateApi::new(generate_url), renderer);
    chat.session_mut().set_mode(options.mode);

    if let Err(err) = chat.run().await {
        error!("terminal session failed: {err}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        "Usage: juici-chat [--endpoint <url>] [--mode <standard|summarize|expand|rewrite|task>] [--no-color]\n\
         \n\
         Environment:\n\
         \x20 JUICI_API_URL  generation endpoint (default http://127.0.0.1:3000/api/generate)"
    );
}
