use clap::Parser;
use tracing::debug;

use smart_utm::cli::Cli;
use smart_utm::config::{get_config, init_config};
use smart_utm::runtime::modes::{self, Mode};
use smart_utm::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_config();
    let mode = modes::detect_mode(&cli);

    match (mode, cli.command) {
        (Mode::Cli, Some(command)) => {
            if let Err(e) = modes::run_cli(command).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        _ => {
            // guard 必须存活到进程结束，否则文件日志不会刷新
            let _guard = init_logging(&get_config())?;
            debug!("Logging initialized");
            modes::run_server().await
        }
    }
}
