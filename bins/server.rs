use std::process::ExitCode;

use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_tracing(cfg: Option<&AppConfig>) {
    let format = cfg
        .and_then(|c| c.logging.format.clone())
        .or_else(|| std::env::var("LOG_FORMAT").ok())
        .map(|f| LogFormat::parse(&f))
        .unwrap_or_default();
    init_logging(format);
    info!(service = "larchcode_hub", event = "logger_init", ?format, "tracing subscriber initialized");
}

fn main() -> ExitCode {
    // 提前加载 .env，使 RUST_LOG、CONFIG_PATH 及环境变量回退生效
    dotenv().ok();
    let loaded = AppConfig::load_and_validate();
    init_tracing(loaded.as_ref().ok());

    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "larchcode_hub", event = "config_invalid", error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic 钩子：记录错误日志，便于排查问题
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "larchcode_hub",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    // 构建 Tokio 运行时（线程数来自配置）
    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "larchcode_hub", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "larchcode_hub",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        data_dir = %cfg.storage.data_dir.display(),
        "larchcode hub starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(server::startup::serve(cfg));

        tokio::select! {
            res = server_task => match res {
                Ok(Ok(())) => {
                    info!(service = "larchcode_hub", event = "stop", %service_id, pid, "server stopped normally");
                    ExitCode::SUCCESS
                }
                Ok(Err(e)) => {
                    error!(service = "larchcode_hub", event = "run_failed", error = %e, "server returned error");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!(service = "larchcode_hub", event = "task_join_error", error = %e, "server task join error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                // 每次变更在返回前已写入槽位，无需额外刷盘
                info!(service = "larchcode_hub", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
