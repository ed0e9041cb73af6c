use std::process::ExitCode;
use std::sync::Arc;
use resptime::application::{Config, MeasureUseCase};
use resptime::domain::ResptimeError;
use resptime::infrastructure::{HickoryDnsResolver, HybridHttpClient, RustlsTlsHandshaker, TokioClock, TokioTcpDialer};
use resptime::{logging, tui};

fn main() -> ExitCode {
    if std::env::args().len() > 1 {
        eprintln!("usage: resptime\n\n\
            Interactive per-phase HTTP(S) timing. Takes no arguments.\n\n\
            Environment:\n  \
              RESPTIME_TIMEOUT           DNS/TCP/TLS timeout (e.g. 5s, 3000ms) [default: 10s]\n  \
              RESPTIME_RESPONSE_TIMEOUT  HTTP response timeout [default: 30s]\n  \
              RESPTIME_LOG_FILE          Diagnostic log file [default: debug.log]\n  \
              RESPTIME_TICK              Redraw interval [default: 250ms]\n  \
              RUST_LOG                   Log filter [default: info]");
        return ExitCode::from(2);
    }

    let config = Config::from_env();

    if let Err(e) = logging::init_tracing(&config.log_file) {
        eprintln!("{}", e);
        return ExitCode::from(e.class.exit_code() as u8);
    }
    tracing::info!(?config, "starting");

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error[ERROR]: failed to create runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    match rt.block_on(async_main(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            eprintln!("{}", e);
            ExitCode::from(e.class.exit_code() as u8)
        }
    }
}

async fn async_main(config: Config) -> Result<(), ResptimeError> {
    let dns = HickoryDnsResolver::new()?;
    let tls = RustlsTlsHandshaker::new()?;
    let measurer = Arc::new(MeasureUseCase::new(dns, TokioTcpDialer::new(), tls, HybridHttpClient::new(), TokioClock::new(), config.clone()));

    tui::run(measurer, &config).await
}
